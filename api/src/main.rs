use auth_api::{server, telemetry};
use auth_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    telemetry::init_tracing(&config.logging);

    server::run(config).await
}
