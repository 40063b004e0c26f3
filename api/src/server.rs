//! Wiring from configuration to a running HTTP server

use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use chrono::Duration;
use tracing::info;

use auth_core::{
    AuthService, DomainError, JwtMaker, OpaqueTokenMaker, RefreshSessionRepository,
    Rs256KeyManager,
};
use auth_infra::{
    DatabasePool, HttpUserGateway, MemoryRefreshSessionRepository, MySqlRefreshSessionRepository,
    RedisClient, RedisRefreshSessionRepository,
};
use auth_shared::{AppConfig, JwtAlgorithm, JwtConfig, RefreshTokenConfig, StoreBackend};

use crate::app::{create_app, AppState, HttpSettings};

/// Access token maker for the configured algorithm
pub fn build_jwt_maker(config: &JwtConfig) -> Result<JwtMaker, DomainError> {
    let lifetime = Duration::minutes(config.expire_minutes);
    match config.algorithm {
        JwtAlgorithm::HS256 => JwtMaker::hs256(&config.secret, lifetime),
        JwtAlgorithm::RS256 => {
            let keys = Rs256KeyManager::from_private_pem(&config.private_key_pem, &config.key_id)?;
            Ok(JwtMaker::rs256(
                keys,
                config.issuer.clone(),
                config.audience.clone(),
                lifetime,
            ))
        }
    }
}

pub fn build_refresh_maker(config: &RefreshTokenConfig) -> Result<OpaqueTokenMaker, DomainError> {
    OpaqueTokenMaker::new(config.num_bytes, config.max_age, config.end_point.clone())
}

/// Connect the configured session store and serve until shutdown
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    match config.store {
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory session store; sessions are lost on restart");
            serve(config, MemoryRefreshSessionRepository::new()).await
        }
        StoreBackend::Redis => {
            let client = RedisClient::new(config.cache.clone())
                .await
                .context("connecting to redis")?;
            serve(config, RedisRefreshSessionRepository::new(client)).await
        }
        StoreBackend::Mysql => {
            let pool = DatabasePool::new(config.database.clone())
                .await
                .context("connecting to mysql")?;
            pool.run_migrations().await.context("running migrations")?;
            serve(config, MySqlRefreshSessionRepository::new(&pool)).await
        }
    }
}

async fn serve<R>(config: AppConfig, sessions: R) -> anyhow::Result<()>
where
    R: RefreshSessionRepository + 'static,
{
    let jwt = build_jwt_maker(&config.jwt).context("building access token maker")?;
    let jwks = jwt.jwks().clone();
    let refresh = build_refresh_maker(&config.refresh).context("building refresh token maker")?;
    let users = HttpUserGateway::new(&config.user_service).context("building user service client")?;

    let auth_service = Arc::new(AuthService::new(
        Arc::new(jwt),
        Arc::new(refresh),
        Arc::new(sessions),
        Arc::new(users),
    ));
    let state = web::Data::new(AppState::new(auth_service, jwks, config.environment));
    let settings = HttpSettings::from(&config);

    let bind_address = config.server.bind_address();
    info!(
        address = %bind_address,
        environment = %config.environment,
        store = ?config.store,
        "starting auth service"
    );

    let mut server = HttpServer::new(move || create_app(state.clone(), &settings))
        .keep_alive(std::time::Duration::from_secs(config.server.keep_alive));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("binding {}", bind_address))?
        .run()
        .await?;

    info!("auth service stopped");
    Ok(())
}
