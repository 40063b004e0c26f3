pub mod gateway;

pub use gateway::UserGateway;
