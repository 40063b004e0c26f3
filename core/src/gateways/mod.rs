//! Interfaces to services owned by other teams.

pub mod user;

pub use user::UserGateway;
