//! Outbound gateways to other services

pub mod http_user;

pub use http_user::HttpUserGateway;
