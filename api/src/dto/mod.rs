pub mod auth_dto;

pub use auth_dto::{AccessTokenResponse, LoginRequest, MeResponse};
