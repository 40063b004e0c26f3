//! Authentication service module
//!
//! Login (credential check, token issuance, refresh session creation) and
//! the refresh-token exchange.

mod masking;
mod service;

#[cfg(test)]
mod tests;

pub use masking::mask_email;
pub use service::AuthService;
