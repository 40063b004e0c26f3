//! Repository interfaces implemented by the infrastructure layer.

pub mod session;

pub use session::RefreshSessionRepository;

#[cfg(test)]
pub use session::MockSessionRepository;
