pub mod repository;

pub use repository::RefreshSessionRepository;

#[cfg(test)]
pub mod mock;
#[cfg(test)]
pub use mock::MockSessionRepository;
