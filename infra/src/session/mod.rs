//! Refresh session store implementations
//!
//! All three honour the same contract: a conditional write that refuses to
//! replace a live record, and a read that treats records past their
//! retention window as absent.

pub mod memory;
#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "redis-cache")]
pub mod redis;

pub use memory::MemoryRefreshSessionRepository;
#[cfg(feature = "mysql")]
pub use mysql::MySqlRefreshSessionRepository;
#[cfg(feature = "redis-cache")]
pub use self::redis::RedisRefreshSessionRepository;
