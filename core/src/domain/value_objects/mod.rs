//! Value objects representing immutable domain concepts.

pub mod login_result;

pub use login_result::{LoginResult, RefreshResult};
