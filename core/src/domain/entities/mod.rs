//! Domain entities representing core business objects.

pub mod session;
pub mod token;
pub mod user;

pub use session::{retention_ttl, RefreshTokenSession, MIN_RETENTION_SECONDS};
pub use token::{AccessToken, Claims, RefreshToken};
pub use user::VerifiedUser;
