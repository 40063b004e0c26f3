pub mod auth;
pub mod cors;
pub mod recovery;
pub mod request_id;
pub mod request_meta;

pub use auth::BearerToken;
pub use cors::create_cors;
pub use recovery::Recovery;
pub use request_id::{RequestId, RequestIdMiddleware, REQUEST_ID_HEADER};
pub use request_meta::{RequestMeta, RequestMetaMiddleware};
