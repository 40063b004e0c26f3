//! Authentication routes: login, refresh exchange, logout and token introspection

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;

pub use login::login;
pub use logout::logout;
pub use me::me;
pub use refresh::refresh;
