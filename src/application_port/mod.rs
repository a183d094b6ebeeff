mod account_service;
mod auth_service;
mod logout_coordinator;
mod session_guard;
mod session_issuer;

pub use account_service::*;
pub use auth_service::*;
pub use logout_coordinator::*;
pub use session_guard::*;
pub use session_issuer::*;
