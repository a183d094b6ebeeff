mod cookies;
mod error;
mod filters;
mod handler;
mod pages;
mod router;

pub use cookies::*;
pub use error::{ApiError, ApiErrorCode, recover_error};
pub use filters::GuardMode;
pub use router::routes;
