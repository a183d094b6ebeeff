mod account_service_impl;
mod clock;
mod credential_hasher_argon2;
mod logout_coordinator_impl;
mod password_policy;
mod session_guard_impl;
mod session_issuer_impl;
mod token_codec_jwt;

pub use account_service_impl::*;
pub use clock::*;
pub use credential_hasher_argon2::*;
pub use logout_coordinator_impl::*;
pub use password_policy::*;
pub use session_guard_impl::*;
pub use session_issuer_impl::*;
pub use token_codec_jwt::*;
