mod revocation;
mod user;

pub use revocation::*;
pub use user::*;
