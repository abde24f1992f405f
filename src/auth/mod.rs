pub mod identity;
pub mod middleware;

pub use identity::{Identity, USER_NAME_HEADER, USER_UUID_HEADER};
pub use middleware::{IdentityExt, IdentityMiddleware};
