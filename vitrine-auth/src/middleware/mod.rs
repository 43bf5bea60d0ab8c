pub mod auth;
pub mod context;

pub use auth::auth_middleware;
pub use context::{Authenticated, RequestAuthContext};
