//! Services layer for vitrine-auth.
//!
//! The login flow plus the collaborators it is built from: credential
//! stores and the token manager.

mod auth;
mod database;
pub mod error;
mod jwt;
mod store;

pub use auth::AuthService;
pub use database::PgOrganizationStore;
pub use error::AuthError;
pub use jwt::{JwtTokenManager, TokenError, TokenManager};
pub use store::{MemoryOrganizationStore, OrganizationGetter, StoreError};
