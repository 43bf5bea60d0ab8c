mod organization;
mod token;

pub(crate) use organization::OrganizationRow;
pub use organization::{BaseOrganization, Organization, User};
pub use token::{PermissionSet, TokenClaims};
