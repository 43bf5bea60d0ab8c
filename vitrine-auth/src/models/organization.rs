//! Organization and owning user records as resolved by the credential store.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Account that owns an organization. `password` is the stored hash, never
/// the plaintext.
#[derive(Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Organization with its embedded owner.
#[derive(Debug, Clone)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub logo: String,
    pub slug: String,
    pub user: User,
}

impl Organization {
    /// Public projection that is safe to return to clients.
    pub fn summary(&self) -> BaseOrganization {
        BaseOrganization {
            id: self.id,
            name: self.name.clone(),
            logo: self.logo.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Public organization fields returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BaseOrganization {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Instituto Esperança")]
    pub name: String,
    #[schema(example = "https://cdn.example.org/logos/esperanca.png")]
    pub logo: String,
    #[schema(example = "instituto-esperanca")]
    pub slug: String,
}

/// Flat row produced by the organization/user join.
#[derive(Debug, FromRow)]
pub(crate) struct OrganizationRow {
    pub id: i64,
    pub name: String,
    pub logo: String,
    pub slug: String,
    pub user_id: i64,
    pub email: String,
    pub password: String,
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            logo: row.logo,
            slug: row.slug,
            user: User {
                id: row.user_id,
                email: row.email,
                password: row.password,
            },
        }
    }
}
