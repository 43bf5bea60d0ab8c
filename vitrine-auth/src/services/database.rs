//! PostgreSQL credential store.

use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::PgPool;

use crate::models::{Organization, OrganizationRow};
use crate::services::store::{OrganizationGetter, StoreError};

/// Organization lookups backed by the `organizations` and `users` tables.
#[derive(Clone)]
pub struct PgOrganizationStore {
    pool: PgPool,
}

impl PgOrganizationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!("Database health check failed: {}", e))
            })?;
        Ok(())
    }
}

#[async_trait]
impl OrganizationGetter for PgOrganizationStore {
    async fn get_by_email(&self, email: &str) -> Result<Organization, StoreError> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT o.id, o.name, COALESCE(o.logo, '') AS logo, o.slug,
                   u.id AS user_id, u.email, u.password
            FROM organizations o
            JOIN users u ON u.id = o.user_id
            WHERE LOWER(u.email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(anyhow::anyhow!(e)))?;

        row.map(Organization::from)
            .ok_or_else(|| StoreError::NotFound(email.to_string()))
    }
}
