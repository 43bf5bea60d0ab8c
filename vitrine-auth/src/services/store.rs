use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::models::Organization;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Organization not found for email {0}")]
    NotFound(String),

    #[error("Organization lookup failed: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Resolves an organization, with its owning user, by login email.
#[async_trait]
pub trait OrganizationGetter: Send + Sync {
    async fn get_by_email(&self, email: &str) -> Result<Organization, StoreError>;
}

/// In-process credential store keyed by lowercase email.
#[derive(Clone, Default)]
pub struct MemoryOrganizationStore {
    organizations: Arc<RwLock<HashMap<String, Organization>>>,
}

impl MemoryOrganizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_organizations(organizations: impl IntoIterator<Item = Organization>) -> Self {
        let store = Self::new();
        for organization in organizations {
            store.insert(organization);
        }
        store
    }

    /// Insert or replace the organization owned by `organization.user.email`.
    pub fn insert(&self, organization: Organization) {
        let key = organization.user.email.to_lowercase();
        let mut guard = match self.organizations.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.insert(key, organization);
    }
}

#[async_trait]
impl OrganizationGetter for MemoryOrganizationStore {
    async fn get_by_email(&self, email: &str) -> Result<Organization, StoreError> {
        let guard = self
            .organizations
            .read()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("organization store lock poisoned")))?;

        guard
            .get(&email.to_lowercase())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(email.to_string()))
    }
}
