use async_trait::async_trait;
use uuid::Uuid;

use crate::application::dto::contractors::ApplicationSummary;
use crate::domain::contractors::contractor::{Contractor, NewContractor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    pub contractor_id: Uuid,
    pub created: bool,
    pub updated_applications: u64,
}

/// Result of the locked re-check done inside the merge transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeResult {
    Merged(MergeOutcome),
    /// Some selected application no longer exists.
    Missing,
    /// Some selected application no longer carries `seed.email`.
    EmailChanged,
}

#[async_trait]
pub trait ContractorRepository: Send + Sync {
    /// Newest first, each with its linked applications.
    async fn list_with_applications(
        &self,
    ) -> anyhow::Result<Vec<(Contractor, Vec<ApplicationSummary>)>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Contractor>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Contractor>>;
    /// Locks the selected applications and re-checks that they all exist and
    /// share `seed.email`. Then reuses the contractor keyed by that email or
    /// inserts `seed`, and links every application id to it. One transaction.
    async fn merge_applications(
        &self,
        seed: &NewContractor,
        application_ids: &[Uuid],
    ) -> anyhow::Result<MergeResult>;
    async fn set_password(
        &self,
        id: Uuid,
        password_hash: &str,
        must_change_password: bool,
    ) -> anyhow::Result<bool>;
    async fn touch_last_login(&self, id: Uuid) -> anyhow::Result<()>;
}
