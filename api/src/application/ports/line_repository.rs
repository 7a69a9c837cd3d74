use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::lines::line::{Line, LineStatus, LineWithTags};

#[derive(Debug, Clone)]
pub struct NewLine {
    pub application_id: Uuid,
    pub phone_number: Option<String>,
    pub iccid: Option<String>,
    pub line_status: LineStatus,
    pub sim_location_id: Option<Uuid>,
    pub spare_tag_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct LinePatch {
    pub phone_number: Option<Option<String>>,
    pub iccid: Option<Option<String>>,
    pub line_status: Option<LineStatus>,
    pub shipment_date: Option<Option<NaiveDate>>,
    pub return_date: Option<Option<NaiveDate>>,
    pub contract_month: Option<Option<String>>,
    pub sim_location_id: Option<Option<Uuid>>,
    pub spare_tag_id: Option<Option<Uuid>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionOutcome {
    pub created: u32,
    pub total: u32,
}

#[async_trait]
pub trait LineRepository: Send + Sync {
    /// Returns `None` when the owning application does not exist.
    async fn create(&self, line: &NewLine) -> anyhow::Result<Option<Line>>;
    async fn find_with_tags(&self, id: Uuid) -> anyhow::Result<Option<LineWithTags>>;
    /// Oldest first.
    async fn list_for_application(&self, application_id: Uuid)
    -> anyhow::Result<Vec<LineWithTags>>;
    async fn list_for_applications(
        &self,
        application_ids: &[Uuid],
    ) -> anyhow::Result<Vec<LineWithTags>>;
    async fn update(&self, id: Uuid, patch: &LinePatch) -> anyhow::Result<Option<Line>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Tops the application up to `line_count` lines under a row lock.
    /// Returns `None` when the application does not exist.
    async fn provision_for_application(
        &self,
        application_id: Uuid,
    ) -> anyhow::Result<Option<ProvisionOutcome>>;
}
