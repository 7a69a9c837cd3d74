use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::applications::application::ApplicationStatus;
use crate::domain::contractors::contractor::Contractor;

#[derive(Debug, Clone)]
pub struct ApplicationSummary {
    pub id: Uuid,
    pub status: ApplicationStatus,
    pub plan_type: String,
    pub line_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ContractorWithApplicationsDto {
    pub contractor: Contractor,
    pub applications: Vec<ApplicationSummary>,
}
