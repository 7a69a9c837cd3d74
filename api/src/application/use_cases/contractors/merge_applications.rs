use std::collections::BTreeSet;

use tracing::info;
use uuid::Uuid;

use crate::application::ports::application_repository::ApplicationRepository;
use crate::application::ports::contractor_repository::{
    ContractorRepository, MergeOutcome, MergeResult,
};
use crate::application::use_cases::contractors::ContractorError;
use crate::domain::contractors::contractor::NewContractor;

/// Links applications that share one email to a single contractor, creating
/// it from the primary application when the email has none yet.
pub struct MergeApplications<'a, A, C>
where
    A: ApplicationRepository + ?Sized,
    C: ContractorRepository + ?Sized,
{
    pub applications: &'a A,
    pub contractors: &'a C,
}

#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub application_ids: Vec<Uuid>,
    pub primary_application_id: Option<Uuid>,
}

impl<'a, A, C> MergeApplications<'a, A, C>
where
    A: ApplicationRepository + ?Sized,
    C: ContractorRepository + ?Sized,
{
    pub async fn execute(&self, req: &MergeRequest) -> Result<MergeOutcome, ContractorError> {
        if req.application_ids.is_empty() {
            return Err(ContractorError::BadRequest("applicationIds must not be empty".into()));
        }
        let primary_id = req
            .primary_application_id
            .ok_or_else(|| ContractorError::BadRequest("primaryApplicationId is required".into()))?;
        let ids: Vec<Uuid> = req
            .application_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if !ids.contains(&primary_id) {
            return Err(ContractorError::NotFound(
                "primary application is not part of the selection".into(),
            ));
        }

        let apps = self.applications.find_many(&ids).await?;
        if apps.len() != ids.len() {
            return Err(ContractorError::NotFound("one or more applications not found".into()));
        }
        let emails: BTreeSet<&str> = apps.iter().map(|a| a.email.as_str()).collect();
        if emails.len() > 1 {
            return Err(ContractorError::BadRequest(
                "selected applications have different email addresses".into(),
            ));
        }
        let primary = apps
            .iter()
            .find(|a| a.id == primary_id)
            .ok_or_else(|| ContractorError::NotFound("primary application not found".into()))?;

        let seed = NewContractor::from_application(primary);
        let outcome = match self.contractors.merge_applications(&seed, &ids).await? {
            MergeResult::Merged(outcome) => outcome,
            MergeResult::Missing => {
                return Err(ContractorError::NotFound("one or more applications not found".into()));
            }
            MergeResult::EmailChanged => {
                return Err(ContractorError::BadRequest(
                    "selected applications have different email addresses".into(),
                ));
            }
        };
        info!(
            contractor_id = %outcome.contractor_id,
            created = outcome.created,
            merged = outcome.updated_applications,
            "applications merged"
        );
        Ok(outcome)
    }
}
