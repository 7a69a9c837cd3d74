use tracing::{info, warn};
use uuid::Uuid;

use crate::application::ports::application_repository::{
    ApplicationRepository, BatchOutcome, StatusUpdate,
};
use crate::application::use_cases::applications::ApplicationError;

/// Applies per-row verification/payment changes atomically.
pub struct BatchUpdateStatuses<'a, R: ApplicationRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct StatusUpdateInput {
    pub id: Uuid,
    pub verification_status: Option<String>,
    pub payment_status: Option<String>,
}

impl<'a, R: ApplicationRepository + ?Sized> BatchUpdateStatuses<'a, R> {
    pub async fn execute(&self, updates: &[StatusUpdateInput]) -> Result<u64, ApplicationError> {
        if updates.is_empty() {
            return Err(ApplicationError::BadRequest("updates must not be empty".into()));
        }
        let parsed = updates
            .iter()
            .map(|u| -> Result<StatusUpdate, ApplicationError> {
                Ok(StatusUpdate {
                    id: u.id,
                    verification_status: u.verification_status.as_deref().map(str::parse).transpose()?,
                    payment_status: u.payment_status.as_deref().map(str::parse).transpose()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match self.repo.batch_update_statuses(&parsed).await? {
            BatchOutcome::Applied(count) => {
                info!(count, "batch status update applied");
                Ok(count)
            }
            BatchOutcome::Missing(id) => {
                warn!(application_id = %id, "batch status update rolled back");
                Err(ApplicationError::NotFound)
            }
        }
    }
}
