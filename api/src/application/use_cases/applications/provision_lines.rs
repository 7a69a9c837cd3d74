use tracing::info;
use uuid::Uuid;

use crate::application::ports::line_repository::{LineRepository, ProvisionOutcome};
use crate::application::use_cases::applications::ApplicationError;

/// Tops an application up to its declared `line_count` with `not_opened`
/// lines. Never removes lines, so running it twice changes nothing.
pub struct ProvisionLines<'a, L: LineRepository + ?Sized> {
    pub lines: &'a L,
}

impl<'a, L: LineRepository + ?Sized> ProvisionLines<'a, L> {
    pub async fn execute(&self, application_id: Uuid) -> Result<ProvisionOutcome, ApplicationError> {
        let outcome = self
            .lines
            .provision_for_application(application_id)
            .await?
            .ok_or(ApplicationError::NotFound)?;
        if outcome.created > 0 {
            info!(
                application_id = %application_id,
                created = outcome.created,
                total = outcome.total,
                "provisioned missing lines"
            );
        }
        Ok(outcome)
    }
}
