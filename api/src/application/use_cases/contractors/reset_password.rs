use tracing::info;
use uuid::Uuid;

use crate::application::ports::contractor_repository::ContractorRepository;
use crate::application::services::passwords::{MIN_PASSWORD_LEN, hash_password};
use crate::application::use_cases::contractors::ContractorError;

/// Operator-issued portal password. The contractor must change it on next login.
pub struct ResetContractorPassword<'a, R: ContractorRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ContractorRepository + ?Sized> ResetContractorPassword<'a, R> {
    pub async fn execute(&self, id: Uuid, password: &str) -> Result<(), ContractorError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ContractorError::BadRequest(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let hash = hash_password(password)?;
        if !self.repo.set_password(id, &hash, true).await? {
            return Err(ContractorError::NotFound("contractor not found".into()));
        }
        info!(contractor_id = %id, "contractor password reset");
        Ok(())
    }
}
