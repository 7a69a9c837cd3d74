use uuid::Uuid;

use crate::application::ports::application_repository::{
    ApplicationPatch, ApplicationRepository,
};
use crate::application::services::pricing::MAX_LINES_PER_APPLICATION;
use crate::application::use_cases::applications::{ApplicationError, parse_date_field};
use crate::domain::applications::application::Application;

pub struct UpdateApplication<'a, R: ApplicationRepository + ?Sized> {
    pub repo: &'a R,
}

/// Operator edit as received over the wire. Nullable fields use
/// `Some(None)` for an explicit null.
#[derive(Debug, Clone, Default)]
pub struct ApplicationUpdate {
    pub status: Option<String>,
    pub verification_status: Option<String>,
    pub payment_status: Option<String>,
    pub comment1: Option<Option<String>>,
    pub comment2: Option<Option<String>>,
    pub expiration_date: Option<Option<String>>,
    pub plan_type: Option<String>,
    pub line_count: Option<i32>,
    pub total_amount: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
}

impl ApplicationUpdate {
    fn into_patch(self) -> Result<ApplicationPatch, ApplicationError> {
        if self
            .line_count
            .is_some_and(|n| !(0..=MAX_LINES_PER_APPLICATION).contains(&n))
        {
            return Err(ApplicationError::BadRequest(format!(
                "lineCount must be between 0 and {MAX_LINES_PER_APPLICATION}"
            )));
        }
        let expiration_date = match self.expiration_date {
            None => None,
            Some(raw) => Some(parse_date_field("expirationDate", raw.as_deref())?),
        };
        Ok(ApplicationPatch {
            status: self.status.as_deref().map(str::parse).transpose()?,
            verification_status: self.verification_status.as_deref().map(str::parse).transpose()?,
            payment_status: self.payment_status.as_deref().map(str::parse).transpose()?,
            comment1: self.comment1,
            comment2: self.comment2,
            expiration_date,
            plan_type: self.plan_type,
            line_count: self.line_count,
            total_amount: self.total_amount,
            email: self.email,
            phone: self.phone,
            postal_code: self.postal_code,
            address: self.address,
        })
    }
}

impl<'a, R: ApplicationRepository + ?Sized> UpdateApplication<'a, R> {
    pub async fn execute(&self, id: Uuid, update: ApplicationUpdate) -> Result<Application, ApplicationError> {
        let patch = update.into_patch()?;
        if patch.is_empty() {
            return Err(ApplicationError::BadRequest("no fields to update".into()));
        }
        self.repo
            .apply_patch(id, &patch)
            .await?
            .ok_or(ApplicationError::NotFound)
    }
}
