use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::applications::application::{
    ApplicantType, Application, ApplicationStatus, ApplyType, PaymentStatus, VerificationStatus,
};

/// Column values written by the sign-up form. `None` leaves a column untouched
/// on update and falls back to the column default on insert.
#[derive(Debug, Clone, Default)]
pub struct ApplicationFields {
    pub applicant_type: Option<ApplicantType>,
    pub apply_type: Option<ApplyType>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name_kana: Option<String>,
    pub first_name_kana: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub company_name: Option<String>,
    pub company_name_kana: Option<String>,
    pub corporate_number: Option<String>,
    pub established_date: Option<NaiveDate>,
    pub representative_last_name: Option<String>,
    pub representative_first_name: Option<String>,
    pub representative_birth_date: Option<NaiveDate>,
    pub contact_last_name: Option<String>,
    pub contact_first_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
    pub mnp_reservation_number: Option<String>,
    pub mnp_expiry: Option<NaiveDate>,
    pub current_carrier: Option<String>,
    pub plan_type: Option<String>,
    pub line_count: Option<i32>,
    pub total_amount: Option<i64>,
    pub id_card_front_url: Option<String>,
    pub id_card_back_url: Option<String>,
    pub registration_url: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub password_hash: Option<String>,
    pub contractor_id: Option<Uuid>,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Operator-side partial update. For nullable columns the outer `Option` says
/// whether the field was sent, the inner one carries the new value or null.
#[derive(Debug, Clone, Default)]
pub struct ApplicationPatch {
    pub status: Option<ApplicationStatus>,
    pub verification_status: Option<VerificationStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub comment1: Option<Option<String>>,
    pub comment2: Option<Option<String>>,
    pub expiration_date: Option<Option<NaiveDate>>,
    pub plan_type: Option<String>,
    pub line_count: Option<i32>,
    pub total_amount: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
}

impl ApplicationPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.verification_status.is_none()
            && self.payment_status.is_none()
            && self.comment1.is_none()
            && self.comment2.is_none()
            && self.expiration_date.is_none()
            && self.plan_type.is_none()
            && self.line_count.is_none()
            && self.total_amount.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.postal_code.is_none()
            && self.address.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub search: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub id: Uuid,
    pub verification_status: Option<VerificationStatus>,
    pub payment_status: Option<PaymentStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Applied(u64),
    /// Nothing was written because this id does not exist.
    Missing(Uuid),
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn insert(&self, fields: &ApplicationFields) -> anyhow::Result<Application>;
    /// Writes the form fields only while the application is still a draft.
    async fn update_draft(
        &self,
        id: Uuid,
        fields: &ApplicationFields,
    ) -> anyhow::Result<Option<Application>>;
    async fn apply_patch(
        &self,
        id: Uuid,
        patch: &ApplicationPatch,
    ) -> anyhow::Result<Option<Application>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Application>>;
    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Application>>;
    async fn latest_draft_for_email(&self, email: &str) -> anyhow::Result<Option<Application>>;
    /// Newest non-draft application for the email that carries a portal password.
    async fn latest_with_password_for_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<Application>>;
    async fn list(&self, filter: &ApplicationFilter) -> anyhow::Result<(Vec<Application>, i64)>;
    /// Every non-draft application, ordered by email then newest first.
    async fn list_non_draft(&self) -> anyhow::Result<Vec<Application>>;
    async fn list_for_contractor(&self, contractor_id: Uuid) -> anyhow::Result<Vec<Application>>;
    async fn list_non_draft_for_email(&self, email: &str) -> anyhow::Result<Vec<Application>>;
    /// Applies every update or none of them.
    async fn batch_update_statuses(&self, updates: &[StatusUpdate])
    -> anyhow::Result<BatchOutcome>;
    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool>;
}
