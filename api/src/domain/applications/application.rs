use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::text_enum;

text_enum! {
    ApplicantType {
        Individual => "individual",
        Corporate => "corporate",
    }
}

text_enum! {
    /// New number or a number ported in from another carrier (MNP).
    ApplyType {
        New => "new",
        Mnp => "mnp",
    }
}

text_enum! {
    ApplicationStatus {
        Draft => "draft",
        Submitted => "submitted",
        Processing => "processing",
        Completed => "completed",
    }
}

text_enum! {
    VerificationStatus {
        Unverified => "unverified",
        Verified => "verified",
        Issue => "issue",
    }
}

text_enum! {
    PaymentStatus {
        NotIssued => "not_issued",
        Issued => "issued",
        Paid => "paid",
    }
}

#[derive(Debug, Clone)]
pub struct Application {
    pub id: Uuid,
    pub applicant_type: ApplicantType,
    pub apply_type: ApplyType,
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
    pub email: String,
    pub phone: String,
    pub postal_code: String,
    pub address: String,
    pub mnp_reservation_number: Option<String>,
    pub mnp_expiry: Option<NaiveDate>,
    pub current_carrier: Option<String>,
    pub plan_type: String,
    pub line_count: i32,
    pub total_amount: i64,
    pub id_card_front_url: Option<String>,
    pub id_card_back_url: Option<String>,
    pub registration_url: Option<String>,
    pub status: ApplicationStatus,
    pub verification_status: VerificationStatus,
    pub payment_status: PaymentStatus,
    pub comment1: Option<String>,
    pub comment2: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub password_hash: Option<String>,
    pub contractor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Application {
    /// Company name for corporate applicants, "last first" otherwise.
    pub fn display_name(&self) -> String {
        match self.applicant_type {
            ApplicantType::Corporate => self.company_name.clone().unwrap_or_default(),
            ApplicantType::Individual => join_name(&self.last_name, &self.first_name),
        }
    }
}

pub(crate) fn join_name(last: &Option<String>, first: &Option<String>) -> String {
    format!(
        "{} {}",
        last.as_deref().unwrap_or(""),
        first.as_deref().unwrap_or("")
    )
    .trim()
    .to_string()
}
