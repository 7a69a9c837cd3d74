use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::applications::application::Application;
use crate::domain::lines::line::LineWithTags;

/// One step of the customer sign-up form. Every field is optional because
/// each step only sends what it collected; enums and dates arrive as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationForm {
    pub applicant_type: Option<String>,
    pub apply_type: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name_kana: Option<String>,
    pub first_name_kana: Option<String>,
    pub date_of_birth: Option<String>,
    pub company_name: Option<String>,
    pub company_name_kana: Option<String>,
    pub corporate_number: Option<String>,
    pub established_date: Option<String>,
    pub representative_last_name: Option<String>,
    pub representative_first_name: Option<String>,
    pub representative_birth_date: Option<String>,
    pub contact_last_name: Option<String>,
    pub contact_first_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
    pub mnp_reservation_number: Option<String>,
    pub mnp_expiry: Option<String>,
    pub current_carrier: Option<String>,
    pub plan_type: Option<String>,
    pub line_count: Option<i32>,
    pub total_amount: Option<i64>,
    pub id_card_front_url: Option<String>,
    pub id_card_back_url: Option<String>,
    pub registration_url: Option<String>,
    /// Portal password chosen by the applicant; stored hashed.
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApplicationWithLines {
    pub application: Application,
    pub lines: Vec<LineWithTags>,
}

#[derive(Debug, Clone)]
pub struct ApplicationPageDto {
    pub items: Vec<ApplicationWithLines>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

impl ApplicationPageDto {
    pub fn total_pages(&self) -> i64 {
        if self.limit <= 0 {
            return 0;
        }
        (self.total + self.limit - 1) / self.limit
    }
}

/// Applications sharing one email address.
#[derive(Debug, Clone)]
pub struct DuplicateGroupDto {
    pub email: String,
    pub applications: Vec<Application>,
}

impl DuplicateGroupDto {
    pub fn count(&self) -> usize {
        self.applications.len()
    }

    pub fn is_contractor_created(&self) -> bool {
        self.applications.iter().any(|a| a.contractor_id.is_some())
    }
}

#[derive(Debug, Clone)]
pub struct DuplicateReportDto {
    pub groups: Vec<DuplicateGroupDto>,
}

impl DuplicateReportDto {
    pub fn total_duplicate_emails(&self) -> usize {
        self.groups.len()
    }

    pub fn total_duplicate_applications(&self) -> usize {
        self.groups.iter().map(DuplicateGroupDto::count).sum()
    }
}
