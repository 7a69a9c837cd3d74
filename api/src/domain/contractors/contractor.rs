use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::applications::application::{ApplicantType, Application, join_name};

/// Canonical customer identity shared by every application merged under one email.
#[derive(Debug, Clone)]
pub struct Contractor {
    pub id: Uuid,
    pub email: String,
    pub contractor_type: ApplicantType,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name_kana: Option<String>,
    pub first_name_kana: Option<String>,
    pub company_name: Option<String>,
    pub company_name_kana: Option<String>,
    pub corporate_number: Option<String>,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
    pub id_card_front_url: Option<String>,
    pub id_card_back_url: Option<String>,
    pub registration_url: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub password_hash: Option<String>,
    pub must_change_password: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contractor {
    pub fn display_name(&self) -> String {
        match self.contractor_type {
            ApplicantType::Corporate => self.company_name.clone().unwrap_or_default(),
            ApplicantType::Individual => join_name(&self.last_name, &self.first_name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewContractor {
    pub email: String,
    pub contractor_type: ApplicantType,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name_kana: Option<String>,
    pub first_name_kana: Option<String>,
    pub company_name: Option<String>,
    pub company_name_kana: Option<String>,
    pub corporate_number: Option<String>,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
    pub id_card_front_url: Option<String>,
    pub id_card_back_url: Option<String>,
    pub registration_url: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub password_hash: Option<String>,
    pub must_change_password: bool,
}

impl NewContractor {
    /// Seeds a contractor from the application an operator picked as canonical.
    pub fn from_application(app: &Application) -> Self {
        Self {
            email: app.email.clone(),
            contractor_type: app.applicant_type,
            last_name: app.last_name.clone(),
            first_name: app.first_name.clone(),
            last_name_kana: app.last_name_kana.clone(),
            first_name_kana: app.first_name_kana.clone(),
            company_name: app.company_name.clone(),
            company_name_kana: app.company_name_kana.clone(),
            corporate_number: app.corporate_number.clone(),
            phone: Some(app.phone.clone()),
            postal_code: Some(app.postal_code.clone()),
            address: Some(app.address.clone()),
            id_card_front_url: app.id_card_front_url.clone(),
            id_card_back_url: app.id_card_back_url.clone(),
            registration_url: app.registration_url.clone(),
            expiration_date: app.expiration_date,
            password_hash: app.password_hash.clone(),
            must_change_password: app.password_hash.is_none(),
        }
    }
}
