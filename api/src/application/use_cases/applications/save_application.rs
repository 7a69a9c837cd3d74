use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::dto::applications::ApplicationForm;
use crate::application::ports::application_repository::{
    ApplicationFields, ApplicationRepository,
};
use crate::application::services::passwords::{MIN_PASSWORD_LEN, hash_password};
use crate::application::services::pricing::form_line_limit;
use crate::application::use_cases::applications::{ApplicationError, parse_date_field};
use crate::domain::applications::application::{ApplicantType, Application, ApplicationStatus};

/// Step-wise upsert of the customer sign-up form.
pub struct SaveApplication<'a, R: ApplicationRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct SaveApplicationInput {
    pub id: Option<Uuid>,
    pub step: Option<i32>,
    pub status: String,
    pub form: ApplicationForm,
}

impl<'a, R: ApplicationRepository + ?Sized> SaveApplication<'a, R> {
    pub async fn execute(&self, input: SaveApplicationInput) -> Result<Application, ApplicationError> {
        let status: ApplicationStatus = input.status.parse()?;
        if !matches!(status, ApplicationStatus::Draft | ApplicationStatus::Submitted) {
            return Err(ApplicationError::BadRequest(
                "status must be draft or submitted".into(),
            ));
        }
        let mut fields = form_to_fields(&input.form)?;
        fields.status = Some(status);
        if status == ApplicationStatus::Submitted {
            fields.submitted_at = Some(Utc::now());
        }

        match input.id {
            Some(id) => {
                let existing = self
                    .repo
                    .find_by_id(id)
                    .await?
                    .ok_or(ApplicationError::NotFound)?;
                if existing.status != ApplicationStatus::Draft {
                    return Err(already_submitted());
                }
                check_line_count(&fields, existing.applicant_type, existing.line_count)?;
                // None here means the row left draft after the read above.
                let app = self
                    .repo
                    .update_draft(id, &fields)
                    .await?
                    .ok_or_else(already_submitted)?;
                debug!(application_id = %id, step = ?input.step, status = %status, "application saved");
                Ok(app)
            }
            None => {
                check_line_count(&fields, ApplicantType::Individual, 0)?;
                fields.plan_type.get_or_insert_with(String::new);
                fields.line_count.get_or_insert(0);
                fields.total_amount.get_or_insert(0);
                let app = self.repo.insert(&fields).await?;
                info!(application_id = %app.id, step = ?input.step, status = %status, "application created");
                Ok(app)
            }
        }
    }
}

fn already_submitted() -> ApplicationError {
    ApplicationError::BadRequest("application has already been submitted".into())
}

/// Stored values stand in for whichever of the two fields the step omits.
fn check_line_count(
    fields: &ApplicationFields,
    current_type: ApplicantType,
    current_count: i32,
) -> Result<(), ApplicationError> {
    if fields.line_count.is_none() && fields.applicant_type.is_none() {
        return Ok(());
    }
    let n = fields.line_count.unwrap_or(current_count);
    let applicant_type = fields.applicant_type.unwrap_or(current_type);
    let max = form_line_limit(applicant_type);
    if !(0..=max).contains(&n) {
        return Err(ApplicationError::BadRequest(format!(
            "lineCount must be between 0 and {max} for {applicant_type} applicants"
        )));
    }
    Ok(())
}

fn text(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn form_to_fields(form: &ApplicationForm) -> Result<ApplicationFields, ApplicationError> {
    let password_hash = match text(&form.password) {
        Some(p) if p.chars().count() < MIN_PASSWORD_LEN => {
            return Err(ApplicationError::BadRequest(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Some(p) => Some(hash_password(p)?),
        None => None,
    };

    Ok(ApplicationFields {
        applicant_type: text(&form.applicant_type).map(str::parse).transpose()?,
        apply_type: text(&form.apply_type).map(str::parse).transpose()?,
        last_name: form.last_name.clone(),
        first_name: form.first_name.clone(),
        last_name_kana: form.last_name_kana.clone(),
        first_name_kana: form.first_name_kana.clone(),
        date_of_birth: parse_date_field("dateOfBirth", form.date_of_birth.as_deref())?,
        company_name: form.company_name.clone(),
        company_name_kana: form.company_name_kana.clone(),
        corporate_number: form.corporate_number.clone(),
        established_date: parse_date_field("establishedDate", form.established_date.as_deref())?,
        representative_last_name: form.representative_last_name.clone(),
        representative_first_name: form.representative_first_name.clone(),
        representative_birth_date: parse_date_field(
            "representativeBirthDate",
            form.representative_birth_date.as_deref(),
        )?,
        contact_last_name: form.contact_last_name.clone(),
        contact_first_name: form.contact_first_name.clone(),
        email: text(&form.email).map(str::to_string),
        phone: form.phone.clone(),
        postal_code: form.postal_code.clone(),
        address: form.address.clone(),
        mnp_reservation_number: form.mnp_reservation_number.clone(),
        mnp_expiry: parse_date_field("mnpExpiry", form.mnp_expiry.as_deref())?,
        current_carrier: form.current_carrier.clone(),
        plan_type: form.plan_type.clone(),
        line_count: form.line_count,
        total_amount: form.total_amount,
        id_card_front_url: form.id_card_front_url.clone(),
        id_card_back_url: form.id_card_back_url.clone(),
        registration_url: form.registration_url.clone(),
        status: None,
        password_hash,
        contractor_id: None,
        submitted_at: None,
    })
}
