use chrono::Utc;
use tracing::info;

use crate::application::access::{CustomerIdentity, owned_applications};
use crate::application::ports::application_repository::{
    ApplicationFields, ApplicationRepository,
};
use crate::application::ports::contractor_repository::ContractorRepository;
use crate::application::services::pricing::quote;
use crate::application::use_cases::customers::CustomerError;
use crate::domain::applications::application::{Application, ApplicationStatus, ApplyType};
use crate::domain::contractors::contractor::Contractor;

/// Repeat order from the customer portal. Creates a submitted application
/// that copies the customer's identity and carries the quoted total.
pub struct AdditionalOrder<'a, C, A>
where
    C: ContractorRepository + ?Sized,
    A: ApplicationRepository + ?Sized,
{
    pub contractors: &'a C,
    pub applications: &'a A,
}

#[derive(Debug, Clone)]
pub struct AdditionalOrderInput {
    pub plan_type: String,
    pub line_count: i32,
}

fn fields_from_contractor(c: &Contractor) -> ApplicationFields {
    ApplicationFields {
        applicant_type: Some(c.contractor_type),
        last_name: c.last_name.clone(),
        first_name: c.first_name.clone(),
        last_name_kana: c.last_name_kana.clone(),
        first_name_kana: c.first_name_kana.clone(),
        company_name: c.company_name.clone(),
        company_name_kana: c.company_name_kana.clone(),
        corporate_number: c.corporate_number.clone(),
        email: Some(c.email.clone()),
        phone: Some(c.phone.clone().unwrap_or_default()),
        postal_code: Some(c.postal_code.clone().unwrap_or_default()),
        address: Some(c.address.clone().unwrap_or_default()),
        id_card_front_url: c.id_card_front_url.clone(),
        id_card_back_url: c.id_card_back_url.clone(),
        registration_url: c.registration_url.clone(),
        contractor_id: Some(c.id),
        ..Default::default()
    }
}

fn fields_from_application(a: &Application) -> ApplicationFields {
    ApplicationFields {
        applicant_type: Some(a.applicant_type),
        last_name: a.last_name.clone(),
        first_name: a.first_name.clone(),
        last_name_kana: a.last_name_kana.clone(),
        first_name_kana: a.first_name_kana.clone(),
        date_of_birth: a.date_of_birth,
        company_name: a.company_name.clone(),
        company_name_kana: a.company_name_kana.clone(),
        corporate_number: a.corporate_number.clone(),
        established_date: a.established_date,
        representative_last_name: a.representative_last_name.clone(),
        representative_first_name: a.representative_first_name.clone(),
        representative_birth_date: a.representative_birth_date,
        contact_last_name: a.contact_last_name.clone(),
        contact_first_name: a.contact_first_name.clone(),
        email: Some(a.email.clone()),
        phone: Some(a.phone.clone()),
        postal_code: Some(a.postal_code.clone()),
        address: Some(a.address.clone()),
        id_card_front_url: a.id_card_front_url.clone(),
        id_card_back_url: a.id_card_back_url.clone(),
        registration_url: a.registration_url.clone(),
        contractor_id: a.contractor_id,
        ..Default::default()
    }
}

impl<'a, C, A> AdditionalOrder<'a, C, A>
where
    C: ContractorRepository + ?Sized,
    A: ApplicationRepository + ?Sized,
{
    pub async fn execute(
        &self,
        who: &CustomerIdentity,
        input: &AdditionalOrderInput,
    ) -> Result<Application, CustomerError> {
        let q = quote(input.plan_type.trim(), input.line_count)
            .map_err(|e| CustomerError::BadRequest(e.to_string()))?;

        let mut fields = match who {
            CustomerIdentity::Contractor { id, .. } => {
                let contractor = self
                    .contractors
                    .find_by_id(*id)
                    .await?
                    .ok_or(CustomerError::Unauthorized)?;
                fields_from_contractor(&contractor)
            }
            CustomerIdentity::Applicant { .. } => {
                let apps = owned_applications(self.applications, who).await?;
                let newest = apps.iter().max_by_key(|a| a.created_at).ok_or_else(|| {
                    CustomerError::NotFound("no previous application to copy from".into())
                })?;
                fields_from_application(newest)
            }
        };
        fields.apply_type = Some(ApplyType::New);
        fields.plan_type = Some(q.plan.as_str().to_string());
        fields.line_count = Some(q.line_count);
        fields.total_amount = Some(q.total_amount);
        fields.status = Some(ApplicationStatus::Submitted);
        fields.submitted_at = Some(Utc::now());

        let app = self.applications.insert(&fields).await?;
        info!(
            application_id = %app.id,
            plan = q.plan.as_str(),
            line_count = q.line_count,
            total_amount = q.total_amount,
            "additional order placed"
        );
        Ok(app)
    }
}
