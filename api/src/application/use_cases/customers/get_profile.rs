use crate::application::access::{CustomerIdentity, owned_applications};
use crate::application::ports::application_repository::ApplicationRepository;
use crate::application::ports::contractor_repository::ContractorRepository;
use crate::application::use_cases::customers::CustomerError;
use crate::domain::applications::application::{ApplicantType, Application};
use crate::domain::contractors::contractor::Contractor;

pub struct GetProfile<'a, C, A>
where
    C: ContractorRepository + ?Sized,
    A: ApplicationRepository + ?Sized,
{
    pub contractors: &'a C,
    pub applications: &'a A,
}

#[derive(Debug, Clone)]
pub struct CustomerProfile {
    pub identity: CustomerIdentity,
    pub name: String,
    pub contractor_type: ApplicantType,
    pub must_change_password: bool,
    pub contractor: Option<Contractor>,
    /// Newest first.
    pub applications: Vec<Application>,
}

impl<'a, C, A> GetProfile<'a, C, A>
where
    C: ContractorRepository + ?Sized,
    A: ApplicationRepository + ?Sized,
{
    pub async fn execute(&self, who: &CustomerIdentity) -> Result<CustomerProfile, CustomerError> {
        let applications = owned_applications(self.applications, who).await?;
        match who {
            CustomerIdentity::Contractor { id, .. } => {
                let contractor = self
                    .contractors
                    .find_by_id(*id)
                    .await?
                    .ok_or(CustomerError::Unauthorized)?;
                Ok(CustomerProfile {
                    identity: who.clone(),
                    name: contractor.display_name(),
                    contractor_type: contractor.contractor_type,
                    must_change_password: contractor.must_change_password,
                    contractor: Some(contractor),
                    applications,
                })
            }
            CustomerIdentity::Applicant { application_id, .. } => {
                let session_app = match applications.iter().find(|a| a.id == *application_id) {
                    Some(a) => a.clone(),
                    None => self
                        .applications
                        .find_by_id(*application_id)
                        .await?
                        .ok_or(CustomerError::Unauthorized)?,
                };
                Ok(CustomerProfile {
                    identity: who.clone(),
                    name: session_app.display_name(),
                    contractor_type: session_app.applicant_type,
                    must_change_password: false,
                    contractor: None,
                    applications,
                })
            }
        }
    }
}
