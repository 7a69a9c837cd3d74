use crate::application::access::CustomerIdentity;
use crate::application::ports::application_repository::ApplicationRepository;
use crate::application::ports::contractor_repository::ContractorRepository;
use crate::application::services::passwords::verify_password;
use crate::application::use_cases::auth::AuthError;
use crate::application::use_cases::auth::admin_login::LoginRequest;
use crate::domain::applications::application::ApplicantType;

pub struct CustomerLogin<'a, C, A>
where
    C: ContractorRepository + ?Sized,
    A: ApplicationRepository + ?Sized,
{
    pub contractors: &'a C,
    pub applications: &'a A,
}

#[derive(Debug, Clone)]
pub struct CustomerSession {
    pub identity: CustomerIdentity,
    pub name: String,
    pub contractor_type: ApplicantType,
    pub must_change_password: bool,
}

impl<'a, C, A> CustomerLogin<'a, C, A>
where
    C: ContractorRepository + ?Sized,
    A: ApplicationRepository + ?Sized,
{
    /// A contractor holding a password is authoritative for its email; the
    /// newest non-draft application is only consulted when there is none.
    pub async fn execute(&self, req: &LoginRequest) -> Result<CustomerSession, AuthError> {
        let email = req.email.trim();
        if email.is_empty() || req.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        if let Some(contractor) = self.contractors.find_by_email(email).await? {
            if contractor.password_hash.is_some() {
                if !verify_password(&req.password, contractor.password_hash.as_deref()) {
                    return Err(AuthError::InvalidCredentials);
                }
                self.contractors.touch_last_login(contractor.id).await?;
                return Ok(CustomerSession {
                    name: contractor.display_name(),
                    contractor_type: contractor.contractor_type,
                    must_change_password: contractor.must_change_password,
                    identity: CustomerIdentity::Contractor {
                        id: contractor.id,
                        email: contractor.email,
                    },
                });
            }
        }

        let Some(app) = self.applications.latest_with_password_for_email(email).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(&req.password, app.password_hash.as_deref()) {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(CustomerSession {
            name: app.display_name(),
            contractor_type: app.applicant_type,
            must_change_password: false,
            identity: CustomerIdentity::Applicant {
                application_id: app.id,
                email: app.email,
            },
        })
    }
}
