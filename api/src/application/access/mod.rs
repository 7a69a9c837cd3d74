use uuid::Uuid;

use crate::application::ports::application_repository::ApplicationRepository;
use crate::domain::applications::application::{Application, ApplicationStatus};

/// Who a customer session belongs to. Contractors are identified by id,
/// applicants that were never merged by the email on their application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerIdentity {
    Contractor { id: Uuid, email: String },
    Applicant { application_id: Uuid, email: String },
}

impl CustomerIdentity {
    pub fn email(&self) -> &str {
        match self {
            CustomerIdentity::Contractor { email, .. } => email,
            CustomerIdentity::Applicant { email, .. } => email,
        }
    }

    pub fn subject_id(&self) -> Uuid {
        match self {
            CustomerIdentity::Contractor { id, .. } => *id,
            CustomerIdentity::Applicant { application_id, .. } => *application_id,
        }
    }

    pub fn is_contractor(&self) -> bool {
        matches!(self, CustomerIdentity::Contractor { .. })
    }

    pub fn owns(&self, app: &Application) -> bool {
        match self {
            CustomerIdentity::Contractor { id, .. } => app.contractor_id == Some(*id),
            CustomerIdentity::Applicant { email, .. } => app.email == *email,
        }
    }
}

// Presentation layer builds CustomerIdentity from the session token.

pub async fn owned_applications<R>(
    repo: &R,
    who: &CustomerIdentity,
) -> anyhow::Result<Vec<Application>>
where
    R: ApplicationRepository + ?Sized,
{
    match who {
        CustomerIdentity::Contractor { id, .. } => repo.list_for_contractor(*id).await,
        CustomerIdentity::Applicant { email, .. } => {
            let apps = repo.list_non_draft_for_email(email).await?;
            Ok(apps
                .into_iter()
                .filter(|a| a.status != ApplicationStatus::Draft)
                .collect())
        }
    }
}
