use uuid::Uuid;

use crate::application::access::CustomerIdentity;
use crate::application::dto::lines::CustomerLineDto;
use crate::application::ports::application_repository::ApplicationRepository;
use crate::application::ports::line_repository::LineRepository;
use crate::application::use_cases::lines::LineError;

pub struct GetCustomerLine<'a, A, L>
where
    A: ApplicationRepository + ?Sized,
    L: LineRepository + ?Sized,
{
    pub applications: &'a A,
    pub lines: &'a L,
}

impl<'a, A, L> GetCustomerLine<'a, A, L>
where
    A: ApplicationRepository + ?Sized,
    L: LineRepository + ?Sized,
{
    pub async fn execute(&self, who: &CustomerIdentity, id: Uuid) -> Result<CustomerLineDto, LineError> {
        let line = self
            .lines
            .find_with_tags(id)
            .await?
            .ok_or(LineError::NotFound("line"))?;
        let application = self
            .applications
            .find_by_id(line.line.application_id)
            .await?
            .ok_or(LineError::NotFound("application"))?;
        if !who.owns(&application) {
            return Err(LineError::Forbidden);
        }
        Ok(CustomerLineDto { line, application })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{InMemoryStore, application_fixture};

    #[tokio::test]
    async fn owner_gets_line_others_are_forbidden() {
        let store = InMemoryStore::new();
        let app = store.seed_application(application_fixture("me@example.com"), 1);
        let line = store.seed_line(app.id, (None, None));
        let uc = GetCustomerLine {
            applications: &store,
            lines: &store,
        };

        let me = CustomerIdentity::Applicant {
            application_id: app.id,
            email: "me@example.com".into(),
        };
        let got = uc.execute(&me, line.id).await.unwrap();
        assert_eq!(got.application.id, app.id);

        let stranger = CustomerIdentity::Contractor {
            id: Uuid::new_v4(),
            email: "me@example.com".into(),
        };
        assert!(matches!(
            uc.execute(&stranger, line.id).await,
            Err(LineError::Forbidden)
        ));
        assert!(matches!(
            uc.execute(&me, Uuid::new_v4()).await,
            Err(LineError::NotFound("line"))
        ));
    }
}
