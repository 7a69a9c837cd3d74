use uuid::Uuid;

use crate::application::dto::applications::ApplicationWithLines;
use crate::application::ports::application_repository::ApplicationRepository;
use crate::application::ports::line_repository::LineRepository;
use crate::application::use_cases::applications::ApplicationError;
use crate::application::use_cases::applications::provision_lines::ProvisionLines;

/// Admin detail view. Provisions missing lines first so the response always
/// carries `line_count` lines.
pub struct GetApplication<'a, A, L>
where
    A: ApplicationRepository + ?Sized,
    L: LineRepository + ?Sized,
{
    pub applications: &'a A,
    pub lines: &'a L,
}

impl<'a, A, L> GetApplication<'a, A, L>
where
    A: ApplicationRepository + ?Sized,
    L: LineRepository + ?Sized,
{
    pub async fn execute(&self, id: Uuid) -> Result<ApplicationWithLines, ApplicationError> {
        ProvisionLines { lines: self.lines }.execute(id).await?;
        let application = self
            .applications
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::NotFound)?;
        let lines = self.lines.list_for_application(id).await?;
        Ok(ApplicationWithLines { application, lines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{InMemoryStore, application_fixture};
    use crate::domain::tags::tag::TagType;

    #[tokio::test]
    async fn detail_has_exactly_line_count_lines_with_tags() {
        let store = InMemoryStore::new();
        let shelf = store.seed_tag("Shelf A", TagType::SimLocation);
        let mut app = application_fixture("g@example.com");
        app.line_count = 2;
        let app = store.seed_application(app, 1);
        store.seed_line(app.id, (Some(shelf.id), None));
        let uc = GetApplication {
            applications: &store,
            lines: &store,
        };

        for _ in 0..2 {
            let got = uc.execute(app.id).await.unwrap();
            assert_eq!(got.application.id, app.id);
            assert_eq!(got.lines.len(), 2);
        }
        let got = uc.execute(app.id).await.unwrap();
        let tagged = got.lines.iter().filter(|l| l.sim_location.is_some()).count();
        assert_eq!(tagged, 1);
    }

    #[tokio::test]
    async fn missing_application_is_not_found() {
        let store = InMemoryStore::new();
        let res = GetApplication {
            applications: &store,
            lines: &store,
        }
        .execute(Uuid::new_v4())
        .await;
        assert!(matches!(res, Err(ApplicationError::NotFound)));
    }
}
