use crate::application::ports::application_repository::ApplicationRepository;
use crate::application::use_cases::applications::ApplicationError;
use crate::domain::applications::application::Application;

pub struct GetDraft<'a, R: ApplicationRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ApplicationRepository + ?Sized> GetDraft<'a, R> {
    pub async fn execute(&self, email: &str) -> Result<Option<Application>, ApplicationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApplicationError::BadRequest("email is required".into()));
        }
        Ok(self.repo.latest_draft_for_email(email).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{InMemoryStore, application_fixture};
    use crate::domain::applications::application::ApplicationStatus;

    #[tokio::test]
    async fn returns_newest_draft_only() {
        let store = InMemoryStore::new();
        let mut older = application_fixture("d@example.com");
        older.status = ApplicationStatus::Draft;
        store.seed_application(older, 60);
        let mut newer = application_fixture("d@example.com");
        newer.status = ApplicationStatus::Draft;
        let newer = store.seed_application(newer, 5);
        store.seed_application(application_fixture("d@example.com"), 1);

        let found = GetDraft { repo: &store }
            .execute("d@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, newer.id);

        let none = GetDraft { repo: &store }.execute("x@example.com").await.unwrap();
        assert!(none.is_none());
        let blank = GetDraft { repo: &store }.execute(" ").await;
        assert!(matches!(blank, Err(ApplicationError::BadRequest(_))));
    }
}
