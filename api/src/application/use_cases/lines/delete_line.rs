use tracing::info;
use uuid::Uuid;

use crate::application::ports::line_repository::LineRepository;
use crate::application::use_cases::lines::LineError;

pub struct DeleteLine<'a, L: LineRepository + ?Sized> {
    pub lines: &'a L,
}

impl<'a, L: LineRepository + ?Sized> DeleteLine<'a, L> {
    pub async fn execute(&self, id: Uuid) -> Result<(), LineError> {
        if !self.lines.delete(id).await? {
            return Err(LineError::NotFound("line"));
        }
        info!(line_id = %id, "line deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{InMemoryStore, application_fixture};

    #[tokio::test]
    async fn deletes_once() {
        let store = InMemoryStore::new();
        let app = store.seed_application(application_fixture("l@example.com"), 1);
        let line = store.seed_line(app.id, (None, None));
        let uc = DeleteLine { lines: &store };

        uc.execute(line.id).await.unwrap();
        assert_eq!(store.line_count_for(app.id), 0);
        assert!(matches!(uc.execute(line.id).await, Err(LineError::NotFound("line"))));
    }
}
