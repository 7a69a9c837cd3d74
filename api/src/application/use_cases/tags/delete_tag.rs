use tracing::info;
use uuid::Uuid;

use crate::application::ports::tag_repository::{TagDelete, TagRepository};
use crate::application::use_cases::tags::TagError;

/// Refuses while any line references the tag through either slot.
pub struct DeleteTag<'a, R: TagRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: TagRepository + ?Sized> DeleteTag<'a, R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), TagError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(TagError::NotFound);
        }
        let used = self.repo.usage_count(id).await?;
        if used > 0 {
            return Err(TagError::InUse(used));
        }
        match self.repo.delete(id).await? {
            TagDelete::Deleted => {
                info!(tag_id = %id, "tag deleted");
                Ok(())
            }
            TagDelete::NotFound => Err(TagError::NotFound),
            // Assigned to a line after the count above.
            TagDelete::InUse => Err(TagError::InUse(self.repo.usage_count(id).await?.max(1))),
        }
    }
}
