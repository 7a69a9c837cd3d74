use uuid::Uuid;

use crate::application::ports::tag_repository::{TagPatch, TagRepository, TagWrite};
use crate::application::use_cases::tags::TagError;
use crate::domain::tags::tag::{Tag, TagType};

pub struct UpdateTag<'a, R: TagRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone, Default)]
pub struct TagUpdate {
    pub name: Option<String>,
    pub tag_type: Option<String>,
    pub color: Option<Option<String>>,
    pub sort_order: Option<i32>,
}

impl<'a, R: TagRepository + ?Sized> UpdateTag<'a, R> {
    pub async fn execute(&self, id: Uuid, update: TagUpdate) -> Result<Tag, TagError> {
        let current = self.repo.find_by_id(id).await?.ok_or(TagError::NotFound)?;
        let name = match update.name.as_deref().map(str::trim) {
            Some("") => return Err(TagError::BadRequest("tag name must not be empty".into())),
            other => other.map(str::to_string),
        };
        let tag_type: Option<TagType> = update.tag_type.as_deref().map(str::parse).transpose()?;
        if tag_type.is_some_and(|t| t != current.tag_type) {
            let used = self.repo.usage_count(id).await?;
            if used > 0 {
                return Err(TagError::InUse(used));
            }
        }
        let patch = TagPatch {
            name,
            tag_type,
            color: update
                .color
                .map(|c| c.filter(|s| !s.trim().is_empty())),
            sort_order: update.sort_order,
        };
        match self.repo.update(id, &patch).await? {
            TagWrite::Written(tag) => Ok(tag),
            TagWrite::NameTaken => Err(TagError::NameTaken),
            TagWrite::NotFound => Err(TagError::NotFound),
        }
    }
}
