use tracing::info;

use crate::application::ports::tag_repository::{NewTag, TagRepository, TagWrite};
use crate::application::use_cases::tags::TagError;
use crate::domain::tags::tag::Tag;

pub struct CreateTag<'a, R: TagRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone, Default)]
pub struct CreateTagInput {
    pub name: String,
    pub tag_type: String,
    pub color: Option<String>,
    pub sort_order: Option<i32>,
}

impl<'a, R: TagRepository + ?Sized> CreateTag<'a, R> {
    pub async fn execute(&self, input: CreateTagInput) -> Result<Tag, TagError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(TagError::BadRequest("tag name is required".into()));
        }
        let new = NewTag {
            name: name.to_string(),
            tag_type: input.tag_type.trim().parse()?,
            color: input.color.filter(|c| !c.trim().is_empty()),
            sort_order: input.sort_order.unwrap_or(0),
        };
        match self.repo.create(&new).await? {
            TagWrite::Written(tag) => {
                info!(tag_id = %tag.id, name = %tag.name, "tag created");
                Ok(tag)
            }
            TagWrite::NameTaken => Err(TagError::NameTaken),
            TagWrite::NotFound => Err(TagError::NotFound),
        }
    }
}
