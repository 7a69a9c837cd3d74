pub mod create_line;
pub mod delete_line;
pub mod get_customer_line;
pub mod list_customer_lines;
pub mod update_line;

use uuid::Uuid;

use crate::application::ports::tag_repository::TagRepository;
use crate::domain::UnknownVariant;
use crate::domain::dates::InvalidDate;
use crate::domain::tags::tag::TagType;

#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("this line belongs to another customer")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<UnknownVariant> for LineError {
    fn from(e: UnknownVariant) -> Self {
        LineError::BadRequest(e.to_string())
    }
}

impl From<InvalidDate> for LineError {
    fn from(e: InvalidDate) -> Self {
        LineError::BadRequest(e.to_string())
    }
}

/// A tag may only sit in the slot matching its type.
pub(crate) async fn check_tag_slot<T: TagRepository + ?Sized>(
    tags: &T,
    tag_id: Uuid,
    slot: TagType,
) -> Result<(), LineError> {
    let tag = tags
        .find_by_id(tag_id)
        .await?
        .ok_or_else(|| LineError::BadRequest(format!("unknown tag {tag_id}")))?;
    if tag.tag_type != slot {
        return Err(LineError::BadRequest(format!(
            "tag {:?} is a {} tag and cannot be used as {}",
            tag.name, tag.tag_type, slot
        )));
    }
    Ok(())
}
