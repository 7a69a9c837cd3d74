pub mod create_tag;
pub mod delete_tag;
pub mod list_tags;
pub mod update_tag;

use crate::domain::UnknownVariant;

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("{0}")]
    BadRequest(String),
    #[error("a tag with this name already exists")]
    NameTaken,
    #[error("tag is used by {0} line(s)")]
    InUse(i64),
    #[error("tag not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<UnknownVariant> for TagError {
    fn from(e: UnknownVariant) -> Self {
        TagError::BadRequest(e.to_string())
    }
}
