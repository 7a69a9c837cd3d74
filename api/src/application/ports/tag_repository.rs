use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::tags::tag::{Tag, TagType};

#[derive(Debug, Clone)]
pub struct NewTag {
    pub name: String,
    pub tag_type: TagType,
    pub color: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default)]
pub struct TagPatch {
    pub name: Option<String>,
    pub tag_type: Option<TagType>,
    pub color: Option<Option<String>>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone)]
pub enum TagWrite {
    Written(Tag),
    NameTaken,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagDelete {
    Deleted,
    NotFound,
    /// A line still references the tag.
    InUse,
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn list_tags(&self, tag_type: Option<TagType>) -> anyhow::Result<Vec<Tag>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Tag>>;
    async fn create(&self, tag: &NewTag) -> anyhow::Result<TagWrite>;
    async fn update(&self, id: Uuid, patch: &TagPatch) -> anyhow::Result<TagWrite>;
    /// Lines referencing the tag through either slot.
    async fn usage_count(&self, id: Uuid) -> anyhow::Result<i64>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<TagDelete>;
}
