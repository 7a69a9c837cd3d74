use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::text_enum;

text_enum! {
    /// Which slot of a line a tag may occupy.
    TagType {
        SimLocation => "sim_location",
        Spare => "spare",
    }
}

#[derive(Debug, Clone)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub tag_type: TagType,
    pub color: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
