use tracing::info;
use uuid::Uuid;

use crate::application::ports::line_repository::{LineRepository, NewLine};
use crate::application::ports::tag_repository::TagRepository;
use crate::application::use_cases::lines::{LineError, check_tag_slot};
use crate::domain::lines::line::{LineStatus, LineWithTags};
use crate::domain::tags::tag::TagType;

pub struct CreateLine<'a, L, T>
where
    L: LineRepository + ?Sized,
    T: TagRepository + ?Sized,
{
    pub lines: &'a L,
    pub tags: &'a T,
}

#[derive(Debug, Clone, Default)]
pub struct CreateLineInput {
    pub application_id: Uuid,
    pub phone_number: Option<String>,
    pub iccid: Option<String>,
    pub line_status: Option<String>,
    pub sim_location_id: Option<Uuid>,
    pub spare_tag_id: Option<Uuid>,
}

impl<'a, L, T> CreateLine<'a, L, T>
where
    L: LineRepository + ?Sized,
    T: TagRepository + ?Sized,
{
    pub async fn execute(&self, input: CreateLineInput) -> Result<LineWithTags, LineError> {
        let line_status = match input.line_status.as_deref().map(str::trim) {
            None | Some("") => LineStatus::NotOpened,
            Some(s) => s.parse()?,
        };
        if let Some(id) = input.sim_location_id {
            check_tag_slot(self.tags, id, TagType::SimLocation).await?;
        }
        if let Some(id) = input.spare_tag_id {
            check_tag_slot(self.tags, id, TagType::Spare).await?;
        }
        let blank_to_none = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let line = self
            .lines
            .create(&NewLine {
                application_id: input.application_id,
                phone_number: blank_to_none(input.phone_number),
                iccid: blank_to_none(input.iccid),
                line_status,
                sim_location_id: input.sim_location_id,
                spare_tag_id: input.spare_tag_id,
            })
            .await?
            .ok_or(LineError::NotFound("application"))?;
        info!(line_id = %line.id, application_id = %line.application_id, "line created");
        self.lines
            .find_with_tags(line.id)
            .await?
            .ok_or(LineError::NotFound("line"))
    }
}
