use uuid::Uuid;

use crate::application::ports::line_repository::{LinePatch, LineRepository};
use crate::application::ports::tag_repository::TagRepository;
use crate::application::use_cases::lines::{LineError, check_tag_slot};
use crate::domain::dates::parse_date_input;
use crate::domain::lines::line::LineWithTags;
use crate::domain::tags::tag::TagType;

pub struct UpdateLine<'a, L, T>
where
    L: LineRepository + ?Sized,
    T: TagRepository + ?Sized,
{
    pub lines: &'a L,
    pub tags: &'a T,
}

/// Field-by-field edit. `Some(None)` or an empty string clears a column.
#[derive(Debug, Clone, Default)]
pub struct LineUpdate {
    pub phone_number: Option<Option<String>>,
    pub iccid: Option<Option<String>>,
    pub line_status: Option<String>,
    pub shipment_date: Option<Option<String>>,
    pub return_date: Option<Option<String>>,
    pub contract_month: Option<Option<String>>,
    pub sim_location_id: Option<Option<Uuid>>,
    pub spare_tag_id: Option<Option<Uuid>>,
}

fn clearable(v: Option<Option<String>>) -> Option<Option<String>> {
    v.map(|inner| inner.filter(|s| !s.trim().is_empty()))
}

fn date(v: Option<Option<String>>) -> Result<Option<Option<chrono::NaiveDate>>, LineError> {
    match v {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(Some(s)) => Ok(Some(parse_date_input(&s)?)),
    }
}

impl<'a, L, T> UpdateLine<'a, L, T>
where
    L: LineRepository + ?Sized,
    T: TagRepository + ?Sized,
{
    pub async fn execute(&self, id: Uuid, update: LineUpdate) -> Result<LineWithTags, LineError> {
        if let Some(Some(tag_id)) = update.sim_location_id {
            check_tag_slot(self.tags, tag_id, TagType::SimLocation).await?;
        }
        if let Some(Some(tag_id)) = update.spare_tag_id {
            check_tag_slot(self.tags, tag_id, TagType::Spare).await?;
        }
        let patch = LinePatch {
            phone_number: clearable(update.phone_number),
            iccid: clearable(update.iccid),
            line_status: update.line_status.as_deref().map(str::parse).transpose()?,
            shipment_date: date(update.shipment_date)?,
            return_date: date(update.return_date)?,
            contract_month: clearable(update.contract_month),
            sim_location_id: update.sim_location_id,
            spare_tag_id: update.spare_tag_id,
        };
        self.lines
            .update(id, &patch)
            .await?
            .ok_or(LineError::NotFound("line"))?;
        self.lines
            .find_with_tags(id)
            .await?
            .ok_or(LineError::NotFound("line"))
    }
}
