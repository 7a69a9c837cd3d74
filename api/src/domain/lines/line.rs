use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::tags::tag::Tag;
use crate::domain::text_enum;

text_enum! {
    LineStatus {
        NotOpened => "not_opened",
        Opened => "opened",
        Shipped => "shipped",
        WaitingReturn => "waiting_return",
        Returned => "returned",
        Canceled => "canceled",
    }
}

#[derive(Debug, Clone)]
pub struct Line {
    pub id: Uuid,
    pub application_id: Uuid,
    pub phone_number: Option<String>,
    pub iccid: Option<String>,
    pub line_status: LineStatus,
    pub shipment_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub contract_month: Option<String>,
    pub sim_location_id: Option<Uuid>,
    pub spare_tag_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line with both tag references resolved.
#[derive(Debug, Clone)]
pub struct LineWithTags {
    pub line: Line,
    pub sim_location: Option<Tag>,
    pub spare_tag: Option<Tag>,
}
