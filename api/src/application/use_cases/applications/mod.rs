pub mod batch_update;
pub mod find_duplicates;
pub mod get_application;
pub mod get_draft;
pub mod list_applications;
pub mod provision_lines;
pub mod save_application;
pub mod update_application;

use chrono::NaiveDate;

use crate::domain::UnknownVariant;
use crate::domain::dates::parse_date_input;

#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("{0}")]
    BadRequest(String),
    #[error("application not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<UnknownVariant> for ApplicationError {
    fn from(e: UnknownVariant) -> Self {
        ApplicationError::BadRequest(e.to_string())
    }
}

pub(crate) fn parse_date_field(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, ApplicationError> {
    match raw {
        None => Ok(None),
        Some(s) => parse_date_input(s)
            .map_err(|e| ApplicationError::BadRequest(format!("{field}: {e}"))),
    }
}
