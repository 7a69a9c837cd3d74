use chrono::{DateTime, NaiveDate};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date: {0:?}")]
pub struct InvalidDate(pub String);

/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD` or an RFC 3339 timestamp.
/// Blank input means "no date".
pub fn parse_date_input(raw: &str) -> Result<Option<NaiveDate>, InvalidDate> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(None);
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(Some(d));
        }
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| InvalidDate(s.to_string()))
}
