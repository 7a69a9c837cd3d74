use std::collections::BTreeMap;

use crate::domain::applications::application::Application;
use crate::domain::lines::line::{LineStatus, LineWithTags};

#[derive(Debug, Clone)]
pub struct CustomerLineDto {
    pub line: LineWithTags,
    pub application: Application,
}

#[derive(Debug, Clone, Default)]
pub struct LineSummaryDto {
    pub total: usize,
    pub by_status: BTreeMap<&'static str, usize>,
}

impl LineSummaryDto {
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a LineWithTags>) -> Self {
        let mut out = LineSummaryDto::default();
        for l in lines {
            out.total += 1;
            *out.by_status.entry(l.line.line_status.as_str()).or_insert(0) += 1;
        }
        out
    }

    pub fn count(&self, status: LineStatus) -> usize {
        self.by_status.get(status.as_str()).copied().unwrap_or(0)
    }
}
