use std::collections::HashMap;

use uuid::Uuid;

use crate::application::access::{CustomerIdentity, owned_applications};
use crate::application::dto::lines::{CustomerLineDto, LineSummaryDto};
use crate::application::ports::application_repository::ApplicationRepository;
use crate::application::ports::line_repository::LineRepository;
use crate::domain::applications::application::Application;

pub struct ListCustomerLines<'a, A, L>
where
    A: ApplicationRepository + ?Sized,
    L: LineRepository + ?Sized,
{
    pub applications: &'a A,
    pub lines: &'a L,
}

impl<'a, A, L> ListCustomerLines<'a, A, L>
where
    A: ApplicationRepository + ?Sized,
    L: LineRepository + ?Sized,
{
    pub async fn execute(
        &self,
        who: &CustomerIdentity,
    ) -> anyhow::Result<(Vec<CustomerLineDto>, LineSummaryDto)> {
        let apps = owned_applications(self.applications, who).await?;
        if apps.is_empty() {
            return Ok((Vec::new(), LineSummaryDto::default()));
        }
        let ids: Vec<Uuid> = apps.iter().map(|a| a.id).collect();
        let lines = self.lines.list_for_applications(&ids).await?;
        let summary = LineSummaryDto::from_lines(&lines);
        let by_id: HashMap<Uuid, Application> = apps.into_iter().map(|a| (a.id, a)).collect();
        let items = lines
            .into_iter()
            .filter_map(|line| {
                let application = by_id.get(&line.line.application_id)?.clone();
                Some(CustomerLineDto { line, application })
            })
            .collect();
        Ok((items, summary))
    }
}
