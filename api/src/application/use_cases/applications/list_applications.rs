use std::collections::HashMap;

use uuid::Uuid;

use crate::application::dto::applications::{ApplicationPageDto, ApplicationWithLines};
use crate::application::ports::application_repository::{
    ApplicationFilter, ApplicationRepository,
};
use crate::application::ports::line_repository::LineRepository;
use crate::application::use_cases::applications::ApplicationError;
use crate::domain::applications::application::ApplicationStatus;
use crate::domain::lines::line::LineWithTags;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

pub struct ListApplications<'a, A, L>
where
    A: ApplicationRepository + ?Sized,
    L: LineRepository + ?Sized,
{
    pub applications: &'a A,
    pub lines: &'a L,
}

#[derive(Debug, Clone, Default)]
pub struct ListApplicationsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// `all` or blank means no status filter.
    pub status: Option<String>,
    pub search: Option<String>,
}

impl<'a, A, L> ListApplications<'a, A, L>
where
    A: ApplicationRepository + ?Sized,
    L: LineRepository + ?Sized,
{
    pub async fn execute(&self, q: &ListApplicationsQuery) -> Result<ApplicationPageDto, ApplicationError> {
        let page = q.page.unwrap_or(1).max(1);
        let limit = q.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let status: Option<ApplicationStatus> = match q.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(s) => Some(s.parse()?),
        };
        let search = q
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| ApplicationError::BadRequest("page is out of range".into()))?;
        let filter = ApplicationFilter {
            status,
            search,
            offset,
            limit,
        };
        let (apps, total) = self.applications.list(&filter).await?;
        let ids: Vec<Uuid> = apps.iter().map(|a| a.id).collect();
        let mut by_app: HashMap<Uuid, Vec<LineWithTags>> = HashMap::new();
        if !ids.is_empty() {
            for line in self.lines.list_for_applications(&ids).await? {
                by_app.entry(line.line.application_id).or_default().push(line);
            }
        }

        let items = apps
            .into_iter()
            .map(|application| ApplicationWithLines {
                lines: by_app.remove(&application.id).unwrap_or_default(),
                application,
            })
            .collect();
        Ok(ApplicationPageDto {
            items,
            page,
            limit,
            total,
        })
    }
}
