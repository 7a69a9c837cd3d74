use crate::application::dto::applications::DuplicateReportDto;
use crate::application::ports::application_repository::ApplicationRepository;
use crate::application::services::duplicates::group_by_email;

pub struct FindDuplicates<'a, R: ApplicationRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ApplicationRepository + ?Sized> FindDuplicates<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<DuplicateReportDto> {
        let applications = self.repo.list_non_draft().await?;
        Ok(DuplicateReportDto {
            groups: group_by_email(applications),
        })
    }
}
