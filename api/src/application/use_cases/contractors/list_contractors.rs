use crate::application::dto::contractors::ContractorWithApplicationsDto;
use crate::application::ports::contractor_repository::ContractorRepository;

pub struct ListContractors<'a, R: ContractorRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ContractorRepository + ?Sized> ListContractors<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<Vec<ContractorWithApplicationsDto>> {
        let rows = self.repo.list_with_applications().await?;
        Ok(rows
            .into_iter()
            .map(|(contractor, applications)| ContractorWithApplicationsDto {
                contractor,
                applications,
            })
            .collect())
    }
}
