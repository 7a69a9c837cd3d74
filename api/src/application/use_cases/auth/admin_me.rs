use uuid::Uuid;

use crate::application::ports::admin_repository::AdminRepository;
use crate::domain::admins::admin::Admin;

pub struct GetAdmin<'a, R: AdminRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: AdminRepository + ?Sized> GetAdmin<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Option<Admin>> {
        Ok(self.repo.find_by_id(id).await?.map(|a| Admin {
            password_hash: None,
            ..a
        }))
    }
}
