use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::admins::admin::Admin;

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create_admin(
        &self,
        email: &str,
        name: &str,
        role: &str,
        password_hash: &str,
    ) -> anyhow::Result<Admin>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Admin>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Admin>>;
    async fn update_password(&self, email: &str, password_hash: &str) -> anyhow::Result<bool>;
    async fn touch_last_login(&self, id: Uuid) -> anyhow::Result<()>;
}
