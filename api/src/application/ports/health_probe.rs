use async_trait::async_trait;

#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn database_ready(&self) -> bool;
}
