pub mod list_contractors;
pub mod merge_applications;
pub mod reset_password;

#[derive(Debug, thiserror::Error)]
pub enum ContractorError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
