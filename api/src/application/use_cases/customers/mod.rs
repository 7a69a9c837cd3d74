pub mod additional_order;
pub mod get_profile;

#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("not authenticated")]
    Unauthorized,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
