pub mod admin_login;
pub mod admin_me;
pub mod change_password;
pub mod customer_login;
pub mod ensure_admin;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    BadRequest(String),
    #[error("not authenticated")]
    Unauthorized,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
