//! Creates the back-office operator from `ADMIN_EMAIL` / `ADMIN_PASSWORD` /
//! `ADMIN_NAME`, or resets the password when the email already exists.

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};

use portal_api::application::use_cases::auth::ensure_admin::{EnsureAdmin, EnsureAdminOutcome};
use portal_api::bootstrap::config::Config;
use portal_api::infrastructure::db::repositories::admin_repository_sqlx::SqlxAdminRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "portal_api=info,create_admin=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    let email = std::env::var("ADMIN_EMAIL").context("ADMIN_EMAIL must be set")?;
    let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;
    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".into());

    let pool =
        portal_api::infrastructure::db::connect_pool(&cfg.database_url, 1).await?;
    portal_api::infrastructure::db::migrate(&pool).await?;

    let repo = SqlxAdminRepository::new(pool);
    let uc = EnsureAdmin { repo: &repo };
    match uc.execute(&email, &name, &password).await? {
        EnsureAdminOutcome::Created(admin) => {
            info!(admin_id = %admin.id, email = %admin.email, name = %admin.name, "admin created");
            warn!("change this password after the first login");
        }
        EnsureAdminOutcome::PasswordReset => {
            info!(email = %email, "admin already existed; password reset");
        }
    }
    Ok(())
}
