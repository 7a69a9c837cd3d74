use crate::application::ports::admin_repository::AdminRepository;
use crate::application::services::passwords::{MIN_PASSWORD_LEN, hash_password};
use crate::domain::admins::admin::Admin;

/// Creates the operator account, or resets its password when the email is taken.
pub struct EnsureAdmin<'a, R: AdminRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug)]
pub enum EnsureAdminOutcome {
    Created(Admin),
    PasswordReset,
}

impl<'a, R: AdminRepository + ?Sized> EnsureAdmin<'a, R> {
    pub async fn execute(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> anyhow::Result<EnsureAdminOutcome> {
        let email = email.trim();
        anyhow::ensure!(!email.is_empty(), "admin email is required");
        anyhow::ensure!(
            password.chars().count() >= MIN_PASSWORD_LEN,
            "admin password must be at least {MIN_PASSWORD_LEN} characters"
        );
        let hash = hash_password(password)?;
        if self.repo.find_by_email(email).await?.is_some() {
            self.repo.update_password(email, &hash).await?;
            return Ok(EnsureAdminOutcome::PasswordReset);
        }
        let admin = self.repo.create_admin(email, name, "admin", &hash).await?;
        Ok(EnsureAdminOutcome::Created(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::passwords::verify_password;
    use crate::application::test_support::InMemoryStore;

    #[tokio::test]
    async fn creates_then_resets() {
        let store = InMemoryStore::new();
        let uc = EnsureAdmin { repo: &store };

        let first = uc
            .execute("root@example.com", "Root", "first-password")
            .await
            .unwrap();
        let EnsureAdminOutcome::Created(admin) = first else {
            panic!("expected a new admin");
        };
        assert_eq!(admin.role, "admin");

        let second = uc
            .execute("root@example.com", "Root", "second-password")
            .await
            .unwrap();
        assert!(matches!(second, EnsureAdminOutcome::PasswordReset));
        let stored = store.admin(admin.id).unwrap();
        assert!(verify_password("second-password", stored.password_hash.as_deref()));
    }

    #[tokio::test]
    async fn short_password_is_refused() {
        let store = InMemoryStore::new();
        let res = EnsureAdmin { repo: &store }
            .execute("root@example.com", "Root", "short")
            .await;
        assert!(res.is_err());
    }
}
