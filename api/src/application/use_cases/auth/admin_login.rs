use crate::application::ports::admin_repository::AdminRepository;
use crate::application::services::passwords::verify_password;
use crate::application::use_cases::auth::AuthError;
use crate::domain::admins::admin::Admin;

pub struct AdminLogin<'a, R: AdminRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R: AdminRepository + ?Sized> AdminLogin<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> Result<Admin, AuthError> {
        let email = req.email.trim();
        if email.is_empty() || req.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let Some(admin) = self.repo.find_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(&req.password, admin.password_hash.as_deref()) {
            return Err(AuthError::InvalidCredentials);
        }
        self.repo.touch_last_login(admin.id).await?;
        Ok(Admin {
            password_hash: None,
            ..admin
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryStore;

    fn req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn correct_password_logs_in_and_stamps_last_login() {
        let store = InMemoryStore::new();
        let seeded = store.seed_admin("ops@example.com", "correct horse");

        let admin = AdminLogin { repo: &store }
            .execute(&req("ops@example.com", "correct horse"))
            .await
            .unwrap();

        assert_eq!(admin.id, seeded.id);
        assert!(admin.password_hash.is_none());
        assert!(store.admin(seeded.id).unwrap().last_login_at.is_some());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let store = InMemoryStore::new();
        store.seed_admin("ops@example.com", "correct horse");
        let uc = AdminLogin { repo: &store };

        let wrong = uc.execute(&req("ops@example.com", "nope")).await;
        let unknown = uc.execute(&req("who@example.com", "correct horse")).await;

        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_before_lookup() {
        let store = InMemoryStore::new();
        let res = AdminLogin { repo: &store }.execute(&req("  ", "x")).await;
        assert!(matches!(res, Err(AuthError::MissingCredentials)));
    }
}
