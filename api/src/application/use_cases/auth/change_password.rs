use crate::application::access::CustomerIdentity;
use crate::application::ports::application_repository::ApplicationRepository;
use crate::application::ports::contractor_repository::ContractorRepository;
use crate::application::services::passwords::{MIN_PASSWORD_LEN, hash_password, verify_password};
use crate::application::use_cases::auth::AuthError;

pub struct ChangePassword<'a, C, A>
where
    C: ContractorRepository + ?Sized,
    A: ApplicationRepository + ?Sized,
{
    pub contractors: &'a C,
    pub applications: &'a A,
}

impl<'a, C, A> ChangePassword<'a, C, A>
where
    C: ContractorRepository + ?Sized,
    A: ApplicationRepository + ?Sized,
{
    pub async fn execute(
        &self,
        who: &CustomerIdentity,
        current: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::BadRequest(format!(
                "new password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        match who {
            CustomerIdentity::Contractor { id, .. } => {
                let contractor = self
                    .contractors
                    .find_by_id(*id)
                    .await?
                    .ok_or(AuthError::Unauthorized)?;
                if !verify_password(current, contractor.password_hash.as_deref()) {
                    return Err(AuthError::BadRequest("current password is incorrect".into()));
                }
                let hash = hash_password(new_password)?;
                self.contractors.set_password(*id, &hash, false).await?;
            }
            CustomerIdentity::Applicant { application_id, .. } => {
                let app = self
                    .applications
                    .find_by_id(*application_id)
                    .await?
                    .ok_or(AuthError::Unauthorized)?;
                if !verify_password(current, app.password_hash.as_deref()) {
                    return Err(AuthError::BadRequest("current password is incorrect".into()));
                }
                let hash = hash_password(new_password)?;
                self.applications
                    .set_password_hash(*application_id, &hash)
                    .await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{InMemoryStore, application_fixture};

    #[tokio::test]
    async fn contractor_change_clears_forced_reset() {
        let store = InMemoryStore::new();
        let c = store.seed_contractor("kim@example.com", Some("temporary-pw"));
        store
            .set_password(c.id, &hash_password("temporary-pw").unwrap(), true)
            .await
            .unwrap();
        let who = CustomerIdentity::Contractor {
            id: c.id,
            email: c.email.clone(),
        };

        ChangePassword {
            contractors: &store,
            applications: &store,
        }
        .execute(&who, "temporary-pw", "brand-new-pw")
        .await
        .unwrap();

        let after = ContractorRepository::find_by_id(&store, c.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!after.must_change_password);
        assert!(verify_password("brand-new-pw", after.password_hash.as_deref()));
    }

    #[tokio::test]
    async fn applicant_needs_current_password() {
        let store = InMemoryStore::new();
        let mut app = application_fixture("lee@example.com");
        app.password_hash = Some(hash_password("current-pw").unwrap());
        let app = store.seed_application(app, 1);
        let who = CustomerIdentity::Applicant {
            application_id: app.id,
            email: app.email.clone(),
        };
        let uc = ChangePassword {
            contractors: &store,
            applications: &store,
        };

        let wrong = uc.execute(&who, "not-it", "brand-new-pw").await;
        assert!(matches!(wrong, Err(AuthError::BadRequest(_))));
        let short = uc.execute(&who, "current-pw", "short").await;
        assert!(matches!(short, Err(AuthError::BadRequest(_))));

        uc.execute(&who, "current-pw", "brand-new-pw").await.unwrap();
        let stored = store.application(app.id).unwrap();
        assert!(verify_password("brand-new-pw", stored.password_hash.as_deref()));
    }
}
