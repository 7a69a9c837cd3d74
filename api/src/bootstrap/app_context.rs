use std::sync::Arc;

use crate::application::ports::admin_repository::AdminRepository;
use crate::application::ports::application_repository::ApplicationRepository;
use crate::application::ports::contractor_repository::ContractorRepository;
use crate::application::ports::health_probe::HealthProbe;
use crate::application::ports::line_repository::LineRepository;
use crate::application::ports::tag_repository::TagRepository;
use crate::application::ports::upload_signer::UploadSigner;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    admin_repo: Arc<dyn AdminRepository>,
    application_repo: Arc<dyn ApplicationRepository>,
    line_repo: Arc<dyn LineRepository>,
    tag_repo: Arc<dyn TagRepository>,
    contractor_repo: Arc<dyn ContractorRepository>,
    upload_signer: Arc<dyn UploadSigner>,
    health_probe: Arc<dyn HealthProbe>,
}

impl AppServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        admin_repo: Arc<dyn AdminRepository>,
        application_repo: Arc<dyn ApplicationRepository>,
        line_repo: Arc<dyn LineRepository>,
        tag_repo: Arc<dyn TagRepository>,
        contractor_repo: Arc<dyn ContractorRepository>,
        upload_signer: Arc<dyn UploadSigner>,
        health_probe: Arc<dyn HealthProbe>,
    ) -> Self {
        Self {
            admin_repo,
            application_repo,
            line_repo,
            tag_repo,
            contractor_repo,
            upload_signer,
            health_probe,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn admin_repo(&self) -> Arc<dyn AdminRepository> {
        self.services.admin_repo.clone()
    }

    pub fn application_repo(&self) -> Arc<dyn ApplicationRepository> {
        self.services.application_repo.clone()
    }

    pub fn line_repo(&self) -> Arc<dyn LineRepository> {
        self.services.line_repo.clone()
    }

    pub fn tag_repo(&self) -> Arc<dyn TagRepository> {
        self.services.tag_repo.clone()
    }

    pub fn contractor_repo(&self) -> Arc<dyn ContractorRepository> {
        self.services.contractor_repo.clone()
    }

    pub fn upload_signer(&self) -> Arc<dyn UploadSigner> {
        self.services.upload_signer.clone()
    }

    pub fn health_probe(&self) -> Arc<dyn HealthProbe> {
        self.services.health_probe.clone()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use super::{AppContext, AppServices};
    use crate::application::test_support::{FakeSigner, FixedProbe, InMemoryStore};
    use crate::bootstrap::config::Config;

    /// Context whose repositories all point at `store`.
    pub fn context_with(store: Arc<InMemoryStore>) -> AppContext {
        let cfg = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some("handler-test-secret-0123456789".into()),
            _ => None,
        })
        .unwrap();
        let services = AppServices::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            Arc::new(FakeSigner),
            Arc::new(FixedProbe(true)),
        );
        AppContext::new(cfg, services)
    }
}
