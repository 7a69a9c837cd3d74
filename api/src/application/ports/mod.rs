pub mod admin_repository;
pub mod application_repository;
pub mod contractor_repository;
pub mod health_probe;
pub mod line_repository;
pub mod tag_repository;
pub mod upload_signer;
