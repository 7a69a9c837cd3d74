use chrono::Utc;
use tracing::debug;

use crate::application::ports::upload_signer::UploadSigner;
use crate::application::services::uploads::{DEFAULT_FOLDER, UploadKeyError, build_object_key};

pub struct SignUpload<'a, S: UploadSigner + ?Sized> {
    pub signer: &'a S,
}

#[derive(Debug, Clone, Default)]
pub struct SignUploadInput {
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub folder: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SignedUploadResult {
    pub path: String,
    pub signed_url: String,
    pub public_url: String,
    pub expires_in: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    InvalidKey(#[from] UploadKeyError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl<'a, S: UploadSigner + ?Sized> SignUpload<'a, S> {
    pub async fn execute(&self, input: &SignUploadInput) -> Result<SignedUploadResult, UploadError> {
        let folder = input
            .folder
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FOLDER);
        let content_type = input.file_type.as_deref().filter(|t| !t.is_empty());
        let key = build_object_key(
            folder,
            input.file_name.as_deref().unwrap_or(""),
            content_type,
            Utc::now().timestamp_millis(),
        )?;
        let signed = self.signer.sign_put(&key, content_type).await?;
        debug!(path = %key, "upload url signed");
        Ok(SignedUploadResult {
            path: key,
            signed_url: signed.signed_url,
            public_url: signed.public_url,
            expires_in: signed.expires_in_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::FakeSigner;

    #[tokio::test]
    async fn signs_a_sanitized_key_in_the_default_folder() {
        let out = SignUpload { signer: &FakeSigner }
            .execute(&SignUploadInput {
                file_name: Some("my licence (front).png".into()),
                file_type: Some("image/png".into()),
                folder: None,
            })
            .await
            .unwrap();

        assert!(out.path.starts_with("documents/"));
        assert!(out.path.ends_with("-my_licence__front_.png"));
        assert_eq!(out.public_url, format!("https://storage.test/public/{}", out.path));
        assert_eq!(out.expires_in, 3600);
    }

    #[tokio::test]
    async fn rejects_missing_name_bad_type_and_folder() {
        let uc = SignUpload { signer: &FakeSigner };
        let missing = uc.execute(&SignUploadInput::default()).await;
        assert!(matches!(missing, Err(UploadError::InvalidKey(UploadKeyError::MissingFileName))));

        let bad_type = uc
            .execute(&SignUploadInput {
                file_name: Some("a.gif".into()),
                file_type: Some("image/gif".into()),
                folder: None,
            })
            .await;
        assert!(matches!(bad_type, Err(UploadError::InvalidKey(UploadKeyError::UnsupportedType(_)))));

        let bad_folder = uc
            .execute(&SignUploadInput {
                file_name: Some("a.pdf".into()),
                file_type: Some("application/pdf".into()),
                folder: Some("../etc".into()),
            })
            .await;
        assert!(matches!(bad_folder, Err(UploadError::InvalidKey(UploadKeyError::InvalidFolder(_)))));
    }
}
