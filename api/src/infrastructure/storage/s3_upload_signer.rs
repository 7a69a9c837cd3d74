use std::time::Duration;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::{Client, error::SdkError};

use crate::application::ports::upload_signer::{SignedUpload, UploadSigner};
use crate::bootstrap::config::Config;

pub struct S3UploadSigner {
    client: Client,
    bucket: String,
    public_base: String,
    expires_in_secs: u64,
}

impl S3UploadSigner {
    pub async fn new(cfg: &Config) -> anyhow::Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &cfg.s3_region {
            loader = loader.region(Region::new(region.clone()));
        }

        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);

        if let (Some(access), Some(secret)) = (&cfg.s3_access_key, &cfg.s3_secret_key) {
            let creds = Credentials::new(
                access.clone(),
                secret.clone(),
                None,
                None,
                "portal-s3-static",
            );
            builder = builder.credentials_provider(creds);
        }

        if let Some(endpoint) = &cfg.s3_endpoint {
            builder = builder.endpoint_url(endpoint.clone());
        }

        if cfg.s3_use_path_style {
            builder = builder.force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        ensure_bucket(&client, &cfg.s3_bucket).await?;

        Ok(Self {
            client,
            bucket: cfg.s3_bucket.clone(),
            public_base: public_base_url(cfg),
            expires_in_secs: cfg.upload_url_expires_secs,
        })
    }
}

#[async_trait]
impl UploadSigner for S3UploadSigner {
    async fn sign_put(
        &self,
        key: &str,
        content_type: Option<&str>,
    ) -> anyhow::Result<SignedUpload> {
        let presigning = PresigningConfig::expires_in(Duration::from_secs(self.expires_in_secs))
            .context("invalid presign expiry")?;
        let mut request = self.client.put_object().bucket(&self.bucket).key(key);
        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }
        let presigned = request
            .presigned(presigning)
            .await
            .with_context(|| format!("failed to presign upload for {key}"))?;
        Ok(SignedUpload {
            signed_url: presigned.uri().to_string(),
            public_url: format!("{}/{}", self.public_base, key),
            expires_in_secs: self.expires_in_secs,
        })
    }
}

/// Where uploaded objects are readable from, without a trailing slash.
fn public_base_url(cfg: &Config) -> String {
    if let Some(base) = &cfg.storage_public_base_url {
        return base.clone();
    }
    match &cfg.s3_endpoint {
        Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), cfg.s3_bucket),
        None => {
            let region = cfg.s3_region.as_deref().unwrap_or("us-east-1");
            format!("https://{}.s3.{}.amazonaws.com", cfg.s3_bucket, region)
        }
    }
}

async fn ensure_bucket(client: &Client, bucket: &str) -> anyhow::Result<()> {
    match client.head_bucket().bucket(bucket).send().await {
        Ok(_) => return Ok(()),
        Err(SdkError::ServiceError(service_err)) => {
            if !matches!(service_err.err(), HeadBucketError::NotFound(_)) {
                return Err(anyhow!(service_err.err().to_string()));
            }
        }
        Err(err) => return Err(anyhow!(err.to_string())),
    }

    tracing::info!(bucket, "creating upload bucket");
    match client.create_bucket().bucket(bucket).send().await {
        Ok(_) => Ok(()),
        Err(SdkError::ServiceError(service_err)) => match service_err.err() {
            CreateBucketError::BucketAlreadyOwnedByYou(_) => Ok(()),
            CreateBucketError::BucketAlreadyExists(_) => Ok(()),
            other => Err(anyhow!(other.to_string())),
        },
        Err(err) => Err(anyhow!(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(pairs: &[(&str, &str)]) -> Config {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| {
            owned
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    #[test]
    fn explicit_public_base_wins() {
        let c = cfg(&[
            ("STORAGE_PUBLIC_BASE_URL", "https://cdn.example.com/"),
            ("S3_ENDPOINT", "http://minio:9000"),
        ]);
        assert_eq!(public_base_url(&c), "https://cdn.example.com");
    }

    #[test]
    fn custom_endpoint_uses_path_style_base() {
        let c = cfg(&[("S3_ENDPOINT", "http://localhost:9000/"), ("S3_BUCKET", "docs")]);
        assert_eq!(public_base_url(&c), "http://localhost:9000/docs");
    }

    #[test]
    fn aws_default_uses_virtual_host() {
        let c = cfg(&[("S3_REGION", "ap-northeast-1")]);
        assert_eq!(
            public_base_url(&c),
            "https://applications.s3.ap-northeast-1.amazonaws.com"
        );
    }
}
