use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct SignedUpload {
    pub signed_url: String,
    pub public_url: String,
    pub expires_in_secs: u64,
}

#[async_trait]
pub trait UploadSigner: Send + Sync {
    /// Presigned PUT for `key` in the document bucket.
    async fn sign_put(&self, key: &str, content_type: Option<&str>)
    -> anyhow::Result<SignedUpload>;
}
