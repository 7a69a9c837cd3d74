use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::use_cases::uploads::sign_upload::{SignUpload, SignUploadInput};
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::error::{ApiError, ErrorBody};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadSignatureRequest {
    pub file_name: Option<String>,
    /// `image/jpeg`, `image/jpg`, `image/png` or `application/pdf`.
    pub file_type: Option<String>,
    /// Defaults to `documents`.
    pub folder: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadSignatureResponse {
    pub signed_url: String,
    pub path: String,
    pub public_url: String,
    pub expires_in: u64,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/upload-signature", post(sign_upload))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/upload-signature", tag = "Uploads", request_body = UploadSignatureRequest, responses(
    (status = 200, body = UploadSignatureResponse),
    (status = 400, body = ErrorBody)
))]
pub async fn sign_upload(
    State(ctx): State<AppContext>,
    Json(body): Json<UploadSignatureRequest>,
) -> Result<Json<UploadSignatureResponse>, ApiError> {
    let signer = ctx.upload_signer();
    let uc = SignUpload {
        signer: signer.as_ref(),
    };
    let signed = uc
        .execute(&SignUploadInput {
            file_name: body.file_name,
            file_type: body.file_type,
            folder: body.folder,
        })
        .await?;
    Ok(Json(UploadSignatureResponse {
        signed_url: signed.signed_url,
        path: signed.path,
        public_url: signed.public_url,
        expires_in: signed.expires_in,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use super::*;
    use crate::application::test_support::InMemoryStore;
    use crate::bootstrap::app_context::testing::context_with;

    #[tokio::test]
    async fn signs_sanitized_key_in_default_folder() {
        let ctx = context_with(Arc::new(InMemoryStore::new()));
        let Json(out) = sign_upload(
            State(ctx),
            Json(UploadSignatureRequest {
                file_name: Some("my licence.JPG".into()),
                file_type: Some("image/jpeg".into()),
                folder: None,
            }),
        )
        .await
        .unwrap();
        assert!(out.path.starts_with("documents/"));
        assert!(out.path.ends_with("-my_licence.JPG"));
        assert!(out.signed_url.contains(&out.path));
        assert_eq!(out.expires_in, 3600);
    }

    #[tokio::test]
    async fn rejects_disallowed_type_and_missing_name() {
        let ctx = context_with(Arc::new(InMemoryStore::new()));
        let err = sign_upload(
            State(ctx.clone()),
            Json(UploadSignatureRequest {
                file_name: Some("payload.exe".into()),
                file_type: Some("application/octet-stream".into()),
                folder: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = sign_upload(State(ctx), Json(UploadSignatureRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
