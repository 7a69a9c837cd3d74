use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::contractors::list_contractors::ListContractors;
use crate::application::use_cases::contractors::merge_applications::{
    MergeApplications, MergeRequest,
};
use crate::application::use_cases::contractors::reset_password::ResetContractorPassword;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::AdminAuth;
use crate::presentation::http::error::{ApiError, ErrorBody};
use crate::presentation::http::schemas::{ContractorWithApplicationsView, SuccessMessage};

#[derive(Debug, Serialize, ToSchema)]
pub struct ContractorListResponse {
    pub contractors: Vec<ContractorWithApplicationsView>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeBody {
    pub application_ids: Vec<Uuid>,
    pub primary_application_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergeResponse {
    pub success: bool,
    pub contractor_id: Uuid,
    pub merged_count: u64,
    pub created: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ResetPasswordBody {
    pub password: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/admin/contractors", get(list_contractors))
        .route("/admin/contractors/merge", post(merge_applications))
        .route("/admin/contractors/:id/password", post(reset_password))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/admin/contractors", tag = "Admin Contractors", responses(
    (status = 200, body = ContractorListResponse),
    (status = 401, body = ErrorBody)
))]
pub async fn list_contractors(
    State(ctx): State<AppContext>,
    _auth: AdminAuth,
) -> Result<Json<ContractorListResponse>, ApiError> {
    let repo = ctx.contractor_repo();
    let uc = ListContractors {
        repo: repo.as_ref(),
    };
    let contractors = uc.execute().await?;
    Ok(Json(ContractorListResponse {
        contractors: contractors.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(post, path = "/api/admin/contractors/merge", tag = "Admin Contractors", request_body = MergeBody, responses(
    (status = 200, body = MergeResponse),
    (status = 400, body = ErrorBody),
    (status = 404, body = ErrorBody)
))]
pub async fn merge_applications(
    State(ctx): State<AppContext>,
    auth: AdminAuth,
    Json(body): Json<MergeBody>,
) -> Result<Json<MergeResponse>, ApiError> {
    let applications = ctx.application_repo();
    let contractors = ctx.contractor_repo();
    let uc = MergeApplications {
        applications: applications.as_ref(),
        contractors: contractors.as_ref(),
    };
    let outcome = uc
        .execute(&MergeRequest {
            application_ids: body.application_ids,
            primary_application_id: body.primary_application_id,
        })
        .await?;
    tracing::info!(admin_id = %auth.id, contractor_id = %outcome.contractor_id, "merge requested by operator");
    Ok(Json(MergeResponse {
        success: true,
        contractor_id: outcome.contractor_id,
        merged_count: outcome.updated_applications,
        created: outcome.created,
    }))
}

#[utoipa::path(post, path = "/api/admin/contractors/{id}/password", tag = "Admin Contractors",
    params(("id" = Uuid, Path, description = "Contractor ID")),
    request_body = ResetPasswordBody,
    responses(
        (status = 200, body = SuccessMessage),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody)
    ))]
pub async fn reset_password(
    State(ctx): State<AppContext>,
    _auth: AdminAuth,
    Path(id): Path<Uuid>,
    Json(body): Json<ResetPasswordBody>,
) -> Result<Json<SuccessMessage>, ApiError> {
    let repo = ctx.contractor_repo();
    let uc = ResetContractorPassword {
        repo: repo.as_ref(),
    };
    uc.execute(id, &body.password).await?;
    Ok(Json(SuccessMessage::new("password updated")))
}
