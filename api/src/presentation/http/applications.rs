use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::dto::applications::ApplicationForm;
use crate::application::use_cases::applications::get_draft::GetDraft;
use crate::application::use_cases::applications::save_application::{
    SaveApplication, SaveApplicationInput,
};
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::error::{ApiError, ErrorBody};
use crate::presentation::http::schemas::ApplicationView;

#[derive(Debug, Deserialize, IntoParams)]
pub struct DraftQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DraftResponse {
    pub application: Option<ApplicationView>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveApplicationBody {
    pub id: Option<Uuid>,
    pub step: Option<i32>,
    pub data: ApplicationForm,
    /// `draft` (default) or `submitted`.
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveApplicationResponse {
    pub success: bool,
    pub application: ApplicationView,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/applications", get(get_draft).post(save_application))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/applications", tag = "Applications", params(DraftQuery), responses(
    (status = 200, body = DraftResponse),
    (status = 400, body = ErrorBody)
))]
pub async fn get_draft(
    State(ctx): State<AppContext>,
    Query(q): Query<DraftQuery>,
) -> Result<Json<DraftResponse>, ApiError> {
    let repo = ctx.application_repo();
    let uc = GetDraft {
        repo: repo.as_ref(),
    };
    let draft = uc.execute(q.email.as_deref().unwrap_or("")).await?;
    Ok(Json(DraftResponse {
        application: draft.map(Into::into),
    }))
}

#[utoipa::path(post, path = "/api/applications", tag = "Applications", request_body = SaveApplicationBody, responses(
    (status = 200, body = SaveApplicationResponse),
    (status = 400, body = ErrorBody),
    (status = 404, body = ErrorBody)
))]
pub async fn save_application(
    State(ctx): State<AppContext>,
    Json(body): Json<SaveApplicationBody>,
) -> Result<Json<SaveApplicationResponse>, ApiError> {
    let repo = ctx.application_repo();
    let uc = SaveApplication {
        repo: repo.as_ref(),
    };
    let app = uc
        .execute(SaveApplicationInput {
            id: body.id,
            step: body.step,
            status: body.status.unwrap_or_else(|| "draft".into()),
            form: body.data,
        })
        .await?;
    Ok(Json(SaveApplicationResponse {
        success: true,
        application: app.into(),
    }))
}
