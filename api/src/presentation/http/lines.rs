use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{patch, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::lines::create_line::{CreateLine, CreateLineInput};
use crate::application::use_cases::lines::delete_line::DeleteLine;
use crate::application::use_cases::lines::update_line::{LineUpdate, UpdateLine};
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::AdminAuth;
use crate::presentation::http::error::{ApiError, ErrorBody};
use crate::presentation::http::patch::double_option;
use crate::presentation::http::schemas::{LineView, SuccessMessage};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateLineBody {
    pub application_id: Option<Uuid>,
    pub phone_number: Option<String>,
    pub iccid: Option<String>,
    pub sim_location_id: Option<String>,
    pub spare_tag_id: Option<String>,
    pub line_status: Option<String>,
}

/// Absent fields are left alone; `null` or `""` clears.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateLineBody {
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone_number: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub iccid: Option<Option<String>>,
    pub line_status: Option<String>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub shipment_date: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub return_date: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub contract_month: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub sim_location_id: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub spare_tag_id: Option<Option<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LineResponse {
    pub success: bool,
    pub line: LineView,
}

fn tag_id(field: &str, raw: Option<String>) -> Result<Option<Uuid>, ApiError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Uuid::parse_str(s)
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("{field} is not a valid id"))),
    }
}

fn tag_ref(field: &str, raw: Option<Option<String>>) -> Result<Option<Option<Uuid>>, ApiError> {
    raw.map(|inner| tag_id(field, inner)).transpose()
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/admin/lines", post(create_line))
        .route("/admin/lines/:id", patch(update_line).delete(delete_line))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/admin/lines", tag = "Admin Lines", request_body = CreateLineBody, responses(
    (status = 200, body = LineResponse),
    (status = 400, body = ErrorBody),
    (status = 404, body = ErrorBody)
))]
pub async fn create_line(
    State(ctx): State<AppContext>,
    _auth: AdminAuth,
    Json(body): Json<CreateLineBody>,
) -> Result<Json<LineResponse>, ApiError> {
    let application_id = body
        .application_id
        .ok_or_else(|| ApiError::bad_request("applicationId is required"))?;
    let lines = ctx.line_repo();
    let tags = ctx.tag_repo();
    let uc = CreateLine {
        lines: lines.as_ref(),
        tags: tags.as_ref(),
    };
    let line = uc
        .execute(CreateLineInput {
            application_id,
            phone_number: body.phone_number,
            iccid: body.iccid,
            line_status: body.line_status,
            sim_location_id: tag_id("simLocationId", body.sim_location_id)?,
            spare_tag_id: tag_id("spareTagId", body.spare_tag_id)?,
        })
        .await?;
    Ok(Json(LineResponse {
        success: true,
        line: line.into(),
    }))
}

#[utoipa::path(patch, path = "/api/admin/lines/{id}", tag = "Admin Lines",
    params(("id" = Uuid, Path, description = "Line ID")),
    request_body = UpdateLineBody,
    responses(
        (status = 200, body = LineResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody)
    ))]
pub async fn update_line(
    State(ctx): State<AppContext>,
    _auth: AdminAuth,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateLineBody>,
) -> Result<Json<LineResponse>, ApiError> {
    let lines = ctx.line_repo();
    let tags = ctx.tag_repo();
    let uc = UpdateLine {
        lines: lines.as_ref(),
        tags: tags.as_ref(),
    };
    let update = LineUpdate {
        phone_number: body.phone_number,
        iccid: body.iccid,
        line_status: body.line_status,
        shipment_date: body.shipment_date,
        return_date: body.return_date,
        contract_month: body.contract_month,
        sim_location_id: tag_ref("simLocationId", body.sim_location_id)?,
        spare_tag_id: tag_ref("spareTagId", body.spare_tag_id)?,
    };
    let line = uc.execute(id, update).await?;
    Ok(Json(LineResponse {
        success: true,
        line: line.into(),
    }))
}

#[utoipa::path(delete, path = "/api/admin/lines/{id}", tag = "Admin Lines",
    params(("id" = Uuid, Path, description = "Line ID")),
    responses(
        (status = 200, body = SuccessMessage),
        (status = 404, body = ErrorBody)
    ))]
pub async fn delete_line(
    State(ctx): State<AppContext>,
    auth: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessMessage>, ApiError> {
    let lines = ctx.line_repo();
    let uc = DeleteLine {
        lines: lines.as_ref(),
    };
    uc.execute(id).await?;
    tracing::info!(admin_id = %auth.id, line_id = %id, "line deleted");
    Ok(Json(SuccessMessage::new("line deleted")))
}
