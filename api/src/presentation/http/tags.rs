use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::use_cases::tags::create_tag::{CreateTag, CreateTagInput};
use crate::application::use_cases::tags::delete_tag::DeleteTag;
use crate::application::use_cases::tags::list_tags::ListTags;
use crate::application::use_cases::tags::update_tag::{TagUpdate, UpdateTag};
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::AdminAuth;
use crate::presentation::http::error::{ApiError, ErrorBody};
use crate::presentation::http::patch::double_option;
use crate::presentation::http::schemas::{SuccessMessage, TagView};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TagQuery {
    /// `sim_location` or `spare`.
    #[serde(rename = "type")]
    pub tag_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagListResponse {
    pub tags: Vec<TagView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagResponse {
    pub success: bool,
    pub tag: TagView,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateTagBody {
    pub name: String,
    #[serde(rename = "type")]
    pub tag_type: String,
    pub color: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateTagBody {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub tag_type: Option<String>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub color: Option<Option<String>>,
    pub order: Option<i32>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/admin/tags", get(list_tags).post(create_tag))
        .route("/admin/tags/:id", patch(update_tag).delete(delete_tag))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/admin/tags", tag = "Admin Tags", params(TagQuery), responses(
    (status = 200, body = TagListResponse),
    (status = 400, body = ErrorBody)
))]
pub async fn list_tags(
    State(ctx): State<AppContext>,
    _auth: AdminAuth,
    Query(q): Query<TagQuery>,
) -> Result<Json<TagListResponse>, ApiError> {
    let repo = ctx.tag_repo();
    let uc = ListTags {
        repo: repo.as_ref(),
    };
    let tags = uc.execute(q.tag_type.as_deref()).await?;
    Ok(Json(TagListResponse {
        tags: tags.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(post, path = "/api/admin/tags", tag = "Admin Tags", request_body = CreateTagBody, responses(
    (status = 200, body = TagResponse),
    (status = 400, body = ErrorBody)
))]
pub async fn create_tag(
    State(ctx): State<AppContext>,
    _auth: AdminAuth,
    Json(body): Json<CreateTagBody>,
) -> Result<Json<TagResponse>, ApiError> {
    let repo = ctx.tag_repo();
    let uc = CreateTag {
        repo: repo.as_ref(),
    };
    let tag = uc
        .execute(CreateTagInput {
            name: body.name,
            tag_type: body.tag_type,
            color: body.color,
            sort_order: body.order,
        })
        .await?;
    Ok(Json(TagResponse {
        success: true,
        tag: tag.into(),
    }))
}

#[utoipa::path(patch, path = "/api/admin/tags/{id}", tag = "Admin Tags",
    params(("id" = Uuid, Path, description = "Tag ID")),
    request_body = UpdateTagBody,
    responses(
        (status = 200, body = TagResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody)
    ))]
pub async fn update_tag(
    State(ctx): State<AppContext>,
    _auth: AdminAuth,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTagBody>,
) -> Result<Json<TagResponse>, ApiError> {
    let repo = ctx.tag_repo();
    let uc = UpdateTag {
        repo: repo.as_ref(),
    };
    let tag = uc
        .execute(
            id,
            TagUpdate {
                name: body.name,
                tag_type: body.tag_type,
                color: body.color,
                sort_order: body.order,
            },
        )
        .await?;
    Ok(Json(TagResponse {
        success: true,
        tag: tag.into(),
    }))
}

#[utoipa::path(delete, path = "/api/admin/tags/{id}", tag = "Admin Tags",
    params(("id" = Uuid, Path, description = "Tag ID")),
    responses(
        (status = 200, body = SuccessMessage),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody)
    ))]
pub async fn delete_tag(
    State(ctx): State<AppContext>,
    _auth: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessMessage>, ApiError> {
    let repo = ctx.tag_repo();
    let uc = DeleteTag {
        repo: repo.as_ref(),
    };
    uc.execute(id).await?;
    Ok(Json(SuccessMessage::new("tag deleted")))
}
