use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::dto::applications::{DuplicateGroupDto, DuplicateReportDto};
use crate::application::use_cases::applications::batch_update::{
    BatchUpdateStatuses, StatusUpdateInput,
};
use crate::application::use_cases::applications::find_duplicates::FindDuplicates;
use crate::application::use_cases::applications::get_application::GetApplication;
use crate::application::use_cases::applications::list_applications::{
    ListApplications, ListApplicationsQuery,
};
use crate::application::use_cases::applications::provision_lines::ProvisionLines;
use crate::application::use_cases::applications::update_application::{
    ApplicationUpdate, UpdateApplication,
};
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::AdminAuth;
use crate::presentation::http::error::{ApiError, ErrorBody};
use crate::presentation::http::patch::double_option;
use crate::presentation::http::schemas::ApplicationView;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// A status value or `all`.
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationView>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationResponse {
    pub application: ApplicationView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedApplicationResponse {
    pub success: bool,
    pub application: ApplicationView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProvisionResponse {
    pub created: u32,
    pub total: u32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateApplicationBody {
    pub status: Option<String>,
    pub verification_status: Option<String>,
    pub payment_status: Option<String>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub comment1: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub comment2: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub expiration_date: Option<Option<String>>,
    pub plan_type: Option<String>,
    pub line_count: Option<i32>,
    pub total_amount: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
}

impl From<UpdateApplicationBody> for ApplicationUpdate {
    fn from(b: UpdateApplicationBody) -> Self {
        ApplicationUpdate {
            status: b.status,
            verification_status: b.verification_status,
            payment_status: b.payment_status,
            comment1: b.comment1,
            comment2: b.comment2,
            expiration_date: b.expiration_date,
            plan_type: b.plan_type,
            line_count: b.line_count,
            total_amount: b.total_amount,
            email: b.email,
            phone: b.phone,
            postal_code: b.postal_code,
            address: b.address,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateItem {
    pub id: Uuid,
    pub verification_status: Option<String>,
    pub payment_status: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct BatchUpdateBody {
    pub updates: Vec<StatusUpdateItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchUpdateResponse {
    pub success: bool,
    pub count: u64,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroupView {
    pub email: String,
    pub count: usize,
    pub applications: Vec<ApplicationView>,
    pub is_contractor_created: bool,
}

impl From<DuplicateGroupDto> for DuplicateGroupView {
    fn from(g: DuplicateGroupDto) -> Self {
        DuplicateGroupView {
            count: g.count(),
            is_contractor_created: g.is_contractor_created(),
            email: g.email,
            applications: g.applications.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatesResponse {
    pub duplicates: Vec<DuplicateGroupView>,
    pub total_duplicate_emails: usize,
    pub total_duplicate_applications: usize,
}

impl From<DuplicateReportDto> for DuplicatesResponse {
    fn from(r: DuplicateReportDto) -> Self {
        DuplicatesResponse {
            total_duplicate_emails: r.total_duplicate_emails(),
            total_duplicate_applications: r.total_duplicate_applications(),
            duplicates: r.groups.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/admin/applications", get(list_applications))
        .route("/admin/applications/batch-update", post(batch_update))
        .route("/admin/applications/duplicates", get(find_duplicates))
        .route(
            "/admin/applications/:id",
            get(get_application).patch(update_application),
        )
        .route(
            "/admin/applications/:id/provision-lines",
            post(provision_lines),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/admin/applications", tag = "Admin Applications", params(ListQuery), responses(
    (status = 200, body = ApplicationListResponse),
    (status = 400, body = ErrorBody),
    (status = 401, body = ErrorBody)
))]
pub async fn list_applications(
    State(ctx): State<AppContext>,
    _auth: AdminAuth,
    Query(q): Query<ListQuery>,
) -> Result<Json<ApplicationListResponse>, ApiError> {
    let applications = ctx.application_repo();
    let lines = ctx.line_repo();
    let uc = ListApplications {
        applications: applications.as_ref(),
        lines: lines.as_ref(),
    };
    let page = uc
        .execute(&ListApplicationsQuery {
            page: q.page,
            limit: q.limit,
            status: q.status,
            search: q.search,
        })
        .await?;
    let pagination = Pagination {
        page: page.page,
        limit: page.limit,
        total: page.total,
        total_pages: page.total_pages(),
    };
    Ok(Json(ApplicationListResponse {
        applications: page.items.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

#[utoipa::path(get, path = "/api/admin/applications/{id}", tag = "Admin Applications",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, body = ApplicationResponse),
        (status = 404, body = ErrorBody)
    ))]
pub async fn get_application(
    State(ctx): State<AppContext>,
    _auth: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationResponse>, ApiError> {
    let applications = ctx.application_repo();
    let lines = ctx.line_repo();
    ProvisionLines {
        lines: lines.as_ref(),
    }
    .execute(id)
    .await?;
    let uc = GetApplication {
        applications: applications.as_ref(),
        lines: lines.as_ref(),
    };
    let app = uc.execute(id).await?;
    Ok(Json(ApplicationResponse {
        application: app.into(),
    }))
}

#[utoipa::path(post, path = "/api/admin/applications/{id}/provision-lines", tag = "Admin Applications",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, body = ProvisionResponse),
        (status = 404, body = ErrorBody)
    ))]
pub async fn provision_lines(
    State(ctx): State<AppContext>,
    _auth: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<ProvisionResponse>, ApiError> {
    let lines = ctx.line_repo();
    let uc = ProvisionLines {
        lines: lines.as_ref(),
    };
    let outcome = uc.execute(id).await?;
    Ok(Json(ProvisionResponse {
        created: outcome.created,
        total: outcome.total,
    }))
}

#[utoipa::path(patch, path = "/api/admin/applications/{id}", tag = "Admin Applications",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = UpdateApplicationBody,
    responses(
        (status = 200, body = UpdatedApplicationResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody)
    ))]
pub async fn update_application(
    State(ctx): State<AppContext>,
    auth: AdminAuth,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateApplicationBody>,
) -> Result<Json<UpdatedApplicationResponse>, ApiError> {
    let repo = ctx.application_repo();
    let uc = UpdateApplication {
        repo: repo.as_ref(),
    };
    let app = uc.execute(id, body.into()).await?;
    tracing::info!(admin_id = %auth.id, application_id = %id, "application updated");
    Ok(Json(UpdatedApplicationResponse {
        success: true,
        application: app.into(),
    }))
}

#[utoipa::path(post, path = "/api/admin/applications/batch-update", tag = "Admin Applications",
    request_body = BatchUpdateBody,
    responses(
        (status = 200, body = BatchUpdateResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody)
    ))]
pub async fn batch_update(
    State(ctx): State<AppContext>,
    auth: AdminAuth,
    Json(body): Json<BatchUpdateBody>,
) -> Result<Json<BatchUpdateResponse>, ApiError> {
    let repo = ctx.application_repo();
    let uc = BatchUpdateStatuses {
        repo: repo.as_ref(),
    };
    let inputs: Vec<StatusUpdateInput> = body
        .updates
        .into_iter()
        .map(|u| StatusUpdateInput {
            id: u.id,
            verification_status: u.verification_status,
            payment_status: u.payment_status,
        })
        .collect();
    let count = uc.execute(&inputs).await?;
    tracing::info!(admin_id = %auth.id, count, "application statuses updated");
    Ok(Json(BatchUpdateResponse {
        success: true,
        count,
        message: format!("{count} application(s) updated"),
    }))
}

#[utoipa::path(get, path = "/api/admin/applications/duplicates", tag = "Admin Applications", responses(
    (status = 200, body = DuplicatesResponse),
    (status = 401, body = ErrorBody)
))]
pub async fn find_duplicates(
    State(ctx): State<AppContext>,
    _auth: AdminAuth,
) -> Result<Json<DuplicatesResponse>, ApiError> {
    let repo = ctx.application_repo();
    let uc = FindDuplicates {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute().await?.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use super::*;
    use crate::application::test_support::{InMemoryStore, application_fixture};
    use crate::bootstrap::app_context::testing::context_with;
    use crate::domain::applications::application::{PaymentStatus, VerificationStatus};

    fn admin() -> AdminAuth {
        AdminAuth { id: Uuid::new_v4() }
    }

    #[tokio::test]
    async fn list_paginates_newest_first() {
        let store = Arc::new(InMemoryStore::new());
        for i in 0..3 {
            store.seed_application(application_fixture(&format!("u{i}@example.com")), 100 - i);
        }
        let ctx = context_with(store);

        let Json(page) = list_applications(
            State(ctx),
            admin(),
            Query(ListQuery {
                page: Some(1),
                limit: Some(2),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(page.applications.len(), 2);
        assert_eq!(page.applications[0].email, "u2@example.com");
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.applications[0].lines.is_some());
    }

    #[tokio::test]
    async fn detail_provisions_missing_lines() {
        let store = Arc::new(InMemoryStore::new());
        let mut fixture = application_fixture("a@example.com");
        fixture.line_count = 3;
        let app = store.seed_application(fixture, 10);
        store.seed_line(app.id, (None, None));
        let ctx = context_with(store.clone());

        let Json(detail) = get_application(State(ctx.clone()), admin(), Path(app.id))
            .await
            .unwrap();
        assert_eq!(detail.application.lines.map(|l| l.len()), Some(3));

        let Json(again) = provision_lines(State(ctx.clone()), admin(), Path(app.id))
            .await
            .unwrap();
        assert_eq!(again.created, 0);
        assert_eq!(again.total, 3);

        let err = get_application(State(ctx), admin(), Path(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn patch_updates_statuses_and_rejects_bad_values() {
        let store = Arc::new(InMemoryStore::new());
        let app = store.seed_application(application_fixture("a@example.com"), 10);
        let ctx = context_with(store.clone());

        let body: UpdateApplicationBody = serde_json::from_str(
            r#"{"verificationStatus":"verified","comment1":"checked id","expirationDate":"2026-03-31"}"#,
        )
        .unwrap();
        let Json(updated) = update_application(State(ctx.clone()), admin(), Path(app.id), Json(body))
            .await
            .unwrap();
        assert_eq!(updated.application.verification_status, VerificationStatus::Verified);
        assert_eq!(updated.application.comment1.as_deref(), Some("checked id"));

        let bad: UpdateApplicationBody =
            serde_json::from_str(r#"{"paymentStatus":"refunded"}"#).unwrap();
        let err = update_application(State(ctx.clone()), admin(), Path(app.id), Json(bad))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = update_application(
            State(ctx),
            admin(),
            Path(Uuid::new_v4()),
            Json(UpdateApplicationBody {
                status: Some("processing".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn batch_update_is_all_or_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let a = store.seed_application(application_fixture("a@example.com"), 10);
        let ctx = context_with(store.clone());

        let err = batch_update(
            State(ctx.clone()),
            admin(),
            Json(BatchUpdateBody {
                updates: vec![
                    StatusUpdateItem {
                        id: a.id,
                        verification_status: None,
                        payment_status: Some("paid".into()),
                    },
                    StatusUpdateItem {
                        id: Uuid::new_v4(),
                        verification_status: None,
                        payment_status: Some("paid".into()),
                    },
                ],
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(
            store.application(a.id).unwrap().payment_status,
            PaymentStatus::NotIssued
        );

        let Json(ok) = batch_update(
            State(ctx.clone()),
            admin(),
            Json(BatchUpdateBody {
                updates: vec![StatusUpdateItem {
                    id: a.id,
                    verification_status: None,
                    payment_status: Some("paid".into()),
                }],
            }),
        )
        .await
        .unwrap();
        assert_eq!(ok.count, 1);

        let err = batch_update(State(ctx), admin(), Json(BatchUpdateBody::default()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicates_report_totals() {
        let store = Arc::new(InMemoryStore::new());
        store.seed_application(application_fixture("dup@example.com"), 30);
        store.seed_application(application_fixture("dup@example.com"), 20);
        store.seed_application(application_fixture("solo@example.com"), 10);
        let ctx = context_with(store);

        let Json(report) = find_duplicates(State(ctx), admin()).await.unwrap();
        assert_eq!(report.total_duplicate_emails, 1);
        assert_eq!(report.total_duplicate_applications, 2);
        assert_eq!(report.duplicates[0].email, "dup@example.com");
        assert!(!report.duplicates[0].is_contractor_created);
    }

    #[test]
    fn batch_body_schema_lists_updates() {
        let (name, schema) = <BatchUpdateBody as ToSchema>::schema();
        assert_eq!(name, "BatchUpdateBody");
        let json = serde_json::to_value(&schema).unwrap();
        assert!(json["properties"].get("updates").is_some());
    }
}
