use axum::{
    Json, Router,
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::dto::lines::{CustomerLineDto, LineSummaryDto};
use crate::application::use_cases::auth::admin_login::LoginRequest;
use crate::application::use_cases::auth::change_password::ChangePassword;
use crate::application::use_cases::auth::customer_login::CustomerLogin;
use crate::application::use_cases::customers::additional_order::{
    AdditionalOrder, AdditionalOrderInput,
};
use crate::application::use_cases::customers::get_profile::GetProfile;
use crate::application::use_cases::lines::get_customer_line::GetCustomerLine;
use crate::application::use_cases::lines::list_customer_lines::ListCustomerLines;
use crate::bootstrap::app_context::AppContext;
use crate::domain::applications::application::ApplicantType;
use crate::domain::lines::line::LineStatus;
use crate::presentation::http::auth::{
    CUSTOMER_COOKIE, Claims, CustomerAuth, LoginBody, cleared_cookie, cookie_headers,
    issue_token, session_cookie,
};
use crate::presentation::http::error::{ApiError, ErrorBody};
use crate::presentation::http::schemas::{
    ApplicationView, ContractorView, LineView, SuccessMessage,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub contractor_type: ApplicantType,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerLoginResponse {
    pub success: bool,
    pub must_change_password: bool,
    pub user: CustomerUser,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordBody {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: CustomerUser,
    pub must_change_password: bool,
    pub contractor: Option<ContractorView>,
    pub applications: Vec<ApplicationView>,
}

/// Line counts keyed by status value.
#[derive(Debug, Serialize, ToSchema)]
pub struct LineSummaryView {
    pub total: usize,
    pub not_opened: usize,
    pub opened: usize,
    pub shipped: usize,
    pub waiting_return: usize,
    pub returned: usize,
    pub canceled: usize,
}

impl From<&LineSummaryDto> for LineSummaryView {
    fn from(s: &LineSummaryDto) -> Self {
        LineSummaryView {
            total: s.total,
            not_opened: s.count(LineStatus::NotOpened),
            opened: s.count(LineStatus::Opened),
            shipped: s.count(LineStatus::Shipped),
            waiting_return: s.count(LineStatus::WaitingReturn),
            returned: s.count(LineStatus::Returned),
            canceled: s.count(LineStatus::Canceled),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerLinesResponse {
    pub lines: Vec<LineView>,
    pub summary: LineSummaryView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerLineResponse {
    pub line: LineView,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalOrderBody {
    pub plan_type: String,
    pub line_count: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub success: bool,
    pub application: ApplicationView,
}

fn customer_line_view(dto: CustomerLineDto) -> LineView {
    LineView {
        application: Some(Box::new(dto.application.into())),
        ..dto.line.into()
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/user/login", post(customer_login))
        .route("/user/logout", post(customer_logout))
        .route("/user/change-password", post(change_password))
        .route("/user/profile", get(profile))
        .route("/user/lines", get(list_lines))
        .route("/user/lines/:id", get(get_line))
        .route("/user/additional-order", post(additional_order))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/user/login", tag = "My Page", request_body = LoginBody, responses(
    (status = 200, body = CustomerLoginResponse),
    (status = 401, body = ErrorBody)
))]
pub async fn customer_login(
    State(ctx): State<AppContext>,
    Json(body): Json<LoginBody>,
) -> Result<(HeaderMap, Json<CustomerLoginResponse>), ApiError> {
    let contractors = ctx.contractor_repo();
    let applications = ctx.application_repo();
    let uc = CustomerLogin {
        contractors: contractors.as_ref(),
        applications: applications.as_ref(),
    };
    let session = uc
        .execute(&LoginRequest {
            email: body.email,
            password: body.password,
        })
        .await?;
    let ttl = ctx.cfg.customer_session_secs;
    let token = issue_token(&ctx.cfg, &Claims::customer(&session.identity, ttl))?;
    let cookie = session_cookie(CUSTOMER_COOKIE, &token, ttl, ctx.cfg.secure_cookies());
    tracing::info!(
        subject = %session.identity.subject_id(),
        contractor = session.identity.is_contractor(),
        "customer signed in"
    );
    Ok((
        cookie_headers(&cookie),
        Json(CustomerLoginResponse {
            success: true,
            must_change_password: session.must_change_password,
            user: CustomerUser {
                id: session.identity.subject_id(),
                email: session.identity.email().to_string(),
                name: session.name,
                contractor_type: session.contractor_type,
            },
        }),
    ))
}

#[utoipa::path(post, path = "/api/user/logout", tag = "My Page", responses((status = 200, body = SuccessMessage)))]
pub async fn customer_logout(State(ctx): State<AppContext>) -> (HeaderMap, Json<SuccessMessage>) {
    let cookie = cleared_cookie(CUSTOMER_COOKIE, ctx.cfg.secure_cookies());
    (
        cookie_headers(&cookie),
        Json(SuccessMessage::new("logged out")),
    )
}

#[utoipa::path(post, path = "/api/user/change-password", tag = "My Page", request_body = ChangePasswordBody, responses(
    (status = 200, body = SuccessMessage),
    (status = 400, body = ErrorBody),
    (status = 401, body = ErrorBody)
))]
pub async fn change_password(
    State(ctx): State<AppContext>,
    CustomerAuth(who): CustomerAuth,
    Json(body): Json<ChangePasswordBody>,
) -> Result<Json<SuccessMessage>, ApiError> {
    let contractors = ctx.contractor_repo();
    let applications = ctx.application_repo();
    let uc = ChangePassword {
        contractors: contractors.as_ref(),
        applications: applications.as_ref(),
    };
    uc.execute(&who, &body.current_password, &body.new_password)
        .await?;
    Ok(Json(SuccessMessage::new("password changed")))
}

#[utoipa::path(get, path = "/api/user/profile", tag = "My Page", responses(
    (status = 200, body = ProfileResponse),
    (status = 401, body = ErrorBody)
))]
pub async fn profile(
    State(ctx): State<AppContext>,
    CustomerAuth(who): CustomerAuth,
) -> Result<Json<ProfileResponse>, ApiError> {
    let contractors = ctx.contractor_repo();
    let applications = ctx.application_repo();
    let uc = GetProfile {
        contractors: contractors.as_ref(),
        applications: applications.as_ref(),
    };
    let p = uc.execute(&who).await?;
    Ok(Json(ProfileResponse {
        user: CustomerUser {
            id: p.identity.subject_id(),
            email: p.identity.email().to_string(),
            name: p.name,
            contractor_type: p.contractor_type,
        },
        must_change_password: p.must_change_password,
        contractor: p.contractor.map(Into::into),
        applications: p.applications.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(get, path = "/api/user/lines", tag = "My Page", responses(
    (status = 200, body = CustomerLinesResponse),
    (status = 401, body = ErrorBody)
))]
pub async fn list_lines(
    State(ctx): State<AppContext>,
    CustomerAuth(who): CustomerAuth,
) -> Result<Json<CustomerLinesResponse>, ApiError> {
    let applications = ctx.application_repo();
    let lines = ctx.line_repo();
    let uc = ListCustomerLines {
        applications: applications.as_ref(),
        lines: lines.as_ref(),
    };
    let (items, summary) = uc.execute(&who).await?;
    Ok(Json(CustomerLinesResponse {
        summary: LineSummaryView::from(&summary),
        lines: items.into_iter().map(customer_line_view).collect(),
    }))
}

#[utoipa::path(get, path = "/api/user/lines/{id}", tag = "My Page",
    params(("id" = Uuid, Path, description = "Line ID")),
    responses(
        (status = 200, body = CustomerLineResponse),
        (status = 403, body = ErrorBody),
        (status = 404, body = ErrorBody)
    ))]
pub async fn get_line(
    State(ctx): State<AppContext>,
    CustomerAuth(who): CustomerAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerLineResponse>, ApiError> {
    let applications = ctx.application_repo();
    let lines = ctx.line_repo();
    let uc = GetCustomerLine {
        applications: applications.as_ref(),
        lines: lines.as_ref(),
    };
    let dto = uc.execute(&who, id).await?;
    Ok(Json(CustomerLineResponse {
        line: customer_line_view(dto),
    }))
}

#[utoipa::path(post, path = "/api/user/additional-order", tag = "My Page", request_body = AdditionalOrderBody, responses(
    (status = 200, body = OrderResponse),
    (status = 400, body = ErrorBody),
    (status = 401, body = ErrorBody)
))]
pub async fn additional_order(
    State(ctx): State<AppContext>,
    CustomerAuth(who): CustomerAuth,
    Json(body): Json<AdditionalOrderBody>,
) -> Result<Json<OrderResponse>, ApiError> {
    let contractors = ctx.contractor_repo();
    let applications = ctx.application_repo();
    let uc = AdditionalOrder {
        contractors: contractors.as_ref(),
        applications: applications.as_ref(),
    };
    let app = uc
        .execute(
            &who,
            &AdditionalOrderInput {
                plan_type: body.plan_type,
                line_count: body.line_count,
            },
        )
        .await?;
    Ok(Json(OrderResponse {
        success: true,
        application: app.into(),
    }))
}
