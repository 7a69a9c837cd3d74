use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::{HeaderMap, HeaderValue, header, request::Parts},
    routing::{get, post},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::access::CustomerIdentity;
use crate::application::use_cases::auth::admin_login::{AdminLogin, LoginRequest};
use crate::application::use_cases::auth::admin_me::GetAdmin;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::presentation::http::error::{ApiError, ErrorBody};
use crate::presentation::http::schemas::{AdminView, SuccessMessage};

pub const ADMIN_COOKIE: &str = "admin_token";
pub const CUSTOMER_COOKIE: &str = "user_token";

const ADMIN_ROLE: &str = "admin";
const CUSTOMER_ROLE: &str = "customer";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_contractor: bool,
}

impl Claims {
    pub fn admin(id: Uuid, ttl_secs: i64) -> Self {
        Claims {
            sub: id.to_string(),
            exp: expiry(ttl_secs),
            role: ADMIN_ROLE.into(),
            email: None,
            is_contractor: false,
        }
    }

    pub fn customer(who: &CustomerIdentity, ttl_secs: i64) -> Self {
        Claims {
            sub: who.subject_id().to_string(),
            exp: expiry(ttl_secs),
            role: CUSTOMER_ROLE.into(),
            email: Some(who.email().to_string()),
            is_contractor: who.is_contractor(),
        }
    }
}

fn expiry(ttl_secs: i64) -> usize {
    let now = chrono::Utc::now().timestamp() as usize;
    now + ttl_secs.max(0) as usize
}

pub fn issue_token(cfg: &Config, claims: &Claims) -> anyhow::Result<String> {
    Ok(jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )?)
}

fn decode_claims(cfg: &Config, token: &str) -> Result<Claims, ApiError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::unauthorized())
}

pub fn admin_from_token(cfg: &Config, token: &str) -> Result<Uuid, ApiError> {
    let claims = decode_claims(cfg, token)?;
    if claims.role != ADMIN_ROLE {
        return Err(ApiError::unauthorized());
    }
    Uuid::parse_str(&claims.sub).map_err(|_| ApiError::unauthorized())
}

pub fn customer_from_token(cfg: &Config, token: &str) -> Result<CustomerIdentity, ApiError> {
    let claims = decode_claims(cfg, token)?;
    if claims.role != CUSTOMER_ROLE {
        return Err(ApiError::unauthorized());
    }
    let id = Uuid::parse_str(&claims.sub).map_err(|_| ApiError::unauthorized())?;
    let email = claims.email.ok_or_else(ApiError::unauthorized)?;
    Ok(if claims.is_contractor {
        CustomerIdentity::Contractor { id, email }
    } else {
        CustomerIdentity::Applicant {
            application_id: id,
            email,
        }
    })
}

// --- Session extractors ---

/// Bearer header first, then the named cookie.
fn token_from_parts(parts: &Parts, cookie_name: &str) -> Option<String> {
    if let Some(auth) = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(t) = auth.strip_prefix("Bearer ") {
            return Some(t.trim().to_string());
        }
    }
    parts
        .headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|hdr| get_cookie(hdr, cookie_name))
}

/// Authenticated back-office operator.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth {
    pub id: Uuid,
}

#[axum::async_trait]
impl FromRequestParts<AppContext> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts, ADMIN_COOKIE).ok_or_else(ApiError::unauthorized)?;
        let id = admin_from_token(&ctx.cfg, &token)?;
        Ok(AdminAuth { id })
    }
}

/// Authenticated portal customer.
#[derive(Debug, Clone)]
pub struct CustomerAuth(pub CustomerIdentity);

#[axum::async_trait]
impl FromRequestParts<AppContext> for CustomerAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let token =
            token_from_parts(parts, CUSTOMER_COOKIE).ok_or_else(ApiError::unauthorized)?;
        customer_from_token(&ctx.cfg, &token).map(CustomerAuth)
    }
}

// --- Cookie helpers ---

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some((k, v)) = kv.split_once('=') {
            if k.trim() == name {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

pub(crate) fn session_cookie(name: &str, token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly{}; Path=/; Max-Age={}; SameSite=Lax",
        name,
        token,
        secure_attr,
        max_age_secs.max(0)
    )
}

pub(crate) fn cleared_cookie(name: &str, secure: bool) -> String {
    session_cookie(name, "", 0, secure)
}

pub(crate) fn cookie_headers(cookie: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(cookie) {
        headers.insert(header::SET_COOKIE, value);
    }
    headers
}

// --- Admin session endpoints ---

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminLoginResponse {
    pub success: bool,
    pub admin: AdminView,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/admin/login", post(admin_login))
        .route("/admin/logout", post(admin_logout))
        .route("/admin/me", get(admin_me))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/admin/login", tag = "Admin Auth", request_body = LoginBody, responses(
    (status = 200, body = AdminLoginResponse),
    (status = 400, body = ErrorBody),
    (status = 401, body = ErrorBody)
))]
pub async fn admin_login(
    State(ctx): State<AppContext>,
    Json(body): Json<LoginBody>,
) -> Result<(HeaderMap, Json<AdminLoginResponse>), ApiError> {
    let repo = ctx.admin_repo();
    let uc = AdminLogin {
        repo: repo.as_ref(),
    };
    let admin = uc
        .execute(&LoginRequest {
            email: body.email,
            password: body.password,
        })
        .await?;
    let token = issue_token(&ctx.cfg, &Claims::admin(admin.id, ctx.cfg.admin_session_secs))?;
    let cookie = session_cookie(
        ADMIN_COOKIE,
        &token,
        ctx.cfg.admin_session_secs,
        ctx.cfg.secure_cookies(),
    );
    tracing::info!(admin_id = %admin.id, "admin signed in");
    Ok((
        cookie_headers(&cookie),
        Json(AdminLoginResponse {
            success: true,
            admin: admin.into(),
        }),
    ))
}

#[utoipa::path(post, path = "/api/admin/logout", tag = "Admin Auth", responses((status = 200, body = SuccessMessage)))]
pub async fn admin_logout(State(ctx): State<AppContext>) -> (HeaderMap, Json<SuccessMessage>) {
    let cookie = cleared_cookie(ADMIN_COOKIE, ctx.cfg.secure_cookies());
    (
        cookie_headers(&cookie),
        Json(SuccessMessage::new("logged out")),
    )
}

#[utoipa::path(get, path = "/api/admin/me", tag = "Admin Auth", responses(
    (status = 200, body = AdminView),
    (status = 401, body = ErrorBody)
))]
pub async fn admin_me(
    State(ctx): State<AppContext>,
    auth: AdminAuth,
) -> Result<Json<AdminView>, ApiError> {
    let repo = ctx.admin_repo();
    let uc = GetAdmin {
        repo: repo.as_ref(),
    };
    let admin = uc.execute(auth.id).await?.ok_or_else(ApiError::unauthorized)?;
    Ok(Json(admin.into()))
}
