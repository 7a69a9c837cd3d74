use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use portal_api::bootstrap::app_context::{AppContext, AppServices};
use portal_api::bootstrap::config::Config;
use portal_api::infrastructure::db::PgHealthProbe;
use portal_api::infrastructure::db::repositories::admin_repository_sqlx::SqlxAdminRepository;
use portal_api::infrastructure::db::repositories::application_repository_sqlx::SqlxApplicationRepository;
use portal_api::infrastructure::db::repositories::contractor_repository_sqlx::SqlxContractorRepository;
use portal_api::infrastructure::db::repositories::line_repository_sqlx::SqlxLineRepository;
use portal_api::infrastructure::db::repositories::tag_repository_sqlx::SqlxTagRepository;
use portal_api::infrastructure::storage::s3_upload_signer::S3UploadSigner;
use portal_api::presentation::http as routes;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            portal_api::presentation::http::auth::admin_login,
            portal_api::presentation::http::auth::admin_logout,
            portal_api::presentation::http::auth::admin_me,
            portal_api::presentation::http::customer::customer_login,
            portal_api::presentation::http::customer::customer_logout,
            portal_api::presentation::http::customer::change_password,
            portal_api::presentation::http::customer::profile,
            portal_api::presentation::http::customer::list_lines,
            portal_api::presentation::http::customer::get_line,
            portal_api::presentation::http::customer::additional_order,
            portal_api::presentation::http::applications::get_draft,
            portal_api::presentation::http::applications::save_application,
            portal_api::presentation::http::admin_applications::list_applications,
            portal_api::presentation::http::admin_applications::get_application,
            portal_api::presentation::http::admin_applications::provision_lines,
            portal_api::presentation::http::admin_applications::update_application,
            portal_api::presentation::http::admin_applications::batch_update,
            portal_api::presentation::http::admin_applications::find_duplicates,
            portal_api::presentation::http::lines::create_line,
            portal_api::presentation::http::lines::update_line,
            portal_api::presentation::http::lines::delete_line,
            portal_api::presentation::http::tags::list_tags,
            portal_api::presentation::http::tags::create_tag,
            portal_api::presentation::http::tags::update_tag,
            portal_api::presentation::http::tags::delete_tag,
            portal_api::presentation::http::contractors::list_contractors,
            portal_api::presentation::http::contractors::merge_applications,
            portal_api::presentation::http::contractors::reset_password,
            portal_api::presentation::http::uploads::sign_upload,
            portal_api::presentation::http::health::health,
        ),
        components(schemas(
            portal_api::presentation::http::error::ErrorBody,
            portal_api::presentation::http::schemas::SuccessMessage,
            portal_api::presentation::http::schemas::AdminView,
            portal_api::presentation::http::schemas::TagView,
            portal_api::presentation::http::schemas::LineView,
            portal_api::presentation::http::schemas::ApplicationView,
            portal_api::presentation::http::schemas::ContractorView,
            portal_api::presentation::http::schemas::ApplicationSummaryView,
            portal_api::presentation::http::schemas::ContractorWithApplicationsView,
            portal_api::presentation::http::auth::LoginBody,
            portal_api::presentation::http::auth::AdminLoginResponse,
            portal_api::presentation::http::customer::CustomerUser,
            portal_api::presentation::http::customer::CustomerLoginResponse,
            portal_api::presentation::http::customer::ChangePasswordBody,
            portal_api::presentation::http::customer::ProfileResponse,
            portal_api::presentation::http::customer::LineSummaryView,
            portal_api::presentation::http::customer::CustomerLinesResponse,
            portal_api::presentation::http::customer::CustomerLineResponse,
            portal_api::presentation::http::customer::AdditionalOrderBody,
            portal_api::presentation::http::customer::OrderResponse,
            portal_api::presentation::http::applications::DraftResponse,
            portal_api::presentation::http::applications::SaveApplicationBody,
            portal_api::presentation::http::applications::SaveApplicationResponse,
            portal_api::application::dto::applications::ApplicationForm,
            portal_api::presentation::http::admin_applications::Pagination,
            portal_api::presentation::http::admin_applications::ApplicationListResponse,
            portal_api::presentation::http::admin_applications::ApplicationResponse,
            portal_api::presentation::http::admin_applications::UpdatedApplicationResponse,
            portal_api::presentation::http::admin_applications::ProvisionResponse,
            portal_api::presentation::http::admin_applications::UpdateApplicationBody,
            portal_api::presentation::http::admin_applications::StatusUpdateItem,
            portal_api::presentation::http::admin_applications::BatchUpdateBody,
            portal_api::presentation::http::admin_applications::BatchUpdateResponse,
            portal_api::presentation::http::admin_applications::DuplicateGroupView,
            portal_api::presentation::http::admin_applications::DuplicatesResponse,
            portal_api::presentation::http::lines::CreateLineBody,
            portal_api::presentation::http::lines::UpdateLineBody,
            portal_api::presentation::http::lines::LineResponse,
            portal_api::presentation::http::tags::TagListResponse,
            portal_api::presentation::http::tags::TagResponse,
            portal_api::presentation::http::tags::CreateTagBody,
            portal_api::presentation::http::tags::UpdateTagBody,
            portal_api::presentation::http::contractors::ContractorListResponse,
            portal_api::presentation::http::contractors::MergeBody,
            portal_api::presentation::http::contractors::MergeResponse,
            portal_api::presentation::http::contractors::ResetPasswordBody,
            portal_api::presentation::http::uploads::UploadSignatureRequest,
            portal_api::presentation::http::uploads::UploadSignatureResponse,
            portal_api::presentation::http::health::HealthResp,
            portal_api::domain::applications::application::ApplicantType,
            portal_api::domain::applications::application::ApplyType,
            portal_api::domain::applications::application::ApplicationStatus,
            portal_api::domain::applications::application::VerificationStatus,
            portal_api::domain::applications::application::PaymentStatus,
            portal_api::domain::lines::line::LineStatus,
            portal_api::domain::tags::tag::TagType,
        )),
        tags(
            (name = "Admin Auth", description = "Back-office sessions"),
            (name = "Admin Applications", description = "Application review and status management"),
            (name = "Admin Lines", description = "SIM line inventory"),
            (name = "Admin Tags", description = "SIM location and spare tags"),
            (name = "Admin Contractors", description = "Contractor accounts and merges"),
            (name = "Applications", description = "Customer sign-up form"),
            (name = "My Page", description = "Customer portal"),
            (name = "Uploads", description = "Signed document uploads"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "portal_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        port = cfg.api_port,
        production = cfg.is_production,
        bucket = %cfg.s3_bucket,
        "Starting portal backend"
    );

    // Database
    let pool =
        portal_api::infrastructure::db::connect_pool(&cfg.database_url, cfg.db_max_connections)
            .await?;
    portal_api::infrastructure::db::migrate(&pool).await?;

    let upload_signer = Arc::new(S3UploadSigner::new(&cfg).await?);

    let services = AppServices::new(
        Arc::new(SqlxAdminRepository::new(pool.clone())),
        Arc::new(SqlxApplicationRepository::new(pool.clone())),
        Arc::new(SqlxLineRepository::new(pool.clone())),
        Arc::new(SqlxTagRepository::new(pool.clone())),
        Arc::new(SqlxContractorRepository::new(pool.clone())),
        upload_signer,
        Arc::new(PgHealthProbe::new(pool.clone())),
    );

    let ctx = AppContext::new(cfg.clone(), services);

    let api_router = Router::new()
        .nest("/api", routes::health::routes(ctx.clone()))
        .nest("/api", routes::auth::routes(ctx.clone()))
        .nest("/api", routes::customer::routes(ctx.clone()))
        .nest("/api", routes::applications::routes(ctx.clone()))
        .nest("/api", routes::admin_applications::routes(ctx.clone()))
        .nest("/api", routes::lines::routes(ctx.clone()))
        .nest("/api", routes::tags::routes(ctx.clone()))
        .nest("/api", routes::contractors::routes(ctx.clone()))
        .nest("/api", routes::uploads::routes(ctx.clone()))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(build_cors(&cfg))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, api_router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP API stopped");
    Ok(())
}

fn build_cors(cfg: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::PATCH,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);

    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        // FRONTEND_URL is mandatory in production; deny everything if it is unusable.
        _ if cfg.is_production => base.allow_origin(AllowOrigin::exact(
            HeaderValue::from_static("http://invalid"),
        )),
        _ => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = ?e, "failed to listen for shutdown signal");
    }
}
