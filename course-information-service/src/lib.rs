pub mod config;
pub mod dtos;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod services;

use service_core::axum::{
    http::{header, HeaderValue, Method, Request},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Json, Router,
};
use service_core::error::AppError;
use service_core::metrics::metrics_endpoint;
use service_core::middleware::{
    metrics::metrics_middleware,
    rate_limit::{create_ip_rate_limiter, ip_rate_limit_middleware, IpRateLimit},
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{CatalogBackend, CourseConfig};
use crate::services::{CourseInformationService, MongoCatalog, SnapshotCatalog};

pub const API_PREFIX: &str = "/api/courseInformation";

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::courses::sections_by_professor,
        handlers::courses::courses_by_major,
        handlers::courses::section_by_crn,
        handlers::courses::courses_by_athena_name,
        handlers::courses::all_buildings,
        handlers::courses::special_course_types,
        handlers::courses::all_subjects,
        handlers::courses::courses_by_term,
        handlers::courses::course_by_id,
        handlers::courses::search_courses,
        handlers::courses::corequisites,
        handlers::courses::prerequisites,
        handlers::courses::sections_by_time_slot,
        handlers::courses::courses_by_requirement,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            models::Course,
            models::CourseSection,
            models::MeetingTime,
            models::SpecialCourseType,
            models::Building,
        )
    ),
    tags(
        (name = "course-information", description = "Section and course lookups from the course PDFs"),
        (name = "bulletin", description = "Bulletin lookups: terms, requirements, prerequisites"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: CourseConfig,
    pub catalog: Arc<dyn CourseInformationService>,
    pub ip_rate_limit: IpRateLimit,
}

impl AppState {
    pub fn new(config: CourseConfig, catalog: Arc<dyn CourseInformationService>) -> Self {
        let limiter =
            create_ip_rate_limiter(config.rate_limit.requests, config.rate_limit.window_seconds);
        let ip_rate_limit = IpRateLimit::new(limiter, config.rate_limit.trust_forwarded_for);
        Self {
            config,
            catalog,
            ip_rate_limit,
        }
    }
}

/// Open the catalog backend selected by configuration.
pub async fn connect_catalog(
    config: &CourseConfig,
) -> Result<Arc<dyn CourseInformationService>, AppError> {
    match config.catalog.backend {
        CatalogBackend::Mongo => {
            let uri = config.catalog.mongodb_uri.as_deref().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!("MONGODB_URI is required for the mongo backend"))
            })?;
            let catalog = MongoCatalog::connect(uri, &config.catalog.mongodb_database).await?;
            catalog.initialize_indexes().await?;
            Ok(Arc::new(catalog))
        }
        CatalogBackend::Snapshot => {
            let catalog = SnapshotCatalog::load(&config.catalog.snapshot_path).await?;
            Ok(Arc::new(catalog))
        }
    }
}

fn catalog_routes() -> Router<AppState> {
    use handlers::courses;

    Router::new()
        .route("/professor", get(courses::sections_by_professor))
        .route("/coursesByMajor", get(courses::courses_by_major))
        .route("/section-by-crn", get(courses::section_by_crn))
        .route("/course-by-athena-name", get(courses::courses_by_athena_name))
        .route("/buildings", get(courses::all_buildings))
        .route(
            "/course/specialCourseTypes",
            get(courses::special_course_types),
        )
        .route("/subjects", get(courses::all_subjects))
        .route("/term", get(courses::courses_by_term))
        .route("/getCourseById", get(courses::course_by_id))
        .route("/courses", get(courses::search_courses))
        .route("/course/coreqs", get(courses::corequisites))
        .route("/course/prereqs", get(courses::prerequisites))
        .route("/course/sections", get(courses::sections_by_time_slot))
        .route("/requirement", get(courses::courses_by_requirement))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Ignoring invalid CORS origin '{}': {}", o, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(metrics_endpoint));

    if state.config.swagger_enabled {
        app = app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    } else {
        // Keep the document reachable for client generators.
        app = app.route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );
    }

    let ip_limit = state.ip_rate_limit.clone();

    app.nest(API_PREFIX, catalog_routes())
        .route_layer(from_fn(metrics_middleware))
        .with_state(state.clone())
        .layer(from_fn_with_state(ip_limit, ip_rate_limit_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(&state.config.security.allowed_origins))
}
