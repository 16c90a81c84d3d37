//! Shared setup for course-information-service router tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use course_information_service::{
    build_router,
    config::{CatalogBackend, CatalogConfig, CourseConfig, Environment, RateLimitConfig, SecurityConfig},
    models::{Building, Course, CourseSection, SpecialCourseType, TimeSlot},
    services::{
        CatalogError, CatalogSnapshot, CourseFilter, CourseInformationService, CourseRef,
        SnapshotCatalog,
    },
    AppState,
};
use std::sync::Arc;
use tower::util::ServiceExt;

pub const SAMPLE_CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalog.sample.json");

pub fn test_config() -> CourseConfig {
    CourseConfig {
        common: service_core::config::Config::default(),
        environment: Environment::Dev,
        service_name: "course-information-service".to_string(),
        service_version: "test".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        catalog: CatalogConfig {
            backend: CatalogBackend::Snapshot,
            mongodb_uri: None,
            mongodb_database: "course_information_test".to_string(),
            snapshot_path: SAMPLE_CATALOG.to_string(),
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        swagger_enabled: false,
        rate_limit: RateLimitConfig {
            requests: 10_000,
            window_seconds: 60,
            trust_forwarded_for: false,
        },
    }
}

/// Catalog whose every lookup fails, standing in for a broken backend.
pub struct FailingCatalog;

fn backend_down() -> CatalogError {
    CatalogError::Internal(anyhow::anyhow!("catalog backend unreachable"))
}

#[async_trait]
impl CourseInformationService for FailingCatalog {
    async fn sections_by_professor(&self, _: &str) -> Result<Vec<CourseSection>, CatalogError> {
        Err(backend_down())
    }

    async fn courses_by_major(&self, _: &str) -> Result<Vec<Course>, CatalogError> {
        Err(backend_down())
    }

    async fn section_by_crn(&self, _: &str) -> Result<Option<CourseSection>, CatalogError> {
        Err(backend_down())
    }

    async fn courses_by_athena_name(&self, _: &str) -> Result<Vec<Course>, CatalogError> {
        Err(backend_down())
    }

    async fn all_buildings(&self) -> Result<Vec<Building>, CatalogError> {
        Err(backend_down())
    }

    async fn special_course_types(
        &self,
        _: &str,
    ) -> Result<Vec<SpecialCourseType>, CatalogError> {
        Err(backend_down())
    }

    async fn all_subjects(&self) -> Result<Vec<String>, CatalogError> {
        Err(backend_down())
    }

    async fn courses_by_term(&self, _: &str) -> Result<Vec<Course>, CatalogError> {
        Err(backend_down())
    }

    async fn course_by_id(&self, _: &str) -> Result<Option<Course>, CatalogError> {
        Err(backend_down())
    }

    async fn courses_matching(&self, _: &CourseFilter) -> Result<Vec<Course>, CatalogError> {
        Err(backend_down())
    }

    async fn corequisites(&self, _: &CourseRef) -> Result<Vec<Course>, CatalogError> {
        Err(backend_down())
    }

    async fn prerequisites(&self, _: &CourseRef) -> Result<Vec<Course>, CatalogError> {
        Err(backend_down())
    }

    async fn sections_by_time_slot(
        &self,
        _: Option<&TimeSlot>,
        _: Option<&str>,
    ) -> Result<Vec<CourseSection>, CatalogError> {
        Err(backend_down())
    }

    async fn courses_by_requirement(&self, _: &str) -> Result<Vec<Course>, CatalogError> {
        Err(backend_down())
    }

    async fn health_check(&self) -> Result<(), CatalogError> {
        Err(backend_down())
    }
}

pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn with_catalog(catalog: Arc<dyn CourseInformationService>) -> Self {
        Self::with_config(test_config(), catalog)
    }

    pub fn with_config(config: CourseConfig, catalog: Arc<dyn CourseInformationService>) -> Self {
        let state = AppState::new(config, catalog);
        Self {
            router: build_router(state),
        }
    }

    /// Router over the bundled sample catalog.
    pub async fn sample() -> Self {
        let catalog = SnapshotCatalog::load(SAMPLE_CATALOG)
            .await
            .expect("Failed to load sample catalog");
        Self::with_catalog(Arc::new(catalog))
    }

    pub fn empty() -> Self {
        Self::with_catalog(Arc::new(SnapshotCatalog::new(CatalogSnapshot::default())))
    }

    pub fn failing() -> Self {
        Self::with_catalog(Arc::new(FailingCatalog))
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
        };

        (status, json)
    }
}
