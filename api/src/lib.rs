//! Reporta API
//!
//! HTTP service for the incident reporting workflow.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            REPORTA API                                  │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌─────────────┐ │
//! │  │   Catalog    │  │   Intake     │  │   Reports    │  │  Dashboard  │ │
//! │  │ areas/forms  │  │ verify+form  │  │ list/status  │  │  per role   │ │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └─────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           reporta-forms  |  reporta-workflow                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐  ┌────────────────────────────────┐  │
//! │  │  RelationalStore (PostgREST) │  │  ObjectStorage (Storage API)   │  │
//! │  └──────────────────────────────┘  └────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod demo;
pub mod error;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod routes;
pub mod services;
pub mod session;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use reporta_store::{
    InMemoryObjectStorage, InMemoryStore, ObjectStorage, RelationalStore, RestObjectStorage, RestStore, StoreError,
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

pub use config::{ApiConfig, ConfigError, StoreBackend};
pub use error::{ApiError, ApiResult};
pub use models::*;

/// API state
pub struct ApiState {
    pub config: ApiConfig,
    pub store: Arc<dyn RelationalStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub notifier: Arc<dyn notify::Notifier>,
    pub sessions: session::SessionRegistry,
}

impl ApiState {
    pub fn new(
        config: ApiConfig,
        store: Arc<dyn RelationalStore>,
        storage: Arc<dyn ObjectStorage>,
        notifier: Arc<dyn notify::Notifier>,
    ) -> Self {
        let sessions = session::SessionRegistry::new(&config.jwt_secret, config.session_ttl_secs);
        Self { config, store, storage, notifier, sessions }
    }

    /// Wire the adapters selected by `config`. The memory backend starts
    /// with the demo catalog.
    pub fn from_config(config: ApiConfig) -> Result<Self, StoreError> {
        let notifier = Arc::new(notify::LogNotifier::new(config.notifications));
        let store: Arc<dyn RelationalStore>;
        let storage: Arc<dyn ObjectStorage>;
        match &config.store {
            StoreBackend::Memory => {
                let memory = InMemoryStore::new();
                demo::seed(&memory);
                store = Arc::new(memory);
                storage = Arc::new(match config.storage_public_url.as_deref() {
                    Some(base) => InMemoryObjectStorage::new(base),
                    None => InMemoryObjectStorage::default(),
                });
            }
            StoreBackend::Rest { url, key } => {
                store = Arc::new(RestStore::new(url, key)?);
                storage = Arc::new(RestObjectStorage::new(
                    url,
                    key,
                    &config.storage_bucket,
                    config.storage_public_url.as_deref(),
                )?);
            }
        }
        Ok(Self::new(config, store, storage, notifier))
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reporta API",
        version = "0.1.0",
        description = "Incident reports by area, from student intake to resolution",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::auth::login,
        routes::auth::logout,
        routes::auth::me,
        routes::students::verify_student,
        routes::areas::list_areas,
        routes::areas::get_area,
        routes::areas::get_form,
        routes::areas::submit_report,
        routes::locations::list_pabellones,
        routes::locations::list_salones,
        routes::reports::list_reports,
        routes::reports::get_report,
        routes::reports::update_status,
        routes::dashboard::get_dashboard,
        routes::uploads::upload_file,
        routes::admin::create_area,
        routes::admin::update_area,
        routes::admin::delete_area,
        routes::admin::set_area_image,
        routes::admin::list_fields,
        routes::admin::add_field,
        routes::admin::delete_field,
        routes::admin::list_options,
        routes::admin::add_option,
        routes::admin::delete_option,
        routes::notifications::get_status,
        routes::notifications::request_permission,
    ),
    components(
        schemas(
            ErrorResponse,
            LoginRequest, LoginResponse, SessionView,
            VerifyStudentRequest, StudentDto,
            AreaDto, AreaForm, PabellonDto, SalonDto,
            SubmitRequest, SubmissionView, StatusDisplayDto, StatusUpdateRequest,
            UploadResponse,
            AreaCreate, AreaUpdate, FieldCreate, FieldDto, OptionCreate, OptionDto, Deleted,
            StatusCounts, AreaSummary, DashboardView,
            NotificationStatus, notify::NotificationPermission,
            routes::health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Operator sessions"),
        (name = "students", description = "Student verification"),
        (name = "areas", description = "Areas, forms and report intake"),
        (name = "locations", description = "Pabellones and salones"),
        (name = "reports", description = "Report triage"),
        (name = "dashboard", description = "Role dashboards"),
        (name = "uploads", description = "Form file uploads"),
        (name = "admin", description = "Area administration"),
        (name = "notifications", description = "Notification permission")
    )
)]
pub struct ApiDoc;

/// Build the API router
pub fn build_router(state: ApiState) -> Router {
    // Leave room above the policy limit so oversize files reach the policy check.
    let body_limit = state.config.upload.max_bytes.saturating_add(64 * 1024);
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(CompressionLayer::new())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(Arc::new(state))
}

fn api_routes() -> Router<Arc<ApiState>> {
    Router::new()
        // Public
        .nest("/auth", routes::auth::router())
        .nest("/students", routes::students::router())
        .nest("/areas", routes::areas::router())
        .nest("/pabellones", routes::locations::router())
        .nest("/uploads", routes::uploads::router())
        // Operators
        .nest("/reports", routes::reports::router())
        .nest("/dashboard", routes::dashboard::router())
        .nest("/notifications", routes::notifications::router())
        // Administration
        .nest("/admin", routes::admin::router())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use reporta_workflow::WorkflowFlavor;

    pub fn demo_parts(flavor: WorkflowFlavor) -> (ApiState, Arc<InMemoryStore>, Arc<InMemoryObjectStorage>) {
        let config = ApiConfig { workflow: flavor, ..ApiConfig::default() };
        let store = Arc::new(InMemoryStore::new());
        demo::seed(&store);
        let storage = Arc::new(InMemoryObjectStorage::default());
        let notifier = Arc::new(notify::LogNotifier::new(notify::NotificationPermission::Granted));
        let state = ApiState::new(config, store.clone(), storage.clone(), notifier);
        (state, store, storage)
    }

    pub fn demo_state_with(flavor: WorkflowFlavor) -> ApiState {
        demo_parts(flavor).0
    }

    pub fn demo_state() -> ApiState {
        demo_state_with(WorkflowFlavor::Tracking)
    }
}
