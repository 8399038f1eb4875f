use axum::{
    Router,
    extract::{
        DefaultBodyLimit, State,
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::NormalizePath;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::response::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{Auth, AuthError};
use crate::config::Config;
use crate::store::{Store, StoreError};

pub mod about_handlers;
pub mod auth_handlers;
pub mod contact_handlers;
pub mod dto;
pub mod extract;
pub mod project_handlers;
pub mod seo;
pub mod service_handlers;
pub mod session;
pub mod team_handlers;
pub mod testimonial_handlers;
pub mod upload;
pub mod validation;

// ---------- shared state ----------

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub auth: Arc<Auth>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            auth: Arc::new(Auth::new(store.clone())),
            store,
            config: Arc::new(config),
        }
    }
}

// ---------- error type ----------

/// Every failure a route can surface. Rendered as `{"error": "...", "code": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiErr {
    #[error("authentication required")]
    Unauthenticated,
    #[error("admin access required")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("service temporarily unavailable")]
    Unavailable,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    Internal(String),
}

impl ApiErr {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(e: impl std::fmt::Display) -> Self {
        Self::Internal(e.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErr::Unauthenticated | ApiErr::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiErr::Unauthorized => StatusCode::FORBIDDEN,
            ApiErr::NotFound(_) => StatusCode::NOT_FOUND,
            ApiErr::Validation(_) => StatusCode::BAD_REQUEST,
            ApiErr::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiErr::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiErr::Unauthenticated => "UNAUTHENTICATED",
            ApiErr::Unauthorized => "FORBIDDEN",
            ApiErr::NotFound(_) => "NOT_FOUND",
            ApiErr::Validation(_) => "VALIDATION",
            ApiErr::Unavailable => "UNAVAILABLE",
            ApiErr::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiErr::Internal(_) => "INTERNAL",
        }
    }
}

impl From<StoreError> for ApiErr {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable => ApiErr::Unavailable,
            StoreError::NotFound(what) => ApiErr::NotFound(what.to_string()),
            StoreError::Db(e) => ApiErr::internal(e),
        }
    }
}

impl From<AuthError> for ApiErr {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unavailable => ApiErr::Unavailable,
            AuthError::InvalidCredentials => ApiErr::InvalidCredentials,
            AuthError::Validation(msg) => ApiErr::Validation(msg),
            AuthError::EmailTaken(email) => {
                ApiErr::Validation(format!("a user with email {email} already exists"))
            }
            AuthError::NotFound => ApiErr::NotFound("user".to_string()),
            AuthError::Hash(msg) => ApiErr::Internal(msg),
            AuthError::Store(e) => e.into(),
        }
    }
}

// Malformed bodies, paths and forms are client errors like any other.
impl From<JsonRejection> for ApiErr {
    fn from(rejection: JsonRejection) -> Self {
        ApiErr::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiErr {
    fn from(rejection: PathRejection) -> Self {
        ApiErr::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiErr {
    fn from(rejection: MultipartRejection) -> Self {
        ApiErr::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiErr::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = serde_json::json!({ "error": message, "code": self.code() });
        (self.status(), Json(body)).into_response()
    }
}

// ---------- router ----------

/// Multipart framing on top of the file itself.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn app_router(state: AppState) -> Router {
    let config = state.config.clone();

    let allowed_origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let cors = if allowed_origins.is_empty() {
        CorsLayer::new() // no origins allowed = same-origin only
    } else {
        CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
    };

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/sitemap.xml", get(seo::sitemap))
        .route("/robots.txt", get(seo::robots))
        .nest("/api/auth", auth_routes())
        .route(
            "/api/upload",
            post(upload::upload_file)
                .layer(DefaultBodyLimit::max(config.max_upload_bytes + UPLOAD_OVERHEAD_BYTES)),
        )
        .nest("/api/v1", api_v1())
        .nest_service("/uploads", ServeDir::new(&config.upload_dir));

    if let Some(dir) = &config.static_dir {
        // Client-side routes fall through to the SPA entry point.
        router = router.fallback_service(
            ServeDir::new(dir).not_found_service(ServeFile::new(dir.join("index.html"))),
        );
    }

    router
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The router behind trailing-slash normalisation. Path rewriting has to run
/// before routing, so it wraps the finished router instead of being a
/// `Router::layer`.
pub type AppService = NormalizePath<Router>;

pub fn app_service(state: AppState) -> AppService {
    NormalizePath::trim_trailing_slash(app_router(state))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "database": state.store.is_available(),
    }))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth_handlers::login))
        .route("/logout", post(auth_handlers::logout))
        .route("/me", get(auth_handlers::me))
        .route("/change-password", post(auth_handlers::change_password))
}

fn api_v1() -> Router<AppState> {
    Router::new()
        // services
        .route(
            "/services",
            get(service_handlers::list_services).post(service_handlers::create_service),
        )
        .route(
            "/services/{id}",
            get(service_handlers::get_service)
                .put(service_handlers::update_service)
                .delete(service_handlers::delete_service),
        )
        // projects
        .route(
            "/projects",
            get(project_handlers::list_projects).post(project_handlers::create_project),
        )
        .route(
            "/projects/{id}",
            get(project_handlers::get_project)
                .put(project_handlers::update_project)
                .delete(project_handlers::delete_project),
        )
        .route(
            "/projects/{id}/images",
            get(project_handlers::list_project_images)
                .post(project_handlers::create_project_image)
                .delete(project_handlers::delete_project_images),
        )
        .route(
            "/project-images/{id}",
            delete(project_handlers::delete_project_image),
        )
        // about
        .route("/about", get(about_handlers::list_about_content))
        .route(
            "/about/{section}",
            get(about_handlers::get_about_section).put(about_handlers::upsert_about_section),
        )
        // team
        .route(
            "/team",
            get(team_handlers::list_team_members).post(team_handlers::create_team_member),
        )
        .route(
            "/team/{id}",
            get(team_handlers::get_team_member)
                .put(team_handlers::update_team_member)
                .delete(team_handlers::delete_team_member),
        )
        // contact
        .route(
            "/contact",
            get(contact_handlers::get_contact_info).put(contact_handlers::update_contact_info),
        )
        // testimonials
        .route(
            "/testimonials",
            get(testimonial_handlers::list_published_testimonials)
                .post(testimonial_handlers::create_testimonial),
        )
        .route(
            "/testimonials/all",
            get(testimonial_handlers::list_testimonials),
        )
        .route(
            "/testimonials/{id}",
            get(testimonial_handlers::get_testimonial)
                .put(testimonial_handlers::update_testimonial)
                .delete(testimonial_handlers::delete_testimonial),
        )
        .route(
            "/testimonials/{id}/published",
            put(testimonial_handlers::set_testimonial_published),
        )
}
