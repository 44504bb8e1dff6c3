use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod handlers;
pub mod models;
pub mod permissions;
pub mod repository;

// Routing, split by resource family.
pub mod routes;
use auth::AuthUser;
use routes::{auth as auth_routes, catalog, reviews, users};

// --- Public Re-exports ---

// Core state types for the application entry point (main.rs).
pub use config::AppConfig;
pub use email::{EmailState, LogEmailService, SmtpEmailService};
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Aggregates all annotated paths and schemas into the OpenAPI document
/// served at `/api-docs/openapi.json` and rendered by the Swagger UI.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::signup, handlers::obtain_token,
        handlers::list_users, handlers::create_user, handlers::get_user,
        handlers::update_user, handlers::delete_user,
        handlers::list_categories, handlers::create_category, handlers::destroy_category,
        handlers::list_genres, handlers::create_genre, handlers::destroy_genre,
        handlers::list_titles, handlers::get_title, handlers::create_title,
        handlers::update_title, handlers::delete_title,
        handlers::list_reviews, handlers::get_review, handlers::create_review,
        handlers::update_review, handlers::delete_review,
        handlers::list_comments, handlers::get_comment, handlers::create_comment,
        handlers::update_comment, handlers::delete_comment
    ),
    components(
        schemas(
            models::User, models::Role, models::Category, models::Genre, models::Title,
            models::Review, models::Comment,
            models::SignupRequest, models::TokenRequest, models::TokenResponse,
            models::CreateUserRequest, models::UpdateUserRequest, models::SlugInput,
            models::TitleInput, models::UpdateTitleRequest,
            models::ReviewInput, models::UpdateReviewRequest, models::CommentInput,
            models::UserPage, models::CategoryPage, models::GenrePage,
            models::TitlePage, models::ReviewPage, models::CommentPage,
            error::ErrorBody,
        )
    ),
    tags(
        (name = "ratehub", description = "Content review and rating API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe container holding all application services and
/// configuration, shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository layer: database access behind a trait object.
    pub repo: RepositoryState,
    /// Email layer: confirmation-code delivery behind a trait object.
    pub email: EmailState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Let extractors and handlers pull individual components out of the shared
// state without depending on the whole of it.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for EmailState {
    fn from_ref(app_state: &AppState) -> EmailState {
        app_state.email.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Route-level guard for the users router: resolving `AuthUser` rejects the
/// request with 401 before the handler runs if authentication fails.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing structure, applies global and scoped middleware,
/// and registers the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        // Documentation: auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Registration/token/health; anonymous by nature.
        .merge(auth_routes::auth_routes())
        // Catalog and review surfaces; write handlers gate themselves.
        .merge(catalog::catalog_routes())
        .merge(reviews::review_routes())
        // User management: every route requires a principal, enforced once
        // at the router layer.
        .merge(
            users::user_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        .with_state(state);

    // Observability and correlation layers, outermost.
    base_router
        .layer(
            ServiceBuilder::new()
                // Unique request id for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // Request tracing spans carrying the generated id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Return the id to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: includes method, URI, and the propagated
/// `x-request-id` so all log lines of one request correlate.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
