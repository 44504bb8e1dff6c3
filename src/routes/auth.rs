use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public gateway routes: registration, token exchange, liveness.
///
/// Both auth endpoints are necessarily anonymous; they are how a client
/// obtains credentials in the first place.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated probe for monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/signup
        // Creates an unconfirmed account and emails the confirmation code.
        .route("/auth/signup", post(handlers::signup))
        // POST /auth/token
        // Exchanges username + confirmation code for an access token.
        .route("/auth/token", post(handlers::obtain_token))
}
