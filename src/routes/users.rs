use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// User management routes.
///
/// The whole router is wrapped in the authentication middleware by
/// `create_router`; inside, the handlers distinguish the admin surface from
/// the `"me"` alias (self-service for any authenticated principal, with
/// `DELETE /users/me` answered by 405).
pub fn user_routes() -> Router<AppState> {
    Router::new()
        // GET /users?search=... (admin)  |  POST /users (admin)
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        // Single user by username, or the "me" alias.
        .route(
            "/users/{username}",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
}
