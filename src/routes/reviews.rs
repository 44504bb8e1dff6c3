use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Review and comment routes, nested under their title.
///
/// Reads are public. Writes resolve the principal through `MaybeUser` and
/// run the request-level and object-level permission checks in the handler,
/// so an anonymous writer is rejected before any parent lookup or mutation.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        // GET (public) | POST (authenticated) /titles/{title_id}/reviews
        .route(
            "/titles/{title_id}/reviews",
            get(handlers::list_reviews).post(handlers::create_review),
        )
        // Single review: author, moderator, or admin may modify.
        .route(
            "/titles/{title_id}/reviews/{review_id}",
            get(handlers::get_review)
                .patch(handlers::update_review)
                .put(handlers::update_review)
                .delete(handlers::delete_review),
        )
        // GET (public) | POST (authenticated) comments under a review.
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        // Single comment: same object-level rules as reviews.
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(handlers::get_comment)
                .patch(handlers::update_comment)
                .put(handlers::update_comment)
                .delete(handlers::delete_comment),
        )
}
