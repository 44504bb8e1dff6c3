use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get},
};

/// Catalog routes: categories, genres, titles.
///
/// Reads are public; the write handlers enforce the admin gate themselves.
/// Categories and genres deliberately register no GET/PATCH on the
/// single-object path, so those methods answer 405 straight from the router,
/// admins included.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        // GET /categories?search=...  |  POST /categories (admin)
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        // DELETE /categories/{slug} (admin); no retrieve/update on this path.
        .route("/categories/{slug}", delete(handlers::destroy_category))
        // GET /genres?search=...  |  POST /genres (admin)
        .route(
            "/genres",
            get(handlers::list_genres).post(handlers::create_genre),
        )
        // DELETE /genres/{slug} (admin); no retrieve/update on this path.
        .route("/genres/{slug}", delete(handlers::destroy_genre))
        // GET /titles?name=&category=&genre=&year=  |  POST /titles (admin)
        .route(
            "/titles",
            get(handlers::list_titles).post(handlers::create_title),
        )
        // Full single-title surface; update accepts PUT and PATCH alike.
        .route(
            "/titles/{id}",
            get(handlers::get_title)
                .patch(handlers::update_title)
                .put(handlers::update_title)
                .delete(handlers::delete_title),
        )
}
