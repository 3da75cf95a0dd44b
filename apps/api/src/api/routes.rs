use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{self, auth, categories, items, not_found};
use crate::api::state::AppState;

/// Builds the application router
///
/// Every route carries a 404 method fallback so that an unsupported method
/// on a known path is reported exactly like an unknown path.
pub fn router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check).fallback(not_found))
        // Auth routes
        .route("/register", post(auth::register).fallback(not_found))
        .route("/login", post(auth::login).fallback(not_found))
        // Category routes
        .route(
            "/categories",
            get(categories::list_categories)
                .post(categories::create_category)
                .fallback(not_found),
        )
        .route(
            "/categories/names",
            get(categories::list_category_names).fallback(not_found),
        )
        .route(
            "/categories/:id/items",
            get(categories::list_category_items).fallback(not_found),
        )
        // Item routes
        .route(
            "/items",
            get(items::list_items)
                .post(items::create_item)
                .fallback(not_found),
        )
        .route(
            "/items/:id",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item)
                .fallback(not_found),
        )
        .fallback(not_found)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
