use axum::{
    handler::HandlerWithoutStateExt,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::api::{handlers, product_handlers};
use crate::store::traits::Store;

/// Build the service router. Paths outside the API are served from
/// `static_dir` (the browser UI); anything else answers 404 in JSON.
pub fn create_router<S: Store + 'static>(static_dir: &str) -> Router<Arc<S>> {
    let static_files = ServeDir::new(static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(handlers::not_found.into_service());

    Router::new()
        // Health check
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::method_not_allowed),
        )
        // Wishlists
        .route(
            "/wishlists",
            get(handlers::list_wishlists::<S>)
                .post(handlers::create_wishlist::<S>)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/wishlists/:wishlist_id",
            get(handlers::get_wishlist::<S>)
                .put(handlers::update_wishlist::<S>)
                .delete(handlers::delete_wishlist::<S>)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/wishlists/:wishlist_id/archive",
            put(handlers::archive_wishlist::<S>).fallback(handlers::method_not_allowed),
        )
        .route(
            "/wishlists/:wishlist_id/unarchive",
            put(handlers::unarchive_wishlist::<S>).fallback(handlers::method_not_allowed),
        )
        // Products within a wishlist
        .route(
            "/wishlists/:wishlist_id/products",
            get(product_handlers::list_products::<S>)
                .post(product_handlers::create_product::<S>)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/wishlists/:wishlist_id/products/:product_id",
            get(product_handlers::get_product::<S>)
                .put(product_handlers::update_product::<S>)
                .delete(product_handlers::delete_product::<S>)
                .fallback(handlers::method_not_allowed),
        )
        // Browser UI
        .fallback_service(static_files)
}
