use crate::api::error::ApiError;
use crate::api::handlers::{load_wishlist, path_params, query_params, AppState};
use crate::api::payload::JsonPayload;
use crate::model::{NewProduct, Product, ProductDetails};
use crate::store::traits::Store;
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub product_id: Option<i32>,
}

fn product_not_found(id: i32) -> ApiError {
    ApiError::NotFound(format!("Product with id '{}' was not found.", id))
}

async fn load_product<S: Store>(store: &S, id: i32) -> Result<Product, ApiError> {
    store
        .find_product(id)
        .await?
        .ok_or_else(|| product_not_found(id))
}

/// GET /wishlists/{wishlist_id}/products
/// 404 when the wishlist is missing or the `product_id` filter matches nothing
pub async fn list_products<S: Store>(
    State(store): State<AppState<S>>,
    path: Result<Path<i32>, PathRejection>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let wishlist_id = path_params(path)?;
    log::info!("Request for Products in Wishlist with id: {}", wishlist_id);
    let params = query_params(query)?;
    let wishlist = load_wishlist(&*store, wishlist_id).await?;

    let Some(product_id) = params.product_id else {
        return Ok(Json(wishlist.wishlist_products));
    };

    let mut products = store.find_products_by_product_id(product_id).await?;
    products.retain(|product| product.wishlist_id == wishlist_id);
    if products.is_empty() {
        return Err(ApiError::NotFound(format!(
            "Product with product_id '{}' was not found in Wishlist '{}'.",
            product_id, wishlist_id
        )));
    }
    Ok(Json(products))
}

/// POST /wishlists/{wishlist_id}/products
/// The owning wishlist comes from the path, never from the body
pub async fn create_product<S: Store>(
    State(store): State<AppState<S>>,
    path: Result<Path<i32>, PathRejection>,
    JsonPayload(data): JsonPayload,
) -> Result<impl IntoResponse, ApiError> {
    let wishlist_id = path_params(path)?;
    log::info!("Request to add a Product to Wishlist with id: {}", wishlist_id);
    let wishlist = load_wishlist(&*store, wishlist_id).await?;

    let new_product = NewProduct::from_json_for(wishlist.id, &data)?;
    let product = store.create_product(new_product).await?;

    let location = format!("/wishlists/{}/products/{}", wishlist.id, product.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(product),
    ))
}

/// GET /wishlists/{wishlist_id}/products/{product_id}
/// Products are addressed by their own id
pub async fn get_product<S: Store>(
    State(store): State<AppState<S>>,
    path: Result<Path<(i32, i32)>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let (wishlist_id, product_id) = path_params(path)?;
    log::info!(
        "Request for Product with id: {} (via Wishlist {})",
        product_id,
        wishlist_id
    );
    Ok(Json(load_product(&*store, product_id).await?))
}

/// PUT /wishlists/{wishlist_id}/products/{product_id}
/// `id` and `wishlist_id` of the stored product are preserved
pub async fn update_product<S: Store>(
    State(store): State<AppState<S>>,
    path: Result<Path<(i32, i32)>, PathRejection>,
    JsonPayload(data): JsonPayload,
) -> Result<Json<Product>, ApiError> {
    let (wishlist_id, product_id) = path_params(path)?;
    log::info!(
        "Request to update Product with id: {} (via Wishlist {})",
        product_id,
        wishlist_id
    );
    let mut product = load_product(&*store, product_id).await?;

    let details = ProductDetails::from_json(&data)?;
    product.apply(details);
    store.update_product(&product).await?;
    Ok(Json(product))
}

/// DELETE /wishlists/{wishlist_id}/products/{product_id}
pub async fn delete_product<S: Store>(
    State(store): State<AppState<S>>,
    path: Result<Path<(i32, i32)>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let (wishlist_id, product_id) = path_params(path)?;
    log::info!(
        "Request to delete Product with id: {} (via Wishlist {})",
        product_id,
        wishlist_id
    );
    if !store.delete_product(product_id).await? {
        return Err(product_not_found(product_id));
    }
    Ok(StatusCode::NO_CONTENT)
}
