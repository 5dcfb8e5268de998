use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::payload::JsonPayload;
use crate::model::{NewWishlist, Wishlist};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: u16,
    pub message: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: StatusCode::OK.as_u16(),
        message: "Healthy".to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct WishlistQuery {
    pub wishlist_name: Option<String>,
    pub product_id: Option<i32>,
}

/// Query-string errors are reported in the same JSON shape as every other error
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Path ids that do not parse as `i32` answer 404
pub(crate) fn path_params<T>(path: Result<Path<T>, PathRejection>) -> Result<T, ApiError> {
    path
        .map(|Path(params)| params)
        .map_err(|rejection| ApiError::NotFound(rejection.body_text()))
}

pub(crate) fn wishlist_not_found(id: i32) -> ApiError {
    ApiError::NotFound(format!("Wishlist with id '{}' was not found.", id))
}

pub(crate) async fn load_wishlist<S: Store>(store: &S, id: i32) -> Result<Wishlist, ApiError> {
    store
        .find_wishlist(id)
        .await?
        .ok_or_else(|| wishlist_not_found(id))
}

/// Reject `name` if a wishlist other than `except` already carries it
async fn ensure_name_available<S: Store>(
    store: &S,
    name: &str,
    except: Option<i32>,
) -> Result<(), ApiError> {
    let taken = store
        .find_wishlists_by_name(name)
        .await?
        .iter()
        .any(|existing| Some(existing.id) != except);

    if taken {
        return Err(ApiError::Conflict(format!(
            "Wishlist with name '{}' already exists.",
            name
        )));
    }
    Ok(())
}

/// GET /wishlists
/// List wishlists, optionally by exact name; `product_id` narrows each
/// wishlist's product collection
pub async fn list_wishlists<S: Store>(
    State(store): State<AppState<S>>,
    query: Result<Query<WishlistQuery>, QueryRejection>,
) -> Result<Json<Vec<Wishlist>>, ApiError> {
    log::info!("Request for a List of Wishlists");
    let params = query_params(query)?;

    let mut wishlists = match &params.wishlist_name {
        Some(name) => {
            let found = store.find_wishlists_by_name(name).await?;
            if found.is_empty() {
                return Err(ApiError::NotFound(format!(
                    "Wishlist with name '{}' was not found.",
                    name
                )));
            }
            found
        }
        None => store.all_wishlists().await?,
    };

    if let Some(product_id) = params.product_id {
        for wishlist in &mut wishlists {
            wishlist.retain_product_id(product_id);
        }
    }

    Ok(Json(wishlists))
}

/// GET /wishlists/{wishlist_id}
pub async fn get_wishlist<S: Store>(
    State(store): State<AppState<S>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Wishlist>, ApiError> {
    let wishlist_id = path_params(path)?;
    log::info!("Request for Wishlist with id: {}", wishlist_id);
    Ok(Json(load_wishlist(&*store, wishlist_id).await?))
}

/// POST /wishlists
pub async fn create_wishlist<S: Store>(
    State(store): State<AppState<S>>,
    JsonPayload(data): JsonPayload,
) -> Result<impl IntoResponse, ApiError> {
    log::info!("Request to create a Wishlist");
    let new_wishlist = NewWishlist::from_json(&data)?;
    ensure_name_available(&*store, &new_wishlist.wishlist_name, None).await?;

    let wishlist = store.create_wishlist(new_wishlist).await?;
    log::info!("Wishlist with id [{}] created", wishlist.id);

    let location = format!("/wishlists/{}", wishlist.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(wishlist),
    ))
}

/// PUT /wishlists/{wishlist_id}
/// Rename and/or re-own a wishlist; `archived` changes only when supplied
pub async fn update_wishlist<S: Store>(
    State(store): State<AppState<S>>,
    path: Result<Path<i32>, PathRejection>,
    JsonPayload(data): JsonPayload,
) -> Result<Json<Wishlist>, ApiError> {
    let wishlist_id = path_params(path)?;
    log::info!("Request to update Wishlist with id: {}", wishlist_id);
    let mut wishlist = load_wishlist(&*store, wishlist_id).await?;

    let update = NewWishlist::from_json(&data)?;
    ensure_name_available(&*store, &update.wishlist_name, Some(wishlist_id)).await?;

    wishlist.apply(update);
    store.update_wishlist(&wishlist).await?;
    Ok(Json(wishlist))
}

/// DELETE /wishlists/{wishlist_id}
/// Always 204, whether or not the wishlist existed
pub async fn delete_wishlist<S: Store>(
    State(store): State<AppState<S>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let wishlist_id = path_params(path)?;
    log::info!("Request to delete Wishlist with id: {}", wishlist_id);
    if !store.delete_wishlist(wishlist_id).await? {
        log::info!("Wishlist with id [{}] did not exist", wishlist_id);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /wishlists/{wishlist_id}/archive
pub async fn archive_wishlist<S: Store>(
    State(store): State<AppState<S>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Wishlist>, ApiError> {
    let wishlist_id = path_params(path)?;
    log::info!("Request to archive Wishlist with id: {}", wishlist_id);
    let mut wishlist = load_wishlist(&*store, wishlist_id).await?;
    wishlist.archive();
    store.update_wishlist(&wishlist).await?;
    Ok(Json(wishlist))
}

/// PUT /wishlists/{wishlist_id}/unarchive
pub async fn unarchive_wishlist<S: Store>(
    State(store): State<AppState<S>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Wishlist>, ApiError> {
    let wishlist_id = path_params(path)?;
    log::info!("Request to unarchive Wishlist with id: {}", wishlist_id);
    let mut wishlist = load_wishlist(&*store, wishlist_id).await?;
    wishlist.unarchive();
    store.update_wishlist(&wishlist).await?;
    Ok(Json(wishlist))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("The requested resource does not exist.".to_string())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("The method is not allowed for the requested URL.".to_string())
}
