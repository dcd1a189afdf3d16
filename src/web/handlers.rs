use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::utils::error::{AppError, Result};
use crate::web::auth::Owner;
use crate::web::AppState;

const DEFAULT_HISTORY_LIMIT: i64 = 100;
const DEFAULT_EVENT_LIMIT: i64 = 50;

#[derive(Debug, Deserialize, Validate)]
pub struct AddProductRequest {
    #[validate(url(message = "must be a valid URL"))]
    pub url: String,
    pub target_price: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    /// Absent leaves the target untouched; an explicit `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub target_price: Option<Option<Decimal>>,
    #[validate(range(min = 1, max = 720, message = "must be between 1 and 720 hours"))]
    pub check_interval_hours: Option<i64>,
}

fn double_option<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Option<Decimal>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn list_products(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
) -> Result<impl IntoResponse> {
    let products = state.store.list_items(&owner_id).await?;
    Ok(Json(json!({ "products": products })))
}

pub async fn add_product(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Json(request): Json<AddProductRequest>,
) -> Result<impl IntoResponse> {
    request.validate()?;

    let product = state
        .tracker
        .create_item(&owner_id, &request.url, request.target_price)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "product": product }))))
}

pub async fn get_product(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let product = state
        .store
        .get_item(&id, &owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource: "product".to_string(),
        })?;
    Ok(Json(json!({ "product": product })))
}

pub async fn update_product(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(id): Path<String>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse> {
    request.validate()?;

    let product = state
        .store
        .update_settings(&id, &owner_id, request.target_price, request.check_interval_hours)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource: "product".to_string(),
        })?;
    Ok(Json(json!({ "product": product })))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let deleted = state.store.delete_item(&id, &owner_id).await?;
    if !deleted {
        return Err(AppError::NotFound {
            resource: "product".to_string(),
        });
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Runs the full check pipeline for one item immediately, outside the
/// schedule. Responds with the refreshed item and any events that fired.
pub async fn refresh_product(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let item = state
        .store
        .get_item(&id, &owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource: "product".to_string(),
        })?;

    let evaluation = state.tracker.check_item(&item).await?;

    let product = state
        .store
        .get_item(&id, &owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource: "product".to_string(),
        })?;

    Ok(Json(json!({
        "product": product,
        "events": evaluation.events,
    })))
}

pub async fn product_history(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse> {
    // Ownership check before exposing history rows.
    state
        .store
        .get_item(&id, &owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource: "product".to_string(),
        })?;

    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 1000);
    let history = state.store.list_observations(&id, limit).await?;
    Ok(Json(json!({ "history": history })))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Query(query): Query<NotificationsQuery>,
) -> Result<impl IntoResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_EVENT_LIMIT).clamp(1, 500);
    let notifications = state
        .store
        .list_events(&owner_id, query.unread_only, limit)
        .await?;
    Ok(Json(json!({ "notifications": notifications })))
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let notification = state
        .store
        .mark_event_read(&id, &owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource: "notification".to_string(),
        })?;
    Ok(Json(json!({ "notification": notification })))
}

pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
) -> Result<impl IntoResponse> {
    let updated = state.store.mark_all_events_read(&owner_id).await?;
    Ok(Json(json!({ "updated": updated })))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let deleted = state.store.delete_event(&id, &owner_id).await?;
    if !deleted {
        return Err(AppError::NotFound {
            resource: "notification".to_string(),
        });
    }
    Ok(StatusCode::NO_CONTENT)
}
