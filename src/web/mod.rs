//! HTTP surface: a small JSON API over the catalog plus a manual-refresh
//! escape hatch into the tracker pipeline.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::store::CatalogStore;
use crate::tracker::PriceTracker;
use crate::utils::error::{AppError, ScrapeError};

pub mod auth;
pub mod handlers;

pub use auth::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub tracker: Arc<PriceTracker>,
    pub auth: Arc<TokenVerifier>,
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/products", get(handlers::list_products).post(handlers::add_product))
        .route(
            "/products/:id",
            get(handlers::get_product)
                .patch(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/products/:id/refresh", post(handlers::refresh_product))
        .route("/products/:id/history", get(handlers::product_history))
        .route("/notifications", get(handlers::list_notifications))
        .route(
            "/notifications/:id",
            axum::routing::delete(handlers::delete_notification),
        )
        .route(
            "/notifications/:id/read",
            patch(handlers::mark_notification_read),
        )
        .route(
            "/notifications/mark-all-read",
            post(handlers::mark_all_notifications_read),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound { resource } => {
                (StatusCode::NOT_FOUND, format!("{} not found", resource))
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Scrape(ScrapeError::Timeout) => (
                StatusCode::GATEWAY_TIMEOUT,
                "Product page took too long to load".to_string(),
            ),
            AppError::Scrape(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            AppError::Database(err) => {
                error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Config(_) | AppError::Internal(_) => {
                error!(error = %self, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
