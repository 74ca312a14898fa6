//! The action endpoint - a single path dispatching on HTTP method and `action`.
//!
//! | Method   | Selector                          | Effect                          |
//! |----------|-----------------------------------|---------------------------------|
//! | `GET`    | `?action=get_products` (default)  | every product, newest first     |
//! | `GET`    | `?action=get_suppliers`           | every supplier, by name         |
//! | `POST`   | `{"action": "add_product", ..}`   | insert a pending product        |
//! | `POST`   | `{"action": "add_supplier", ..}`  | insert a supplier               |
//! | `PUT`    | `{"id": .., ..}`                  | overwrite the purchase fields   |
//! | `DELETE` | `?id=..`                          | flag a product as completed     |
//!
//! Anything else answers `405 {"error": "Method not allowed"}`.

pub mod handlers;
pub mod store;

use crate::errors::Error;
use axum::{
    Json, Router,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

/// How long browsers may cache a preflight answer.
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Builds the endpoint router over the given database.
pub fn router(db: DatabaseConnection) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(PREFLIGHT_MAX_AGE);

    Router::new()
        .route(
            "/",
            get(handlers::get_action)
                .post(handlers::post_action)
                .put(handlers::put_purchase)
                .delete(handlers::delete_product)
                .options(handlers::options)
                .fallback(handlers::method_not_allowed),
        )
        .layer(cors)
        .with_state(db)
}

/// Error answered by the endpoint as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// Failure raised by storage or validation
    Domain(Error),
    /// Unknown method or action
    MethodNotAllowed,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self::Domain(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Domain(Error::Decode(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            Self::Domain(err) => match err {
                Error::Validation { .. } | Error::InvalidAmount { .. } | Error::Decode(_) => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                Error::ProductNotFound { .. } | Error::SupplierNotFound { .. } => {
                    (StatusCode::NOT_FOUND, err.to_string())
                }
                Error::Database(ref db_err) => {
                    error!("Database error: {db_err}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Database error occurred".to_string(),
                    )
                }
                other => {
                    error!("Unexpected endpoint error: {other}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal error".to_string(),
                    )
                }
            },
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
