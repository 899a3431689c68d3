//! HTTP route handlers
//!
//! Prices cross the wire as decimal major units (`3.46`) and are stored as
//! integer minor units (`346`).

use axum::{
    extract::{rejection::JsonRejection, Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::error::Error;
use crate::metrics;
use crate::server::AppState;
use crate::storage::ItemRecord;

// ===== Request/Response Types =====

/// Item as seen by HTTP clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    pub code: String,
    pub name: String,
    pub price: f64,
}

impl ItemPayload {
    fn into_record(self) -> ItemRecord {
        ItemRecord::new(self.code, self.name, to_minor_units(self.price))
    }
}

impl From<ItemRecord> for ItemPayload {
    fn from(record: ItemRecord) -> Self {
        Self {
            code: record.code,
            name: record.name,
            price: to_major_units(record.price),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub items: Vec<ItemPayload>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddResponse {
    pub item_codes: Vec<String>,
    pub item_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub search: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub items: Vec<ItemPayload>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FetchResponse {
    pub item: ItemPayload,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub item_codes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub item_count: usize,
}

/// Error body returned with every non-2xx response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub error: String,
    pub message: String,
}

/// Decimal major units to integer minor units, rounded to the nearest cent
pub fn to_minor_units(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

/// Integer minor units to decimal major units
pub fn to_major_units(price: i64) -> f64 {
    price as f64 / 100.0
}

// ===== Error Mapping =====

/// HTTP-facing error
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        let status = match &e {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            e if e.is_invalid_input() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.status.as_u16(),
            error: self
                .status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ===== Catalog Handlers =====

/// Add a batch of items
///
/// POST /store/add
#[instrument(skip(state, payload))]
pub async fn add_items(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<AddRequest>, JsonRejection>,
) -> ApiResult<AddResponse> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Rejected malformed add request");
        ApiError::from(e)
    })?;

    let records: Vec<ItemRecord> = request
        .items
        .into_iter()
        .map(ItemPayload::into_record)
        .collect();

    let start = Instant::now();
    let result = state.store.add(&records);
    metrics::record_operation("add", result.is_ok(), start.elapsed());

    match result {
        Ok(added) => {
            info!(count = added.count, "Items added");
            metrics::set_live_items(state.store.stats().live_records);
            Ok(Json(AddResponse {
                item_codes: added.codes,
                item_count: added.count,
            }))
        }
        Err(e) => {
            warn!(error = %e, items = records.len(), "Add rejected");
            Err(e.into())
        }
    }
}

/// Search items by name prefix
///
/// POST /store/search
#[instrument(skip(state, payload))]
pub async fn search_items(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<SearchResponse> {
    let Json(request) = payload?;

    let start = Instant::now();
    let result = state.store.search(&request.search);
    metrics::record_operation("search", true, start.elapsed());

    info!(query = %request.search, found = result.items.len(), "Search completed");
    Ok(Json(SearchResponse {
        items: result.items.into_iter().map(ItemPayload::from).collect(),
    }))
}

/// Fetch one item by code
///
/// GET /store/:code
#[instrument(skip(state))]
pub async fn fetch_item(
    Extension(state): Extension<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<FetchResponse> {
    let start = Instant::now();
    let result = state.store.fetch(&code);
    metrics::record_operation("fetch", result.is_ok(), start.elapsed());

    let record = result.map_err(|e| {
        info!(error = %e, "Fetch missed");
        ApiError::from(e)
    })?;

    Ok(Json(FetchResponse {
        item: record.into(),
    }))
}

/// Delete items by code
///
/// POST /store/delete
#[instrument(skip(state, payload))]
pub async fn delete_items(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> ApiResult<DeleteResponse> {
    let Json(request) = payload?;

    let start = Instant::now();
    let result = state.store.delete(&request.item_codes);
    metrics::record_operation("delete", true, start.elapsed());
    metrics::set_live_items(state.store.stats().live_records);

    info!(
        requested = request.item_codes.len(),
        deleted = result.count,
        "Delete completed"
    );
    Ok(Json(DeleteResponse {
        item_count: result.count,
    }))
}

/// Table and index statistics
///
/// GET /store/stats
pub async fn catalog_stats(Extension(state): Extension<Arc<AppState>>) -> Response {
    Json(state.store.stats()).into_response()
}

// ===== Health =====

/// Liveness ping
pub async fn ping() -> &'static str {
    "pong"
}

/// Health check
pub async fn health_check(Extension(state): Extension<Arc<AppState>>) -> Response {
    let stats = state.store.stats();
    Json(serde_json::json!({
        "status": "healthy",
        "version": crate::VERSION,
        "live_items": stats.live_records,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
    .into_response()
}

/// Metrics endpoint (Prometheus format)
pub async fn metrics_endpoint() -> String {
    metrics::export_metrics()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CodeError, NameError};

    #[test]
    fn test_price_conversion_rounds() {
        assert_eq!(to_minor_units(3.46), 346);
        assert_eq!(to_minor_units(0.79), 79);
        assert_eq!(to_minor_units(1000.99), 100099);
        assert_eq!(to_minor_units(5.0), 500);
        assert_eq!(to_major_units(346), 3.46);
        assert_eq!(to_major_units(79), 0.79);
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (Error::from(CodeError::WrongLength), StatusCode::BAD_REQUEST),
            (
                Error::from(NameError::PartNotAlphanumeric),
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::DuplicateCodeInBatch {
                    code: "X".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::DuplicateAgainstStore {
                    code: "X".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::NotFound {
                    code: "X".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                Error::Config("bad".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_payload_record_conversion() {
        let payload = ItemPayload {
            code: "A12T-4GH7-QPL9-3N4M".to_string(),
            name: "Lettuce".to_string(),
            price: 3.46,
        };
        let record = payload.clone().into_record();
        assert_eq!(record.price, 346);
        assert_eq!(ItemPayload::from(record), payload);
    }
}
