use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::store::{TableName, TableStore, TableStoreError, DEFAULT_PEEK_LIMIT};

/// Router builder exposing read-only table inspection.
pub fn dataset_router<S>(store: Arc<S>) -> Router
where
    S: TableStore + 'static,
{
    Router::new()
        .route("/tables", get(tables_handler::<S>))
        .route("/peek", get(peek_handler::<S>))
        .route("/health/db", get(db_health_handler::<S>))
        .with_state(store)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PeekQuery {
    table: String,
    limit: Option<usize>,
}

pub(crate) async fn tables_handler<S>(State(store): State<Arc<S>>) -> Response
where
    S: TableStore + 'static,
{
    match store.list_tables() {
        Ok(tables) => {
            let names: Vec<&str> = tables.iter().map(TableName::as_str).collect();
            (StatusCode::OK, axum::Json(json!({ "tables": names }))).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn peek_handler<S>(
    State(store): State<Arc<S>>,
    Query(query): Query<PeekQuery>,
) -> Response
where
    S: TableStore + 'static,
{
    let table = match TableName::parse(&query.table) {
        Ok(table) => table,
        Err(err) => return error_response(err),
    };
    let limit = query.limit.unwrap_or(DEFAULT_PEEK_LIMIT);

    match store.peek(&table, limit) {
        Ok(rows) => (StatusCode::OK, axum::Json(json!({ "rows": rows }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn db_health_handler<S>(State(store): State<Arc<S>>) -> Response
where
    S: TableStore + 'static,
{
    match store.ping() {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "db": "ok" }))).into_response(),
        Err(err) => {
            let payload = json!({
                "error": format!("DB error: {err}"),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn error_response(err: TableStoreError) -> Response {
    let status = match &err {
        TableStoreError::InvalidName(_) | TableStoreError::LimitTooLarge { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        TableStoreError::NotFound(_) => StatusCode::NOT_FOUND,
        TableStoreError::Unavailable(_) | TableStoreError::Io(_) | TableStoreError::Csv(_) => {
            warn!(error = %err, "table store request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
