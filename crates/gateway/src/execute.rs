//! The execution endpoint: resolve the stored configuration, translate the
//! caller payload, dispatch, and relay the outcome.

use crate::http::AppState;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use toolrelay_translate::ExecuteError;
use tracing::{info, warn};

pub fn router() -> Router {
    Router::new().route("/server/execute-api/{tool_id}", post(execute_api))
}

async fn execute_api(
    Extension(state): Extension<Arc<AppState>>,
    Path(tool_id): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    let record = match state.store.config_for_tool(&tool_id).await {
        Ok(Some(record)) => record,
        Ok(None) => return error_response(&ExecuteError::ConfigNotFound(tool_id)),
        Err(e) => return store_failure(&e),
    };

    match state.dispatcher.execute(&record.config, &payload).await {
        Ok(body) => {
            info!(tool = %tool_id, "relayed remote response");
            Json(body).into_response()
        }
        Err(e) => {
            warn!(tool = %tool_id, status = e.http_status(), error = %e, "execution failed");
            error_response(&e)
        }
    }
}

fn error_response(err: &ExecuteError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

pub(crate) fn store_failure(err: &anyhow::Error) -> Response {
    warn!(error = %err, "record store failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}
