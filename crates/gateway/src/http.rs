//! Router assembly and shared request state.

use crate::store::RecordStore;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;
use toolrelay_translate::Dispatcher;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub dispatcher: Dispatcher,
}

/// Build the full gateway router around a shared state.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(crate::execute::router())
        .merge(crate::records::router())
        .route("/", get(root))
        .route("/health", get(health))
        .layer(Extension(state))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "toolrelay request-translation gateway" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}
