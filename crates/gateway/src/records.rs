//! CRUD plumbing for the stored records: configurations, tools, prompts.
//!
//! Nothing here is on the hot path; the execution endpoint only shares the
//! `config_for_tool` lookup with this module.

use crate::execute::store_failure;
use crate::http::AppState;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use toolrelay_translate::EndpointConfig;

use crate::store::{PromptCreate, ToolCreate};

pub fn router() -> Router {
    Router::new()
        .route("/server/api-config", post(put_api_config))
        .route("/server/api-config/{tool_id}", get(get_api_config))
        .route("/client/tools", post(put_tool).get(list_tools))
        .route("/client/tools/{tool_id}", get(get_tool))
        .route("/client/prompts", post(create_prompt))
        .route("/client/prompts/{tool_id}", get(list_prompts))
}

async fn put_api_config(
    Extension(state): Extension<Arc<AppState>>,
    Json(config): Json<EndpointConfig>,
) -> Response {
    if config.tool_id.trim().is_empty() {
        return bad_request("toolId is required");
    }
    if config.base_url.trim().is_empty() {
        return bad_request("baseUrl is required");
    }

    match state.store.upsert_config(config).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => store_failure(&e),
    }
}

async fn get_api_config(
    Extension(state): Extension<Arc<AppState>>,
    Path(tool_id): Path<String>,
) -> Response {
    match state.store.config_for_tool(&tool_id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => not_found("API configuration not found"),
        Err(e) => store_failure(&e),
    }
}

async fn put_tool(
    Extension(state): Extension<Arc<AppState>>,
    Json(tool): Json<ToolCreate>,
) -> Response {
    if tool.id.trim().is_empty() {
        return bad_request("id is required");
    }
    if tool.name.trim().is_empty() {
        return bad_request("name is required");
    }

    match state.store.upsert_tool(tool).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => store_failure(&e),
    }
}

async fn get_tool(
    Extension(state): Extension<Arc<AppState>>,
    Path(tool_id): Path<String>,
) -> Response {
    match state.store.tool_by_id(&tool_id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => not_found("Tool not found"),
        Err(e) => store_failure(&e),
    }
}

async fn list_tools(Extension(state): Extension<Arc<AppState>>) -> Response {
    match state.store.list_active_tools().await {
        Ok(records) => Json(records).into_response(),
        Err(e) => store_failure(&e),
    }
}

async fn create_prompt(
    Extension(state): Extension<Arc<AppState>>,
    Json(prompt): Json<PromptCreate>,
) -> Response {
    if prompt.tool_id.trim().is_empty() {
        return bad_request("toolId is required");
    }
    if prompt.prompt_type.trim().is_empty() {
        return bad_request("promptType is required");
    }

    match state.store.insert_prompt(prompt).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => store_failure(&e),
    }
}

async fn list_prompts(
    Extension(state): Extension<Arc<AppState>>,
    Path(tool_id): Path<String>,
) -> Response {
    match state.store.prompts_for_tool(&tool_id).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => store_failure(&e),
    }
}

fn bad_request(msg: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
}

fn not_found(msg: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
}
