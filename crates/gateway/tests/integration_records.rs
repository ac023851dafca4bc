mod common;

use common::spawn_gateway;
use serde_json::{Value, json};

#[tokio::test]
async fn api_config_upsert_and_fetch_roundtrip() {
    let (gateway, _state) = spawn_gateway().await;
    let client = reqwest::Client::new();

    let create = client
        .post(format!("{}/server/api-config", gateway.base_url))
        .json(&json!({
            "toolId": "t1",
            "baseUrl": "https://api.example.com/jsonrpc",
            "method": "POST",
            "headers": {"X-Key": "k"},
            "additionalParams": {"params": {"args": ["db"]}},
        }))
        .send()
        .await
        .expect("create");
    assert_eq!(create.status().as_u16(), 201);
    let created: Value = create.json().await.expect("json");
    assert_eq!(created["toolId"], json!("t1"));
    assert!(created["id"].is_string());
    assert!(created["createdAt"].is_string());

    // Upsert with the same toolId replaces the stored target.
    let replace = client
        .post(format!("{}/server/api-config", gateway.base_url))
        .json(&json!({
            "toolId": "t1",
            "baseUrl": "https://api2.example.com/jsonrpc",
        }))
        .send()
        .await
        .expect("replace");
    assert_eq!(replace.status().as_u16(), 201);

    let fetched: Value = client
        .get(format!("{}/server/api-config/t1", gateway.base_url))
        .send()
        .await
        .expect("get")
        .json()
        .await
        .expect("json");
    assert_eq!(fetched["baseUrl"], json!("https://api2.example.com/jsonrpc"));
    assert_eq!(fetched["method"], json!("POST"));

    let missing = client
        .get(format!("{}/server/api-config/other", gateway.base_url))
        .send()
        .await
        .expect("get missing");
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn api_config_requires_tool_id_and_base_url() {
    let (gateway, _state) = spawn_gateway().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/server/api-config", gateway.base_url))
        .json(&json!({"toolId": " ", "baseUrl": "https://api.example.com"}))
        .send()
        .await
        .expect("send");
    assert_eq!(resp.status().as_u16(), 400);

    let resp = client
        .post(format!("{}/server/api-config", gateway.base_url))
        .json(&json!({"toolId": "t1", "baseUrl": ""}))
        .send()
        .await
        .expect("send");
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn tools_crud_and_active_listing() {
    let (gateway, _state) = spawn_gateway().await;
    let client = reqwest::Client::new();

    for (id, active) in [("crm", true), ("legacy", false)] {
        let resp = client
            .post(format!("{}/client/tools", gateway.base_url))
            .json(&json!({
                "id": id,
                "name": format!("{id} tool"),
                "toolSet": [{"function": {"name": id}}],
                "active": active,
            }))
            .send()
            .await
            .expect("create tool");
        assert_eq!(resp.status().as_u16(), 201);
    }

    let tool: Value = client
        .get(format!("{}/client/tools/crm", gateway.base_url))
        .send()
        .await
        .expect("get")
        .json()
        .await
        .expect("json");
    assert_eq!(tool["name"], json!("crm tool"));

    let missing = client
        .get(format!("{}/client/tools/none", gateway.base_url))
        .send()
        .await
        .expect("get missing");
    assert_eq!(missing.status().as_u16(), 404);

    let listed: Vec<Value> = client
        .get(format!("{}/client/tools", gateway.base_url))
        .send()
        .await
        .expect("list")
        .json()
        .await
        .expect("json");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], json!("crm"));
}

#[tokio::test]
async fn prompts_create_and_list_by_tool() {
    let (gateway, _state) = spawn_gateway().await;
    let client = reqwest::Client::new();

    for prompt_type in ["search", "summarize"] {
        let resp = client
            .post(format!("{}/client/prompts", gateway.base_url))
            .json(&json!({
                "toolId": "crm",
                "promptType": prompt_type,
                "parameters": {"limit": 10},
            }))
            .send()
            .await
            .expect("create prompt");
        assert_eq!(resp.status().as_u16(), 201);
    }

    let listed: Vec<Value> = client
        .get(format!("{}/client/prompts/crm", gateway.base_url))
        .send()
        .await
        .expect("list")
        .json()
        .await
        .expect("json");
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|p| p["toolId"] == json!("crm")));

    let empty: Vec<Value> = client
        .get(format!("{}/client/prompts/other", gateway.base_url))
        .send()
        .await
        .expect("list empty")
        .json()
        .await
        .expect("json");
    assert!(empty.is_empty());
}

#[tokio::test]
async fn health_and_root_respond() {
    let (gateway, _state) = spawn_gateway().await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{}/health", gateway.base_url))
        .send()
        .await
        .expect("health")
        .json()
        .await
        .expect("json");
    assert_eq!(health["status"], json!("ok"));

    let root: Value = client
        .get(format!("{}/", gateway.base_url))
        .send()
        .await
        .expect("root")
        .json()
        .await
        .expect("json");
    assert!(root["message"].is_string());
}
