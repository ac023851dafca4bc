//! Shared helpers: in-process gateway + a JSON echo remote.

use axum::Router;
use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use axum::routing::any;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use toolrelay_gateway::http::{AppState, app};
use toolrelay_gateway::store::MemoryStore;
use toolrelay_translate::Dispatcher;

pub struct TestServer {
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn serve(router: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local_addr");
    let (tx, rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        let _ = rx.await;
    });
    tokio::spawn(async move {
        let _ = server.await;
    });
    TestServer {
        base_url: format!("http://{addr}"),
        shutdown: Some(tx),
    }
}

/// Gateway over a fresh in-memory store; the state handle allows seeding
/// records without going through the HTTP surface.
pub async fn spawn_gateway() -> (TestServer, Arc<AppState>) {
    let state = Arc::new(AppState {
        store: Arc::new(MemoryStore::default()),
        dispatcher: Dispatcher::default(),
    });
    let server = serve(app(state.clone())).await;
    (server, state)
}

/// Remote that answers every route with a JSON description of what it
/// received.
pub fn echo_remote() -> Router {
    async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> axum::Json<Value> {
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let received: Value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        axum::Json(json!({
            "method": method.as_str(),
            "contentType": content_type,
            "received": received,
        }))
    }

    Router::new().route("/{*path}", any(echo))
}
