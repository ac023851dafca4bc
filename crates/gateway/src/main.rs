use anyhow::Context as _;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use toolrelay_gateway::http::{self, AppState};
use toolrelay_gateway::store::PgStore;
use toolrelay_translate::Dispatcher;

#[derive(Debug, Parser)]
#[command(name = "toolrelay-gateway", version, about = "Request-translation gateway")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "TOOLRELAY_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Postgres connection string for the record store.
    #[arg(long, env = "TOOLRELAY_DATABASE_URL")]
    database_url: String,

    /// Upper bound on a single outbound call, in seconds.
    #[arg(long, env = "TOOLRELAY_CALL_TIMEOUT_SECS", default_value_t = 30)]
    call_timeout_secs: u64,

    /// Emit logs as JSON.
    #[arg(long, env = "TOOLRELAY_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(&args.database_url)
        .await
        .context("connect to Postgres")?;
    let store = PgStore::new(pool);
    store.migrate().await.context("create record tables")?;

    let state = Arc::new(AppState {
        store: Arc::new(store),
        dispatcher: Dispatcher::new(Duration::from_secs(args.call_timeout_secs)),
    });

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("bind {}", args.bind))?;
    tracing::info!(addr = %args.bind, "toolrelay gateway listening");

    axum::serve(listener, http::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("toolrelay_gateway=info,toolrelay_translate=info,warn")
    });
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
