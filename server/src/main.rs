use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use todo_core::{JsonFileStorage, TodoStorage, TodoStore};
use todo_server::{telemetry, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    telemetry::init_tracing(config.log_json);

    let storage = Arc::new(JsonFileStorage::new(&config.data_file));
    storage
        .init()
        .await
        .with_context(|| format!("failed to prepare {}", config.data_file.display()))?;
    let store = Arc::new(TodoStore::new(storage));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, data_file = %config.data_file.display(), "todo API server listening");
    for (route, what) in [
        ("GET    /todos", "list todos"),
        ("POST   /todos", "create a todo"),
        ("PUT    /todos/{id}", "update a todo"),
        ("DELETE /todos/{id}", "delete a todo"),
        ("GET    /health", "health check"),
    ] {
        tracing::info!("  {route:<20} {what}");
    }

    todo_server::run(listener, store).await?;
    Ok(())
}
