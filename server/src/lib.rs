//! HTTP front end for the todo store.
//!
//! # Overview
//! Maps the REST surface onto `todo_core::TodoStore`:
//!
//! | Method & path         | Handler       |
//! |-----------------------|---------------|
//! | `GET /todos`          | list          |
//! | `POST /todos`         | create        |
//! | `PUT /todos/{id}`     | update        |
//! | `DELETE /todos/{id}`  | delete        |
//! | `GET /health`         | health check  |
//!
//! Anything else, including an unsupported method on a known path, answers
//! 404 `Route not found`.

pub mod config;
pub mod response;
pub mod routes;
pub mod telemetry;

use std::future::Future;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use todo_core::TodoStore;

pub use config::{ConfigError, ServerConfig};
pub use response::{ApiError, ApiResponse};

pub fn app(store: Arc<TodoStore>) -> Router {
    Router::new()
        .route("/todos", get(routes::list_todos).post(routes::create_todo))
        .route(
            "/todos/{id}",
            axum::routing::put(routes::update_todo).delete(routes::delete_todo),
        )
        .route("/health", get(routes::health))
        .fallback(routes::route_not_found)
        .method_not_allowed_fallback(routes::route_not_found)
        .layer(axum::middleware::from_fn(telemetry::trace_requests))
        .with_state(store)
}

/// Serve until SIGINT or SIGTERM.
pub async fn run(listener: TcpListener, store: Arc<TodoStore>) -> Result<(), std::io::Error> {
    serve(listener, store, shutdown_signal()).await
}

/// Serve until `shutdown` completes, then drain in-flight requests.
pub async fn serve<F>(
    listener: TcpListener,
    store: Arc<TodoStore>,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("shutdown signal received");
}
