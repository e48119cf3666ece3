//! HTTP transport for the shelter API.
//!
//! | Route           | Description                                    |
//! |-----------------|------------------------------------------------|
//! | `POST /graphql` | Execute an operation document                  |
//! | `GET /health`   | Liveness probe, always `{"status":"UP"}`       |

pub mod config;
pub mod extract;
mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use shelter_core::{catch_panic_layer, default_cors, default_trace};

pub use config::ServerConfig;
pub use extract::CurrentCaller;
pub use state::AppState;

/// Routes plus the standard tracing, CORS and panic layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/graphql", post(handlers::graphql_handler))
        .route("/health", get(handlers::health_handler))
        .with_state(state)
        .layer(catch_panic_layer())
        .layer(default_cors())
        .layer(default_trace())
}

/// Wait for Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
