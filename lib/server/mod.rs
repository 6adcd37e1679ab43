pub mod monitoring;

use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use diesel_async::pooled_connection::deadpool::BuildError;
use prometheus_client::encoding::text::encode;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};

use monitoring::SHELF_OPERATION_METRICS;

use crate::api::{grpc::library_server, rest};
use crate::config::ConfigError;
use crate::state::AppState;

/// Failures that stop the process.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("failed to build database pool")]
    Pool(#[from] BuildError),

    #[error("failed to run database migrations")]
    Migrations(#[source] Box<dyn StdError + Send + Sync>),

    #[error("failed to bind listener")]
    Bind(#[from] std::io::Error),

    #[error("gRPC transport failed")]
    Transport(#[from] tonic::transport::Error),

    #[error("server task panicked or was cancelled")]
    Task(#[from] JoinError),
}

async fn health_handler() -> String {
    "Healthy".to_string()
}

async fn expose_metrics(state: State<Arc<AppState>>) -> Result<String, StatusCode> {
    let mut buffer = String::new();
    let registry = state.registry.read().await;
    encode(&mut buffer, &registry).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(buffer)
}

/// Registers process metrics once per registry.
pub async fn register_metrics(state: &AppState) {
    let mut registry = state.registry.write().await;

    SHELF_OPERATION_METRICS
        .get_or_init(|| async {
            monitoring::ShelfOperationMetrics::register(&mut registry, "shelf_operations")
        })
        .await;

    monitoring::register_build_info_metric(&mut registry, "library");
}

/// Health, metrics and the REST gateway on one router.
pub fn http_router(state: Arc<AppState>) -> Router {
    let gateway = rest::router(state.library.clone());
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(expose_metrics))
        .with_state(state)
        .merge(gateway)
}

/// Binds `addr` and serves [`http_router`] until shutdown is requested.
pub async fn setup_http_server(
    state: Arc<AppState>,
    addr: SocketAddr,
) -> Result<JoinHandle<()>, std::io::Error> {
    let shutdown_token = state.shutdown_token.clone();
    let app = http_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP gateway listening on {}", listener.local_addr()?);

    let server_handle = tokio::spawn(async move {
        let served = axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
            })
            .await;
        if let Err(err) = served {
            tracing::error!(error = %err, "HTTP gateway stopped");
        }
    });

    Ok(server_handle)
}

/// Serves `library.v1.LibraryService` on `addr` until shutdown is requested.
pub fn setup_grpc_server(
    state: Arc<AppState>,
    addr: SocketAddr,
) -> JoinHandle<Result<(), tonic::transport::Error>> {
    let shutdown_token = state.shutdown_token.clone();
    let service = library_server(state.library.clone());

    tokio::spawn(async move {
        tracing::info!("gRPC service listening on {addr}");
        tonic::transport::Server::builder()
            .add_service(service)
            .serve_with_shutdown(addr, async move {
                shutdown_token.cancelled().await;
            })
            .await
    })
}
