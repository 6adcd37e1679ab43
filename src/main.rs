use std::process::ExitCode;
use std::sync::Arc;

use dotenv::dotenv;
use library_lib::{
    cli::{parse_args, Cli, Storage},
    config::Config,
    db::{build_db_pool, run_migrations},
    domain::Library,
    gateway::{InMemoryGateway, PgGateway, SharedGateway},
    logging::{format_error_report, init_logging},
    server::{register_metrics, setup_grpc_server, setup_http_server, ServeError},
    state::AppState,
};
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Cancels `shutdown_token` on the first SIGTERM or SIGINT.
async fn handle_shutdown_signals(shutdown_token: CancellationToken) -> Result<(), std::io::Error> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => {
            info!("SIGTERM received, shutting down.");
        }
        _ = sigint.recv() => {
            info!("SIGINT received, shutting down.");
        }
        _ = shutdown_token.cancelled() => return Ok(()),
    }

    shutdown_token.cancel();
    Ok(())
}

async fn build_gateway(args: &Cli, config: &Config) -> Result<SharedGateway, ServeError> {
    match args.storage {
        Storage::Memory => {
            info!("Using in-memory storage");
            Ok(Arc::new(InMemoryGateway::new()))
        }
        Storage::Postgres => {
            let db_url = config.require_db_url()?.to_string();

            if args.skip_migrations {
                info!("Skipping migrations");
            } else {
                let migration_url = db_url.clone();
                let applied = tokio::task::spawn_blocking(move || run_migrations(&migration_url))
                    .await?
                    .map_err(ServeError::Migrations)?;
                info!("Applied {applied} pending migrations");
            }

            let pool = build_db_pool(&db_url).await?;
            Ok(Arc::new(PgGateway::new(pool)))
        }
    }
}

async fn run(args: Cli) -> Result<(), ServeError> {
    let config = Config::from_env()?;
    let gateway = build_gateway(&args, &config).await?;

    let shutdown_token = CancellationToken::new();
    let library = Library::new(gateway, config.tracker, shutdown_token.clone());
    let state = Arc::new(AppState::new(library, shutdown_token.clone()));
    register_metrics(&state).await;

    let signals_handle = tokio::spawn(handle_shutdown_signals(shutdown_token.clone()));
    let http_handle = match setup_http_server(state.clone(), config.http_addr).await {
        Ok(handle) => handle,
        Err(err) => {
            shutdown_token.cancel();
            return Err(err.into());
        }
    };
    let grpc_handle = setup_grpc_server(state, config.grpc_addr);

    // The gRPC server only returns early on a transport failure.
    let grpc_result = grpc_handle.await;
    shutdown_token.cancel();

    http_handle.await?;
    signals_handle.await??;
    grpc_result??;

    info!("Library service stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let args = parse_args();
    let storage = match args.storage {
        Storage::Postgres => "postgres",
        Storage::Memory => "memory",
    };
    init_logging("library", storage, "info");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(
                event = "service_failed",
                report = %format_error_report(&err),
                "library service failed"
            );
            ExitCode::FAILURE
        }
    }
}
