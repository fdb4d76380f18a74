//! HTTP server entry point.
//!
//! # Responsibility
//! - Load configuration and initialize logging.
//! - Open the store, serve the router and close the store on shutdown.

use std::process::ExitCode;
use std::sync::Arc;

use heroes_api::{create_router_with_body_limit, AppContext, ServerConfig};
use heroes_core::init_logging;
use log::{error, info, warn};
use tokio::signal;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("heroes_server: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("heroes_server: logging init failed: {err}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=server_exit module=api status=error error={message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), String> {
    let ctx = Arc::new(AppContext::open(&config.database_uri).map_err(|err| err.to_string())?);
    let router = create_router_with_body_limit(Arc::clone(&ctx), config.body_limit);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("bind {addr} failed: {err}"))?;
    info!("event=server_start module=api status=ok addr={addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| err.to_string())?;
    info!("event=server_stop module=api status=ok");

    // The router and its clones of the context are dropped once serve returns.
    match Arc::try_unwrap(ctx) {
        Ok(ctx) => ctx.close().map_err(|err| err.to_string()),
        Err(_) => {
            warn!("event=db_close module=api status=skipped reason=context_still_shared");
            Ok(())
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("event=signal_install module=api status=error error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("event=signal_install module=api status=error error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("event=shutdown module=api status=start signal=ctrl_c"),
        _ = terminate => info!("event=shutdown module=api status=start signal=terminate"),
    }
}
