use std::{future::Future, future::IntoFuture, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use configs::AppConfig;
use service::person::{seed::seed_people, InMemoryPersonRepository, PersonService};
use tokio::{net::TcpListener, sync::oneshot};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = cfg.bind_addr();
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

/// Wire the repository, facade and router for the given config.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let repo = Arc::new(InMemoryPersonRepository::new());
    if cfg.seed.enabled {
        let count = seed_people(repo.as_ref()).await?;
        info!(count, "seeded sample people");
    }
    let state = AppState::new(Arc::new(PersonService::new(repo)));
    Ok(routes::build_router(
        state,
        build_cors(),
        Duration::from_secs(cfg.server.request_timeout_secs),
    ))
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
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
}

/// Serve until `signal` resolves, then give in-flight requests up to
/// `grace` to finish before returning.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stopping_tx, mut stopping_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            info!("shutting down server");
            let _ = stopping_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        res = &mut server => res?,
        _ = &mut stopping_rx => {
            match tokio::time::timeout(grace, &mut server).await {
                Ok(res) => res?,
                Err(_) => warn!(grace_secs = grace.as_secs(), "graceful shutdown timed out; dropping open connections"),
            }
        }
    }
    info!("server stopped");
    Ok(())
}

/// Public entry: build the app and run the HTTP server until a shutdown signal.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;
    let addr = load_bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "starting persons api");
    serve_with_shutdown(
        listener,
        app,
        shutdown_signal(),
        Duration::from_secs(cfg.server.shutdown_timeout_secs),
    )
    .await
}
