use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use common::retry::{retry_with_policy, RetryPolicy};
use configs::AppConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::subscription::repo::SeaOrmSubscriptionRepository;
use service::subscription::repository::SubscriptionRepository;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Reach the database with the configured bounded retry.
async fn connect_db(cfg: &AppConfig) -> Result<DatabaseConnection, StartupError> {
    let policy = RetryPolicy::fixed(
        cfg.startup.db_connect_attempts,
        Duration::from_secs(cfg.startup.db_connect_retry_delay_secs),
    );
    retry_with_policy(&policy, "connect database", || models::db::connect_with_config(&cfg.database))
        .await
        .map_err(|e| StartupError::DatabaseUnreachable { attempts: policy.max_attempts(), detail: format!("{e:#}") })
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for ctrl-c");
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
                warn!(error = %e, "cannot listen for SIGTERM");
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
    info!("shutdown signal received");
}

/// Serve `app` until `signal` resolves, then give in-flight requests `drain_timeout`
/// to finish before returning anyway.
pub async fn serve_with_shutdown<S>(listener: TcpListener, app: Router, drain_timeout: Duration, signal: S) -> std::io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let stopping = Arc::new(Notify::new());
    let notify = Arc::clone(&stopping);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            notify.notify_one();
        })
        .into_future();

    tokio::select! {
        res = server => res,
        _ = async {
            stopping.notified().await;
            tokio::time::sleep(drain_timeout).await;
        } => {
            warn!(timeout = ?drain_timeout, "graceful shutdown timed out, dropping in-flight requests");
            Ok(())
        }
    }
}

/// Public entry: connect, migrate, build the app and run the HTTP server until shutdown.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    info!(db = %cfg.database.redacted_url(), "starting subscription service");
    let db = connect_db(&cfg).await?;

    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Migrations(e.to_string()))?;
        info!("migrations applied");
    }

    let repo: Arc<dyn SubscriptionRepository> = Arc::new(SeaOrmSubscriptionRepository::new(db.clone()));
    let state = ServerState::new(repo);
    let app = routes::build_router(state, build_cors(), cfg.server.request_timeout());

    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;
    info!(%addr, "listening");

    serve_with_shutdown(listener, app, cfg.server.shutdown_timeout(), shutdown_signal()).await?;

    if let Err(e) = db.close().await {
        warn!(error = %e, "closing database pool failed");
    }
    info!("server stopped");
    Ok(())
}
