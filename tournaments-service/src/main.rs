use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;

use shared::config::{DatabaseConfig, ServiceConfig};
use shared::proto::games_service_server::GamesServiceServer;
use shared::proto::results_service_server::ResultsServiceServer;
use tournaments_service::{
    GameServerImpl, GameService, PgGameRepository, PgResultRepository, ResultServerImpl,
    ResultService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    shared::init_tracing("tournaments-service")
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {}", e))?;

    tracing::info!("Tournaments Service starting...");

    let db_config = DatabaseConfig::from_env()?;
    let service_config = ServiceConfig::from_env()?;

    if let Some(metrics_port) = service_config.metrics_port {
        shared::init_metrics(metrics_port)
            .map_err(|e| anyhow::anyhow!("failed to start metrics exporter: {}", e))?;
    }

    tracing::info!(
        database = %db_config.redacted(),
        ssl_mode = ?db_config.ssl_mode,
        grpc_port = service_config.grpc_port,
        request_timeout_secs = service_config.request_timeout.as_secs(),
        auth = ?service_config.auth,
        storage = ?service_config.storage,
        "Configuration loaded"
    );

    if service_config.auth.is_some() {
        tracing::warn!("GRPC_AUTH is set but authentication is not enforced");
    }

    tracing::info!("Connecting to PostgreSQL...");
    let db_pool = PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(db_config.connect_options())
        .await
        .with_context(|| format!("failed to connect to {}", db_config.redacted()))?;

    sqlx::query("SELECT 1")
        .execute(&db_pool)
        .await
        .context("database health check failed")?;

    tracing::info!("Connected to PostgreSQL successfully");

    if service_config.run_migrations {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .context("failed to run migrations")?;
        tracing::info!("Migrations completed");
    } else {
        tracing::info!("Skipping migrations (RUN_MIGRATIONS=false)");
    }

    let timeout = service_config.request_timeout;
    let games = GameServerImpl::new(GameService::new(
        PgGameRepository::new(db_pool.clone()),
        timeout,
    ));
    let results = ResultServerImpl::new(ResultService::new(
        PgResultRepository::new(db_pool.clone()),
        timeout,
    ));

    let addr: SocketAddr = ([0, 0, 0, 0], service_config.grpc_port).into();

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    serve(addr, games, results, shutdown).await?;

    db_pool.close().await;
    tracing::info!("Tournaments Service stopped");

    Ok(())
}

async fn serve(
    addr: SocketAddr,
    games: GameServerImpl<PgGameRepository>,
    results: ResultServerImpl<PgResultRepository>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(shared::proto::FILE_DESCRIPTOR_SET)
        .build_v1()
        .context("failed to build reflection service")?;

    tracing::info!(addr = %addr, "Starting gRPC server");

    Server::builder()
        .add_service(GamesServiceServer::new(games))
        .add_service(ResultsServiceServer::new(results))
        .add_service(reflection)
        .serve_with_shutdown(addr, async move {
            shutdown.cancelled().await;
            tracing::info!("Shutdown signal received, draining in-flight requests");
        })
        .await
        .context("gRPC server error")?;

    Ok(())
}

/// Cancels `token` on Ctrl+C or SIGTERM.
async fn cancel_on_signal(token: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler, waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    token.cancel();
}
