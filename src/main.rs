mod app;
mod core;
mod features;
mod modules;
mod shared;

use crate::app::{build_router, AppServices};
use crate::core::config::Config;
use crate::core::database;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::auth::JwtValidator;
use crate::features::regions::store::{PgRegionStore, RegionStore};
use crate::features::regions::RegionService;
use crate::features::users::store::PgUserStore;
use crate::features::users::UserService;
use crate::features::weather::{Scheduler, WeatherService, WeatherSyncJob};
use crate::modules::bmkg::BmkgClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;

/// How long in-flight work may run after a shutdown signal
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    // A missing file is fine; anything else is worth a warning
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    // Load configuration; RUN_MODE picks the log level when RUST_LOG is unset
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.app.run_mode.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Configuration loaded: run_mode={:?}, tokio_worker_threads={}, pid={}",
        config.app.run_mode,
        worker_threads,
        std::process::id()
    );

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!(
        "Database connection pool created: {}",
        database::redacted_url(&config.database.url)
    );

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Cache falls back to a no-op store when Redis is unreachable
    let cache = modules::cache::connect(&config.cache.redis_url).await;

    // Initialize services
    let region_store: Arc<dyn RegionStore> = Arc::new(PgRegionStore::new(pool.clone()));
    let region_service = Arc::new(RegionService::new(
        Arc::clone(&region_store),
        Arc::clone(&cache),
    ));
    tracing::info!("Region service initialized");

    let bmkg_client = Arc::new(
        BmkgClient::new(&config.bmkg, Arc::clone(&cache))
            .map_err(|e| anyhow::anyhow!("Failed to initialize BMKG client: {}", e))?,
    );
    let weather_service = Arc::new(WeatherService::new(
        Arc::clone(&region_service),
        Arc::clone(&bmkg_client),
    ));
    tracing::info!("Weather service initialized (BMKG: {})", config.bmkg.base_url);

    let user_service = Arc::new(UserService::new(
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::clone(&region_store),
    ));
    let jwt_validator = Arc::new(JwtValidator::new(&config.auth));
    tracing::info!("User service and auth initialized");

    // Spawn background weather resync
    let shutdown = CancellationToken::new();
    let sync_job = Arc::new(WeatherSyncJob::new(
        Arc::clone(&region_store),
        Arc::clone(&weather_service),
        config.sync.batch_size,
        config.bmkg.request_spacing(),
    ));
    let sync_handle = Scheduler::new(config.sync.interval, shutdown.clone()).spawn(sync_job);
    tracing::info!("Weather sync worker spawned");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };
    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let app = build_router(
        AppServices {
            region_service,
            weather_service,
            user_service,
            jwt_validator,
        },
        config.app.cors_allowed_origins.clone(),
        openapi,
    );

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(shutdown.clone()));
    let mut server_handle = tokio::spawn(async move { server.await });

    let early_exit = wait_for_stop(&mut server_handle, &shutdown).await;

    let result = match early_exit {
        Some(result) => {
            tracing::error!("Server stopped unexpectedly, shutting down");
            if tokio::time::timeout(SHUTDOWN_GRACE, sync_handle).await.is_err() {
                tracing::warn!("Grace period elapsed, abandoning sync worker");
            }
            server_outcome(result)
        }
        None => {
            // Drain in-flight requests and the sync worker within the grace period
            tracing::info!("Shutting down, waiting up to {:?}", SHUTDOWN_GRACE);
            let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
                let _ = sync_handle.await;
                server_handle.await
            })
            .await;

            match drained {
                Ok(result) => server_outcome(result),
                Err(_) => {
                    tracing::warn!("Grace period elapsed, forcing shutdown");
                    Ok(())
                }
            }
        }
    };

    pool.close().await;
    result
}

/// Resolves when a signal fires (`None`) or the server task ends on its own,
/// e.g. on an accept error; the latter also cancels `shutdown`
async fn wait_for_stop<T>(
    server: &mut JoinHandle<T>,
    shutdown: &CancellationToken,
) -> Option<Result<T, JoinError>> {
    tokio::select! {
        result = server => {
            shutdown.cancel();
            Some(result)
        }
        _ = shutdown.cancelled() => None,
    }
}

fn server_outcome(
    result: Result<std::io::Result<()>, JoinError>,
) -> anyhow::Result<()> {
    match result {
        Ok(Ok(())) => {
            tracing::info!("Server stopped");
            Ok(())
        }
        Ok(Err(e)) => Err(anyhow::anyhow!("Server error: {}", e)),
        Err(e) => Err(anyhow::anyhow!("Server task failed: {}", e)),
    }
}

/// Resolves on SIGINT or SIGTERM and cancels `shutdown`
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    shutdown.cancel();
}
