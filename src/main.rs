// src/main.rs
use std::{net::SocketAddr, process::ExitCode, sync::Arc};

use dotenvy::dotenv;
use product_catalog::{
    config::Config,
    database,
    repository::PgProductRepository,
    routes,
    startup::{self, StartupError},
    state::AppState,
};
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ports tried after the configured one when it is already taken.
const PORT_PROBE_SPAN: u16 = 20;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenv().ok();

    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing("info");
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    init_tracing(&cfg.log_level);

    match run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

async fn run(cfg: Config) -> Result<(), StartupError> {
    // Nothing is served until the database is reachable and migrated
    tracing::info!("Attempting to connect to the database...");
    let db_pool = startup::run_gate(cfg.startup.retry_policy(), |_| {
        database::connect_and_migrate(&cfg.database)
    })
    .await?;

    // Create application state
    let app_state = AppState::new(Arc::new(PgProductRepository::new(db_pool)));
    let app = routes::create_router(app_state, &cfg.server.static_dir);

    let listener = bind_listener(&cfg).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server has shut down gracefully.");
    Ok(())
}

// Try port..port+20 to avoid crash when address is in use
async fn bind_listener(cfg: &Config) -> Result<TcpListener, StartupError> {
    let host = cfg.server.host;
    let base_port = cfg.server.port;

    for offset in 0u16..=PORT_PROBE_SPAN {
        let Some(port) = base_port.checked_add(offset) else { break };
        let addr = SocketAddr::from((host, port));
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                tracing::info!("Server running on {}", addr);
                return Ok(listener);
            }
            Err(e) => {
                if offset == 0 { tracing::warn!(%addr, error=%e, "Port in use, trying next"); }
            }
        }
    }

    Err(StartupError::Bind { host, port: base_port })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
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
