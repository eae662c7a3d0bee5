//! Bookshelf server binary

use clap::Parser;
use tokio::signal;

use bookshelf::{
    app::{build_repository, create_router, init_tracing},
    config::{AppConfig, StorageBackend},
    AppState,
};

#[derive(Parser)]
#[command(name = "bookshelf", about = "Book record CRUD server", version)]
struct Cli {
    /// Address to listen on
    #[arg(long)]
    hostname: Option<String>,

    /// Port to listen on
    #[arg(long, short)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Keep books in memory instead of PostgreSQL
    #[arg(long)]
    in_memory: bool,
}

impl Cli {
    fn apply(self, config: &mut AppConfig) {
        if let Some(hostname) = self.hostname {
            config.server.host = hostname;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if self.in_memory {
            config.storage.backend = StorageBackend::Memory;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    cli.apply(&mut config);

    init_tracing(&config.logging);

    tracing::info!("Starting Bookshelf v{}", env!("CARGO_PKG_VERSION"));

    let books = build_repository(&config).await?;

    let host = config.server.host.clone();
    let port = config.server.port;

    let app = create_router(AppState::new(config, books));

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
