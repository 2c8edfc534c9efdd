//! recordify-server - Tag player backend
//!
//! Associates NFC tag UIDs with Spotify tracks/playlists and starts playback
//! when a tag is scanned.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use recordify_common::config::{
    default_config_path, load_toml_config_or_default, RootFolderInitializer, RootFolderResolver,
};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recordify_server::config::{resolve_spotify_credentials, ACCESS_TOKEN_ENV};
use recordify_server::playback::{PlaybackProvider, SpotifyClient, UnconfiguredPlayback};
use recordify_server::api::BuildInfo;
use recordify_server::{build_router, AppState};

/// Command-line arguments for recordify-server
#[derive(Parser, Debug)]
#[command(name = "recordify-server")]
#[command(about = "Tag-to-Spotify playback backend")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "RECORDIFY_PORT")]
    port: u16,

    /// Address to bind
    #[arg(short, long, default_value = "127.0.0.1", env = "RECORDIFY_BIND")]
    bind: IpAddr,

    /// Folder holding recordify.db
    #[arg(short, long, env = "RECORDIFY_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// TOML config file (default: ~/.config/recordify/config.toml)
    #[arg(short, long, env = "RECORDIFY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let toml_config = load_toml_config_or_default(config_path.as_deref());

    // RUST_LOG wins over the configured level
    let default_filter = format!(
        "recordify_server={level},recordify_common={level},tower_http=info",
        level = toml_config.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let build = BuildInfo::current();
    info!(
        "Starting {} v{} [{}] built {} ({})",
        build.module, build.version, build.git_hash, build.build_timestamp, build.build_profile
    );

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(args.root_folder.clone())
        .with_toml(&toml_config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());
    let db_pool = recordify_common::db::init_database(&db_path)
        .await
        .context("Failed to open database")?;

    let credentials = resolve_spotify_credentials(&toml_config.spotify);
    let playback: Arc<dyn PlaybackProvider> = match &credentials.access_token {
        Some(token) => {
            info!("Spotify playback enabled");
            Arc::new(SpotifyClient::new(token.clone())?)
        }
        None => {
            if credentials.needs_authorization() {
                let missing = credentials.missing_registration_values();
                if missing.is_empty() {
                    warn!(
                        "Spotify app registration found (redirect {}) but no access token; authorize the app and set {}",
                        credentials.redirect_uri.as_deref().unwrap_or_default(),
                        ACCESS_TOKEN_ENV
                    );
                } else {
                    warn!(
                        "Spotify app registration incomplete, missing: {}",
                        missing.join(", ")
                    );
                }
            }
            warn!("Spotify playback disabled: {} not set", ACCESS_TOKEN_ENV);
            Arc::new(UnconfiguredPlayback::new(format!("{} not set", ACCESS_TOKEN_ENV)))
        }
    };

    let state = AppState::new(db_pool.clone(), playback);
    let app = build_router(state);

    let addr = SocketAddr::new(args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db_pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
