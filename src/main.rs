//! Canopy identify proxy
//!
//! Single-process HTTP service that:
//! - accepts multipart image uploads on `POST /api/identify`
//! - enforces per-IP rate limits and upload constraints
//! - proxies validated images to the Pl@ntNet identification API
//! - normalizes results and enriches them with iNaturalist photos

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use api::{router, AppState};
use providers::{InatClient, InatConfig, PlantNetClient, PlantNetConfig};
use telemetry::init_tracing_from_env;

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Pl@ntNet identify endpoint
    #[serde(default = "default_plantnet_url")]
    plantnet_url: String,

    /// iNaturalist observations endpoint
    #[serde(default = "default_inat_url")]
    inat_url: String,

    /// Pl@ntNet API credential; requests fail with 500 while unset
    #[serde(default)]
    plantnet_api_key: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_plantnet_url() -> String {
    providers::plantnet::DEFAULT_IDENTIFY_URL.to_string()
}

fn default_inat_url() -> String {
    providers::observations::DEFAULT_OBSERVATIONS_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            plantnet_url: default_plantnet_url(),
            inat_url: default_inat_url(),
            plantnet_api_key: None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting Canopy identify proxy v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    if config.plantnet_api_key.is_none() {
        // The service still starts; identify requests answer 500 until
        // the operator supplies the credential.
        warn!("PLANTNET_API_KEY is not set; identify requests will fail");
    }

    let identifier = Arc::new(PlantNetClient::new(PlantNetConfig {
        url: config.plantnet_url.clone(),
        api_key: config.plantnet_api_key.clone(),
    }));

    let observations = Arc::new(InatClient::new(InatConfig {
        url: config.inat_url.clone(),
    }));

    // Create application state
    let state = AppState::new(identifier, observations);

    // Start rate limiter cleanup background task
    let _rate_limiter_cleanup = state.start_rate_limiter_cleanup();
    info!("Started rate limiter cleanup task (hourly)");

    // Create router
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("CANOPY")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // The credential keeps its provider-native variable name rather
    // than the CANOPY_ prefix, so existing deployments keep working.
    if let Ok(api_key) = std::env::var("PLANTNET_API_KEY") {
        if !api_key.is_empty() {
            config.plantnet_api_key = Some(api_key);
        }
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
