use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use axum::http::{HeaderName, HeaderValue, Method};
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use tts_gateway::config::{EnvOverlay, Settings};
use tts_gateway::core::minimax::{self, MinimaxTts};
use tts_gateway::registry::{ServiceConfig, ServiceRegistry};
use tts_gateway::routes;
use tts_gateway::state::AppState;

/// TTS Gateway - HTTP facade over the MiniMax text-to-speech API
#[derive(Parser, Debug)]
#[command(name = "tts-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE", default_value = "config.yaml")]
    config: PathBuf,

    /// Path to dotenv file (process environment overrides it)
    #[arg(long = "env-file", value_name = "FILE", default_value = ".env")]
    env_file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Build the environment overlay and resolve configuration before anything
    // else; a broken configuration must abort the boot.
    let overlay = EnvOverlay::load(Some(&cli.env_file));
    let settings = Settings::load(&cli.config, &overlay)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    init_tracing(&settings);

    let registry = Arc::new(ServiceRegistry::new());
    register_services(&settings, &registry)?;

    if !registry.initialize_all().await {
        anyhow::bail!("service initialization failed, aborting startup");
    }

    let settings = Arc::new(settings);
    let host = settings.get_str("server.host", "0.0.0.0");
    let port = settings.get_u64("server.port", 8000);
    let cors = cors_layer(&settings);

    let state = Arc::new(AppState::new(Arc::clone(&settings), Arc::clone(&registry)));

    let app = routes::create_router().with_state(state).layer(cors);

    let address: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|err| anyhow!("invalid server address '{host}:{port}': {err}"))?;

    info!(
        app = %settings.get_str("app.name", "TTS Gateway"),
        %address,
        "starting server"
    );

    let listener = TcpListener::bind(&address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Tear down services in reverse registration order once the server has
    // stopped accepting requests.
    registry.shutdown().await;
    info!("shutdown complete");

    Ok(())
}

fn init_tracing(settings: &Settings) {
    // RUST_LOG wins over the configured level.
    let level = settings.get_str("logging.level", "info");
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Register every enabled service from `server_manager.services`.
/// Registration order is caller-controlled; shutdown reverses it.
fn register_services(settings: &Settings, registry: &ServiceRegistry) -> anyhow::Result<()> {
    match ServiceConfig::from_settings(settings, minimax::SERVICE_NAME) {
        Some(config) if config.enabled => {
            let service =
                MinimaxTts::new(&config).map_err(|err| anyhow!("minimax tts setup failed: {err}"))?;
            registry.register(Arc::new(service))?;
        }
        Some(_) => {
            info!(service = minimax::SERVICE_NAME, "service disabled by configuration");
        }
        None => {
            warn!(
                service = minimax::SERVICE_NAME,
                "no service configuration found, nothing registered"
            );
        }
    }
    Ok(())
}

/// Build the CORS layer from the `cors` configuration section. A wildcard
/// origin forces credentials off; tower-http rejects the combination.
fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins = settings.get_str_list("cors.allow_origins");
    let methods = parse_methods(&settings.get_str_list("cors.allow_methods"));
    let headers = settings.get_str_list("cors.allow_headers");
    let credentials = settings.get_bool("cors.allow_credentials", false);

    let wildcard_origin = origins.is_empty() || origins.iter().any(|origin| origin == "*");

    let layer = if wildcard_origin {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    let layer = if headers.is_empty() || headers.iter().any(|header| header == "*") {
        layer.allow_headers(Any)
    } else {
        let headers: Vec<HeaderName> = headers
            .iter()
            .filter_map(|header| header.parse().ok())
            .collect();
        layer.allow_headers(headers)
    };

    let allow_credentials =
        credentials && !wildcard_origin && !headers.iter().any(|header| header == "*");

    layer
        .allow_methods(methods)
        .allow_credentials(allow_credentials)
}

fn parse_methods(names: &[String]) -> Vec<Method> {
    if names.is_empty() || names.iter().any(|name| name == "*") {
        return vec![Method::GET, Method::POST, Method::OPTIONS];
    }
    names
        .iter()
        .filter_map(|name| Method::from_bytes(name.as_bytes()).ok())
        .collect()
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}
