//! Chain-of-thought visualizer web portal

use anyhow::{Context, Result};
use cotviz::api::{create_router, ApiState};
use cotviz::pipeline::CotPipeline;
use cotviz::provider::OllamaProvider;
use cotviz::VizConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Chain-of-Thought Portal v{}", env!("CARGO_PKG_VERSION"));

    // Optional config file; defaults cover everything when absent
    let config = match std::env::args().nth(1) {
        Some(config_path) => {
            let config_contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {}", config_path))?;
            let config: VizConfig = toml::from_str(&config_contents)
                .with_context(|| format!("Failed to parse config file: {}", config_path))?;
            info!(config_path = config_path, "Loaded configuration");
            config
        }
        None => VizConfig::default(),
    };

    info!(
        model = config.model,
        ollama_url = config.ollama_url,
        "Using Ollama provider"
    );

    let provider = OllamaProvider::with_timeout(
        &config.ollama_url,
        &config.model,
        Duration::from_secs(config.request_timeout_secs),
    );

    let pipeline = Arc::new(CotPipeline::new(Arc::new(provider)));
    let state = Arc::new(ApiState { pipeline });
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    info!("Open http://localhost:{} in your browser", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
