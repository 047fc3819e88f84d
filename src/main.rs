use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kontext_backend::{create_app, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kontext_backend=debug,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration - try multiple paths
    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let (config, loaded_path) = Config::load_first(&config_paths);
    match loaded_path {
        Some(path) => info!("Loaded configuration from: {}", path),
        None => warn!("No config file found (tried {:?}), using defaults", config_paths),
    }

    let addr = config.bind_addr();
    let state = AppState::new(config)?;

    std::fs::create_dir_all(state.sessions.scratch_root())?;
    info!("Upload scratch root: {:?}", state.sessions.scratch_root());

    let app = create_app(state);

    info!("Starting server on {}", addr);
    info!("  POST /api/translate");
    info!("  GET  /api/services");
    info!("  GET  /api/test-cors");
    info!("  POST /api/kontext/label");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
