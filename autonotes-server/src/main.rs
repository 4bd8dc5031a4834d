//! Autonotes Service: context-triggered notes for a node-based workflow editor.
//!
//! Default: http://127.0.0.1:9110/autonotes/

use autonotes_server::config::ServerConfig;
use autonotes_server::routes::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();
    log::info!("Storing notes under {}", config.data_dir.display());

    let state = Arc::new(AppState::new(config.data_dir.clone()));
    let app = autonotes_server::router(state);

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    log::info!("Autonotes Service listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
