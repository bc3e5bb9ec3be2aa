mod api;
mod errors;
mod model;
mod refresh;
mod surface;
mod view;

use refresh::{start_polling, Dashboard};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let api_url = env::var("DEVICE_API_URL")
        .unwrap_or_else(|_| "http://localhost:8080/api/v1/devices".to_string());
    let poll_ms: u64 = env::var("POLL_INTERVAL_MS")
        .unwrap_or_else(|_| "2000".to_string())
        .parse()
        .unwrap_or(2000);
    let page_path = env::var("DASHBOARD_PAGE").unwrap_or_else(|_| "dashboard.html".to_string());

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting smart-home dashboard");
    info!("Device API: {}", api_url);
    info!("Poll interval: {}ms", poll_ms);
    info!("Rendering to: {}", page_path);

    let api = match api::DeviceApi::new(api_url) {
        Ok(api) => api,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let regions = surface::HtmlFileRegions::new(page_path);
    let dashboard = Arc::new(Mutex::new(Dashboard::new(api, regions)));

    let poll = start_polling(dashboard, Duration::from_millis(poll_ms));

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }

    info!("Received shutdown signal");
    poll.stop();
    info!("Shutting down");
}
