mod store;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use rand::Rng;
use serde_json::{json, Map, Value};
use std::env;
use std::sync::Arc;
use store::DeviceStore;
use tokio::sync::RwLock;
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    store: Arc<RwLock<DeviceStore>>,
}

#[tokio::main]
async fn main() {
    let http_addr = env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let seed_count: usize = env::var("SEED_DEVICES")
        .unwrap_or_else(|_| "6".to_string())
        .parse()
        .unwrap_or(6);

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting device directory simulator");
    info!("HTTP server: {}", http_addr);

    let mut store = DeviceStore::new();
    seed(&mut store, seed_count);
    info!("Seeded {} sample devices", store.len());

    let state = AppState {
        store: Arc::new(RwLock::new(store)),
    };

    let app = Router::new()
        .route("/api/v1/devices", get(list_devices).post(create_device))
        .route(
            "/api/v1/devices/:id",
            put(update_device).delete(delete_device),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", http_addr, e);
            std::process::exit(1);
        });

    info!("HTTP server listening on {}", http_addr);

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        error!("HTTP server error: {}", e);
    });
}

async fn list_devices(State(state): State<AppState>) -> Json<Vec<Value>> {
    Json(state.store.read().await.list())
}

async fn create_device(
    State(state): State<AppState>,
    Json(fields): Json<Map<String, Value>>,
) -> (StatusCode, Json<Value>) {
    let record = state.store.write().await.insert(fields);
    info!("Created device {}", record["id"]);
    (StatusCode::CREATED, Json(record))
}

async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<Map<String, Value>>,
) -> Response {
    match state.store.write().await.merge(&id, patch) {
        Some(record) => Json(record).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_device(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.store.write().await.remove(&id) {
        info!("Deleted device {}", id);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

const KINDS: [(&str, &str); 3] = [
    ("lighting", "Light"),
    ("lock", "Lock"),
    ("irrigation", "Sprinkler"),
];

const LOCATIONS: [&str; 5] = ["Kitchen", "Living room", "Garage", "Garden", "Front door"];

fn seed(store: &mut DeviceStore, count: usize) {
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let (kind, label) = KINDS[i % KINDS.len()];
        let status = if rng.gen_bool(0.5) { "on" } else { "off" };
        let location = LOCATIONS[rng.gen_range(0..LOCATIONS.len())];

        let fields = json!({
            "name": format!("{} {}", label, i + 1),
            "type": kind,
            "location": location,
            "status": status,
            "last_update": Utc::now().to_rfc3339(),
        });

        if let Value::Object(fields) = fields {
            store.insert(fields);
        }
    }
}
