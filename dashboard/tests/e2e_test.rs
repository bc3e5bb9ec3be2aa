//! End-to-end CRUD pass against a running simulator.
//!
//! Start the simulator first (`cargo run -p simulator`), then run with
//! `cargo test -p dashboard -- --ignored`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Device {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    location: String,
    status: String,
    last_update: DateTime<Utc>,
}

fn base_url() -> String {
    std::env::var("DEVICE_API_URL")
        .unwrap_or_else(|_| "http://localhost:8080/api/v1/devices".to_string())
}

#[tokio::test]
#[ignore]
async fn test_full_crud_pass_against_live_simulator() {
    let base = base_url();
    let client = reqwest::Client::new();

    // Create: new devices start out off.
    let created: Device = client
        .post(&base)
        .json(&json!({
            "name": "E2E lamp",
            "type": "lighting",
            "location": "Test bench",
            "status": "off",
            "last_update": Utc::now(),
        }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(created.status, "off");
    assert_eq!(created.kind, "lighting");

    // Toggle on: a partial PUT must merge, preserving the other fields.
    let on: Device = client
        .put(format!("{}/{}", base, created.id))
        .json(&json!({ "status": "on", "last_update": Utc::now() }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(on.status, "on");
    assert_eq!(on.name, "E2E lamp");
    assert_eq!(on.location, "Test bench");

    sleep(Duration::from_millis(20)).await;

    // Toggle back off: status returns, timestamp strictly advances.
    let off: Device = client
        .put(format!("{}/{}", base, created.id))
        .json(&json!({ "status": "off", "last_update": Utc::now() }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(off.status, "off");
    assert!(off.last_update > on.last_update);

    // The updated device must lead the collection when sorted by recency.
    let listed: Vec<Device> = client
        .get(&base)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.iter().any(|d| d.id == created.id));

    // Delete, then list no longer contains the id.
    let response = client
        .delete(format!("{}/{}", base, created.id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let listed: Vec<Device> = client
        .get(&base)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.iter().all(|d| d.id != created.id));
}
