use crate::errors::{Error, Result};
use crate::model::{Device, DeviceKind, DeviceStatus, FieldsPatch, NewDevice, StatusPatch};
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the remote device directory.
///
/// Every public operation is fail-soft: a transport failure or non-2xx
/// status is logged and collapsed into the empty/absent sentinel, so
/// rendering code never carries failure branches. Callers that depend on
/// the outcome (e.g. clearing the add form) must check for the sentinel.
pub struct DeviceApi {
    client: reqwest::Client,
    base_url: String,
}

impl DeviceApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the full collection; empty on any failure.
    pub async fn list_devices(&self) -> Vec<Device> {
        match self.try_list().await {
            Ok(devices) => {
                debug!("Fetched {} devices", devices.len());
                devices
            }
            Err(e) => {
                error!("Failed to list devices: {}", e);
                Vec::new()
            }
        }
    }

    /// Creates a device with status off and a fresh timestamp.
    pub async fn create_device(
        &self,
        name: &str,
        kind: DeviceKind,
        location: &str,
    ) -> Option<Device> {
        let body = NewDevice {
            name: name.to_string(),
            kind,
            location: location.to_string(),
            status: DeviceStatus::Off,
            last_update: Utc::now(),
        };

        match self.try_create(&body).await {
            Ok(device) => Some(device),
            Err(e) => {
                error!("Failed to create device {:?}: {}", name, e);
                None
            }
        }
    }

    /// Pushes a new status for one device, stamping `last_update` with now.
    pub async fn set_status(&self, id: &str, status: DeviceStatus) -> Option<Device> {
        let patch = StatusPatch {
            status,
            last_update: Utc::now(),
        };

        match self.try_update(id, &patch).await {
            Ok(device) => Some(device),
            Err(e) => {
                error!("Failed to set status of device {}: {}", id, e);
                None
            }
        }
    }

    /// Pushes edited descriptive fields for one device.
    pub async fn update_fields(
        &self,
        id: &str,
        name: &str,
        kind: DeviceKind,
        location: &str,
    ) -> Option<Device> {
        let patch = FieldsPatch {
            name: name.to_string(),
            kind,
            location: location.to_string(),
            last_update: Utc::now(),
        };

        match self.try_update(id, &patch).await {
            Ok(device) => Some(device),
            Err(e) => {
                error!("Failed to update device {}: {}", id, e);
                None
            }
        }
    }

    /// Removes one device; `false` on failure.
    pub async fn delete_device(&self, id: &str) -> bool {
        match self.try_delete(id).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to delete device {}: {}", id, e);
                false
            }
        }
    }

    async fn try_list(&self) -> Result<Vec<Device>> {
        let response = self.client.get(&self.base_url).send().await?;
        let body = check_status(response)?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn try_create(&self, body: &NewDevice) -> Result<Device> {
        let response = self.client.post(&self.base_url).json(body).send().await?;
        parse_device(response).await
    }

    async fn try_update<T: Serialize>(&self, id: &str, patch: &T) -> Result<Device> {
        let response = self
            .client
            .put(self.item_url(id))
            .json(patch)
            .send()
            .await?;
        parse_device(response).await
    }

    async fn try_delete(&self, id: &str) -> Result<()> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        check_status(response)?;
        Ok(())
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

async fn parse_device(response: reqwest::Response) -> Result<Device> {
    let body = check_status(response)?.text().await?;
    Ok(serde_json::from_str(&body)?)
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status(status));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_url_handles_trailing_slash() {
        let api = DeviceApi::new("http://localhost:8080/api/v1/devices/").unwrap();
        assert_eq!(api.item_url("5"), "http://localhost:8080/api/v1/devices/5");
    }

    #[test]
    fn test_list_is_empty_on_transport_error() {
        tokio_test::block_on(async {
            // Nothing listens on port 9.
            let api = DeviceApi::new("http://127.0.0.1:9/devices").unwrap();
            assert!(api.list_devices().await.is_empty());
        });
    }

    #[test]
    fn test_list_is_empty_on_server_error() {
        tokio_test::block_on(async {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("GET", "/devices")
                .with_status(503)
                .create_async()
                .await;

            let api = DeviceApi::new(format!("{}/devices", server.url())).unwrap();
            assert!(api.list_devices().await.is_empty());
        });
    }

    #[test]
    fn test_delete_is_false_on_missing_device() {
        tokio_test::block_on(async {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("DELETE", "/devices/nope")
                .with_status(404)
                .create_async()
                .await;

            let api = DeviceApi::new(format!("{}/devices", server.url())).unwrap();
            assert!(!api.delete_device("nope").await);
        });
    }
}
