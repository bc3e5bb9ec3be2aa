use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Smart-home device record as stored by the remote directory.
///
/// `last_update` is always stamped by this client from local wall clock on
/// every mutation; it is never derived from a server response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub location: String,
    pub status: DeviceStatus,
    pub last_update: DateTime<Utc>,
}

/// Device category. The directory may hold kinds this client does not know;
/// those records survive deserialization but are skipped by categorized views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Lighting,
    Lock,
    Irrigation,
    #[serde(untagged)]
    Other(String),
}

impl DeviceKind {
    pub fn as_str(&self) -> &str {
        match self {
            DeviceKind::Lighting => "lighting",
            DeviceKind::Lock => "lock",
            DeviceKind::Irrigation => "irrigation",
            DeviceKind::Other(kind) => kind,
        }
    }
}

impl From<&str> for DeviceKind {
    fn from(value: &str) -> Self {
        match value {
            "lighting" => DeviceKind::Lighting,
            "lock" => DeviceKind::Lock,
            "irrigation" => DeviceKind::Irrigation,
            other => DeviceKind::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    On,
    Off,
}

impl DeviceStatus {
    pub fn toggled(self) -> Self {
        match self {
            DeviceStatus::On => DeviceStatus::Off,
            DeviceStatus::Off => DeviceStatus::On,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceStatus::On => "on",
            DeviceStatus::Off => "off",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeviceStatus::On => "On",
            DeviceStatus::Off => "Off",
        }
    }
}

/// POST body for device creation; status always starts out off.
#[derive(Debug, Serialize)]
pub struct NewDevice {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub location: String,
    pub status: DeviceStatus,
    pub last_update: DateTime<Utc>,
}

/// Partial PUT body for a status toggle. The storage side merges it into
/// the stored record, so the other fields are left untouched.
#[derive(Debug, Serialize)]
pub struct StatusPatch {
    pub status: DeviceStatus,
    pub last_update: DateTime<Utc>,
}

/// Partial PUT body for editing the descriptive fields.
#[derive(Debug, Serialize)]
pub struct FieldsPatch {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub location: String,
    pub last_update: DateTime<Utc>,
}

/// Raw values read from the add/edit form before any network call.
#[derive(Debug, Clone, Default)]
pub struct DeviceDraft {
    pub name: String,
    pub kind: String,
    pub location: String,
}

impl DeviceDraft {
    /// Non-empty check on all three fields; whitespace-only counts as empty.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.kind.trim().is_empty()
            && !self.location.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn device(kind: DeviceKind, status: DeviceStatus) -> Device {
        Device {
            id: "1".to_string(),
            name: "Porch light".to_string(),
            kind,
            location: "Porch".to_string(),
            status,
            last_update: Utc::now(),
        }
    }

    #[test]
    fn test_wire_field_names() {
        let json =
            serde_json::to_value(device(DeviceKind::Lighting, DeviceStatus::Off)).unwrap();
        assert_eq!(json["type"], "lighting");
        assert_eq!(json["status"], "off");
        assert!(json["last_update"].is_string());
    }

    #[test]
    fn test_unknown_kind_survives_deserialization() {
        let json = r#"{
            "id": "9",
            "name": "Thermostat",
            "type": "climate",
            "location": "Hall",
            "status": "on",
            "last_update": "2025-03-01T10:00:00Z"
        }"#;

        let device: Device = serde_json::from_str(json).unwrap();
        assert_eq!(device.kind, DeviceKind::Other("climate".to_string()));
        assert_eq!(device.status, DeviceStatus::On);
    }

    #[test]
    fn test_kind_string_round_trip() {
        for kind in ["lighting", "lock", "irrigation"] {
            assert_eq!(DeviceKind::from(kind).as_str(), kind);
        }
        assert_eq!(DeviceKind::from("climate").as_str(), "climate");
    }

    #[test]
    fn test_toggle_is_an_involution() {
        assert_eq!(DeviceStatus::On.toggled(), DeviceStatus::Off);
        assert_eq!(DeviceStatus::Off.toggled().toggled(), DeviceStatus::Off);
    }

    #[test]
    fn test_draft_completeness() {
        let draft = DeviceDraft {
            name: "Lamp".to_string(),
            kind: "lighting".to_string(),
            location: "Desk".to_string(),
        };
        assert!(draft.is_complete());

        let blank_name = DeviceDraft {
            name: "   ".to_string(),
            ..draft.clone()
        };
        assert!(!blank_name.is_complete());

        let missing_location = DeviceDraft {
            location: String::new(),
            ..draft
        };
        assert!(!missing_location.is_complete());
    }
}
