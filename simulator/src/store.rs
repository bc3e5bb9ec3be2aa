use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory device collection with mock-API update semantics: PUT bodies
/// are shallow-merged into the stored object, so fields absent from a
/// partial update are preserved. Listing keeps insertion order.
#[derive(Debug, Default)]
pub struct DeviceStore {
    devices: HashMap<String, Value>,
    order: Vec<String>,
}

impl DeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn list(&self) -> Vec<Value> {
        self.order
            .iter()
            .filter_map(|id| self.devices.get(id).cloned())
            .collect()
    }

    /// Stores a new record under a fresh server-assigned id.
    pub fn insert(&mut self, mut fields: Map<String, Value>) -> Value {
        let id = Uuid::new_v4().to_string();
        fields.insert("id".to_string(), Value::String(id.clone()));

        let record = Value::Object(fields);
        self.devices.insert(id.clone(), record.clone());
        self.order.push(id);
        record
    }

    /// Shallow-merges a patch into an existing record. The id field is
    /// immutable and silently skipped.
    pub fn merge(&mut self, id: &str, patch: Map<String, Value>) -> Option<Value> {
        let record = self.devices.get_mut(id)?;

        if let Value::Object(fields) = record {
            for (key, value) in patch {
                if key == "id" {
                    continue;
                }
                fields.insert(key, value);
            }
        }

        Some(record.clone())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let existed = self.devices.remove(id).is_some();
        if existed {
            self.order.retain(|d| d != id);
        }
        existed
    }
}
