//! Generic attribute persistence
//!
//! The reconciler's durable state lives in a string-keyed attribute
//! store owned by the caller. The trait mirrors that surface; typed
//! access goes through [`BootstrapState`](crate::BootstrapState), which
//! maps itself onto a store at the boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// String-keyed attribute surface with a separate identity slot.
///
/// The identity is the marker of a completed bootstrap: a store with no
/// id has never been bootstrapped.
pub trait AttributeStore: Send {
    fn get(&self, name: &str) -> Option<Value>;
    fn set(&mut self, name: &str, value: Value);
    fn id(&self) -> Option<String>;
    fn set_id(&mut self, id: &str);
    fn clear_id(&mut self);
}

/// In-memory [`AttributeStore`], serializable as a JSON state file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttributeStore for MemoryStore {
    fn get(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: Value) {
        self.attributes.insert(name.to_string(), value);
    }

    fn id(&self) -> Option<String> {
        self.id.clone()
    }

    fn set_id(&mut self, id: &str) {
        self.id = Some(id.to_string());
    }

    fn clear_id(&mut self) {
        self.id = None;
    }
}
