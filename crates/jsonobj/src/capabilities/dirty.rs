//! Dirty tracking.
//!
//! The initializer captures a fully serialized snapshot of the attributes.
//! [`JsonObject::dirty`] then reports every top-level key whose serialized
//! value no longer equals the snapshot's. A change deep inside a nested map or
//! object marks its owning top-level key; the diff never reports sub-fields.
//!
//! `set` does not re-run the caster, so writing a raw value that the caster
//! would have converted (e.g. `"123"` over a cast `123`) shows up as dirty.

use serde_json::{Map, Value as JsonValue};
use tracing::trace;

use super::{Capability, Features};
use crate::object::JsonObject;

pub struct DirtyTracking;

impl Capability for DirtyTracking {
    fn name(&self) -> &'static str {
        "dirty_tracking"
    }

    fn enabled(&self, features: &Features) -> bool {
        features.dirty_tracking
    }

    fn initialize(&self, object: &mut JsonObject) {
        object.sync_original();
    }
}

impl JsonObject {
    /// Replace the snapshot with the current serialized attributes.
    pub fn sync_original(&mut self) {
        let snapshot = self.to_array();
        trace!(object = self.name(), keys = snapshot.len(), "snapshot captured");
        self.replace_snapshot(snapshot);
    }

    /// Top-level keys whose current value differs from the snapshot, with
    /// their current values.
    ///
    /// Empty when the object has no snapshot.
    pub fn dirty(&self) -> Map<String, JsonValue> {
        let Some(original) = self.snapshot() else {
            return Map::new();
        };
        self.to_array()
            .into_iter()
            .filter(|(key, value)| original.get(key) != Some(value))
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty().is_empty()
    }

    /// The snapshot value of a top-level key.
    pub fn original(&self, key: &str) -> Option<&JsonValue> {
        self.snapshot().and_then(|original| original.get(key))
    }
}
