//! # Capabilities
//!
//! Optional behaviors a definition attaches to its objects. The base object
//! knows nothing about any specific capability: a definition lists the ones it
//! wants, and after filtering and casting the initializer walks that list in
//! declaration order, calling [`Capability::initialize`] on each capability
//! that is enabled for the object's [`Features`].
//!
//! | Capability | Name | Initializer | Adds |
//! |------------|------|-------------|------|
//! | [`DirtyTracking`] | `dirty_tracking` | captures the snapshot | `dirty()`, `is_dirty()`, `original()`, `sync_original()` |
//! | [`Validation`] | `validation` | none | `validate()`, `validate_with()` |
//! | [`Logging`] | `logging` | logs creation | `log()` |
//!
//! Initializers run exactly once per object, from the factory. Nested objects
//! built by the caster run their own capabilities during their own
//! construction.
//!
//! ## Adding a capability
//!
//! Implement [`Capability`] on a unit struct and list it in a definition:
//!
//! ```
//! use jsonobj::{Capability, JsonObject, ObjectSpec};
//!
//! struct Stamped;
//!
//! impl Capability for Stamped {
//!     fn name(&self) -> &'static str {
//!         "stamped"
//!     }
//!
//!     fn initialize(&self, object: &mut JsonObject) {
//!         object.set("stamped", true);
//!     }
//! }
//!
//! static NOTE: ObjectSpec = ObjectSpec::new("Note").capabilities(&[&Stamped]);
//!
//! let note = NOTE.from_json(serde_json::json!({"body": "hi"}));
//! assert!(note.has("stamped"));
//! ```

mod dirty;
mod logging;
mod validation;

pub use dirty::DirtyTracking;
pub use logging::Logging;
pub use validation::Validation;

use tracing::trace;

use crate::object::JsonObject;

/// An optional behavior attached to a definition.
pub trait Capability: Sync {
    /// Stable identifier, matched by [`ObjectSpec::has_capability`](crate::ObjectSpec::has_capability).
    fn name(&self) -> &'static str;

    /// Whether the initializer should run under `features`.
    fn enabled(&self, _features: &Features) -> bool {
        true
    }

    /// One-time hook, run after filtering and casting.
    fn initialize(&self, _object: &mut JsonObject) {}
}

/// Feature switches an object is built with.
///
/// Usually derived from [`JsonObjectConfig`](crate::config::JsonObjectConfig);
/// the defaults match the configuration defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Features {
    pub validation: bool,
    pub dirty_tracking: bool,
    pub logging: bool,
    /// Recorded as the `channel` field of every log event.
    pub log_channel: String,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            validation: true,
            dirty_tracking: true,
            logging: false,
            log_channel: "jsonobj".to_string(),
        }
    }
}

impl Features {
    /// Every feature switched off.
    pub fn none() -> Self {
        Self {
            validation: false,
            dirty_tracking: false,
            logging: false,
            ..Self::default()
        }
    }

    pub fn with_logging(mut self, channel: impl Into<String>) -> Self {
        self.logging = true;
        self.log_channel = channel.into();
        self
    }
}

/// Run every enabled capability initializer of `object`'s definition, in
/// declaration order.
pub(crate) fn initialize_capabilities(object: &mut JsonObject) {
    let spec = object.spec();
    for capability in spec.capabilities {
        if !capability.enabled(object.features()) {
            trace!(
                object = spec.name,
                capability = capability.name(),
                "capability disabled"
            );
            continue;
        }
        capability.initialize(object);
    }
}
