//! Structured logging for objects.
//!
//! Events go through `tracing` at info level, tagged with the configured
//! `channel` and the object's type name. Nothing is emitted unless the
//! definition lists [`Logging`] and the `logging` feature is on.

use tracing::info;

use super::{Capability, Features};
use crate::object::JsonObject;

pub struct Logging;

impl Capability for Logging {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn enabled(&self, features: &Features) -> bool {
        features.logging
    }

    fn initialize(&self, object: &mut JsonObject) {
        object.log("created");
    }
}

impl JsonObject {
    /// Whether [`JsonObject::log`] will emit anything.
    pub fn logging_enabled(&self) -> bool {
        Logging.enabled(self.features()) && self.spec().has_capability(Logging.name())
    }

    /// Emit a log event for this object.
    pub fn log(&self, message: &str) {
        if !self.logging_enabled() {
            return;
        }
        info!(
            channel = %self.features().log_channel,
            object = self.name(),
            attributes = self.attributes().len(),
            "[JsonObject] {}",
            message
        );
    }
}
