//! On-demand validation.
//!
//! Validation never runs on its own: not at construction, not on `set`. A
//! caller asks for it with [`JsonObject::validate`] (built-in [`RuleEngine`])
//! or [`JsonObject::validate_with`] (any [`ValidationEngine`]).
//!
//! An object is validated only when its definition lists [`Validation`],
//! provides a rule set, and the `validation` feature is on. In every other
//! case validation succeeds without looking at the data.

use tracing::debug;

use super::Capability;
use crate::error::Result;
use crate::object::JsonObject;
use crate::rules::{RuleEngine, RuleSet, ValidationEngine};

pub struct Validation;

impl Capability for Validation {
    fn name(&self) -> &'static str {
        "validation"
    }
}

impl JsonObject {
    /// Validate the current attributes with the built-in [`RuleEngine`].
    pub fn validate(&self) -> Result<()> {
        self.validate_with(&RuleEngine)
    }

    /// Validate the current attributes with `engine`.
    pub fn validate_with(&self, engine: &dyn ValidationEngine) -> Result<()> {
        let Some(rules) = self.rules() else {
            return Ok(());
        };
        let data = self.to_array();
        engine.validate(&data, &rules).map_err(|errors| {
            debug!(object = self.name(), fields = errors.len(), "validation failed");
            errors.into()
        })
    }

    /// The rule set in effect, if validation applies to this object.
    pub fn rules(&self) -> Option<RuleSet> {
        if !self.features().validation || !self.spec().has_capability(Validation.name()) {
            return None;
        }
        self.spec().rules.map(|provider| provider())
    }
}
