//! # JsonObject
//!
//! The value object itself: an ordered attribute map plus a reference to the
//! static definition it was built from.
//!
//! ## Construction
//!
//! Objects are only built by a definition's factory
//! ([`ObjectSpec::from`], [`ObjectSpec::from_with`], [`ObjectSpec::from_json`]),
//! which runs the same three steps every time:
//!
//! 1. **Filter**: narrow the raw input to the definition's schema.
//! 2. **Cast**: coerce declared paths to their declared types, building nested
//!    objects through their own factories.
//! 3. **Initialize**: run each enabled capability's initializer, in
//!    declaration order.
//!
//! ## Access
//!
//! After construction all reads and writes go through dot-path accessors:
//!
//! | Method | Behavior |
//! |--------|----------|
//! | [`get`](JsonObject::get) | value at path, `None` if missing |
//! | [`get_or`](JsonObject::get_or) | value at path, or the given default |
//! | [`set`](JsonObject::set) | write, creating intermediate maps (never re-casts) |
//! | [`has`](JsonObject::has) | path resolves to a non-null value |
//! | [`unset`](JsonObject::unset) | remove, no-op when missing |
//!
//! Two objects are equal when their attributes are equal. The definition,
//! features and snapshot do not take part in comparisons.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::capabilities::{initialize_capabilities, Features};
use crate::cast::cast_attributes;
use crate::schema::filter_attributes;
use crate::spec::ObjectSpec;
use crate::store::{data_forget, data_get, data_has, data_set};
use crate::value::{map_to_json, Attributes, Value};

/// Output options for [`JsonObject::to_json`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonOptions {
    pub pretty: bool,
}

impl JsonOptions {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

/// Anything that can be converted into a plain JSON map.
pub trait ToArray {
    fn to_array(&self) -> Map<String, JsonValue>;
}

#[derive(Clone)]
pub struct JsonObject {
    spec: &'static ObjectSpec,
    attributes: Attributes,
    features: Features,
    original: Option<Map<String, JsonValue>>,
}

impl JsonObject {
    pub(crate) fn build(spec: &'static ObjectSpec, raw: Attributes, features: &Features) -> Self {
        let raw_keys = raw.len();
        let mut attributes = filter_attributes(raw, spec.schema);
        cast_attributes(&mut attributes, spec.casts, features);

        let mut object = Self {
            spec,
            attributes,
            features: features.clone(),
            original: None,
        };
        initialize_capabilities(&mut object);

        debug!(
            object = spec.name,
            raw_keys,
            kept_keys = object.attributes.len(),
            "object built"
        );
        object
    }

    /// The definition this object was built from.
    pub fn spec(&self) -> &'static ObjectSpec {
        self.spec
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        data_get(&self.attributes, path)
    }

    /// The value at `path`, or `default` when the path is missing. A present
    /// null is returned as null.
    pub fn get_or<'a>(&'a self, path: &str, default: &'a Value) -> &'a Value {
        self.get(path).unwrap_or(default)
    }

    /// Write a value at `path`. The value is stored as given; the cast table
    /// is not consulted.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> &mut Self {
        data_set(&mut self.attributes, path, value.into());
        self
    }

    pub fn has(&self, path: &str) -> bool {
        data_has(&self.attributes, path)
    }

    pub fn unset(&mut self, path: &str) -> &mut Self {
        data_forget(&mut self.attributes, path);
        self
    }

    /// Fully serialized attributes: nested objects are unwrapped, date-times
    /// are RFC 3339 strings.
    pub fn to_array(&self) -> Map<String, JsonValue> {
        map_to_json(&self.attributes)
    }

    pub fn to_json(&self, options: JsonOptions) -> String {
        let value = JsonValue::Object(self.to_array());
        let rendered = if options.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        // Serializing a plain JSON value cannot fail.
        rendered.unwrap_or_default()
    }

    pub(crate) fn snapshot(&self) -> Option<&Map<String, JsonValue>> {
        self.original.as_ref()
    }

    pub(crate) fn replace_snapshot(&mut self, snapshot: Map<String, JsonValue>) {
        self.original = Some(snapshot);
    }
}

impl ToArray for JsonObject {
    fn to_array(&self) -> Map<String, JsonValue> {
        JsonObject::to_array(self)
    }
}

impl PartialEq for JsonObject {
    fn eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
    }
}

impl fmt::Debug for JsonObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.spec.name)
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl fmt::Display for JsonObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json(JsonOptions::default()))
    }
}

impl Serialize for JsonObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}
