//! Object definitions.
//!
//! A value-object "subtype" is a static [`ObjectSpec`]: its name, schema
//! whitelist, cast table, attached capabilities and optional rule provider.
//! Definitions are declared once, as statics, with the same const-builder
//! style used for every registry in this crate:
//!
//! ```
//! use jsonobj::{CastType, DirtyTracking, ObjectSpec, Validation};
//! use jsonobj::rules::RuleSet;
//!
//! pub static DIMENSIONS: ObjectSpec = ObjectSpec::new("Dimensions")
//!     .casts(&[("width", CastType::Int), ("height", CastType::Int)]);
//!
//! fn product_rules() -> RuleSet {
//!     RuleSet::new().field("name", "required|string")
//! }
//!
//! pub static PRODUCT: ObjectSpec = ObjectSpec::new("Product")
//!     .schema(&["name", "price", "dimensions"])
//!     .casts(&[
//!         ("price", CastType::Float),
//!         ("dimensions", CastType::Object(&DIMENSIONS)),
//!     ])
//!     .capabilities(&[&DirtyTracking, &Validation])
//!     .rules(product_rules);
//!
//! let product = PRODUCT.from_json(serde_json::json!({
//!     "name": "Desk",
//!     "price": "199.5",
//!     "dimensions": {"width": "120", "height": 75},
//! }));
//! assert_eq!(product.get("dimensions.width").and_then(|v| v.as_i64()), Some(120));
//! ```

use std::fmt;

use crate::capabilities::{Capability, Features};
use crate::object::JsonObject;
use crate::rules::RuleSet;
use crate::value::{map_from_json, Attributes, Value};

/// The declared target type of a cast-table entry.
///
/// Nested-object targets are resolved at declaration time, never looked up
/// by name while casting.
#[derive(Clone, Copy)]
pub enum CastType {
    Int,
    Float,
    String,
    Bool,
    Array,
    DateTime,
    /// Build a nested object through this definition's own pipeline.
    Object(&'static ObjectSpec),
    /// Any type name the caster does not know. Values are left unchanged.
    Other(&'static str),
}

impl CastType {
    /// Resolve a type name, accepting the usual aliases.
    ///
    /// | Name | Resolves to |
    /// |------|-------------|
    /// | `int`, `integer` | [`CastType::Int`] |
    /// | `float`, `real`, `double` | [`CastType::Float`] |
    /// | `string` | [`CastType::String`] |
    /// | `bool`, `boolean` | [`CastType::Bool`] |
    /// | `array` | [`CastType::Array`] |
    /// | `datetime`, `date` | [`CastType::DateTime`] |
    /// | anything else | [`CastType::Other`] |
    pub fn parse(name: &'static str) -> CastType {
        match name {
            "int" | "integer" => CastType::Int,
            "float" | "real" | "double" => CastType::Float,
            "string" => CastType::String,
            "bool" | "boolean" => CastType::Bool,
            "array" => CastType::Array,
            "datetime" | "date" => CastType::DateTime,
            other => CastType::Other(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CastType::Int => "int",
            CastType::Float => "float",
            CastType::String => "string",
            CastType::Bool => "bool",
            CastType::Array => "array",
            CastType::DateTime => "datetime",
            CastType::Object(spec) => spec.name,
            CastType::Other(name) => name,
        }
    }
}

impl PartialEq for CastType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CastType::Object(a), CastType::Object(b)) => std::ptr::eq(*a, *b),
            (CastType::Other(a), CastType::Other(b)) => a == b,
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl fmt::Debug for CastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastType::Object(spec) => write!(f, "Object({})", spec.name),
            CastType::Other(name) => write!(f, "Other({:?})", name),
            _ => f.write_str(self.name()),
        }
    }
}

/// Static definition of a value-object type.
pub struct ObjectSpec {
    /// Type name, used in log events and generated code.
    pub name: &'static str,

    /// Whitelisted paths. Empty keeps every raw key.
    pub schema: &'static [&'static str],

    /// Cast table, applied in declaration order.
    pub casts: &'static [(&'static str, CastType)],

    /// Capabilities, initialized in declaration order.
    pub capabilities: &'static [&'static dyn Capability],

    /// Rule provider for the validation capability.
    pub rules: Option<fn() -> RuleSet>,
}

impl ObjectSpec {
    /// Create a definition with no schema, casts, capabilities or rules.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            schema: &[],
            casts: &[],
            capabilities: &[],
            rules: None,
        }
    }

    pub const fn schema(mut self, schema: &'static [&'static str]) -> Self {
        self.schema = schema;
        self
    }

    pub const fn casts(mut self, casts: &'static [(&'static str, CastType)]) -> Self {
        self.casts = casts;
        self
    }

    pub const fn capabilities(mut self, capabilities: &'static [&'static dyn Capability]) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub const fn rules(mut self, provider: fn() -> RuleSet) -> Self {
        self.rules = Some(provider);
        self
    }

    /// Look up a capability by name.
    pub fn capability(&self, name: &str) -> Option<&'static dyn Capability> {
        self.capabilities
            .iter()
            .copied()
            .find(|capability| capability.name() == name)
    }

    pub fn has_capability(&self, name: &str) -> bool {
        self.capability(name).is_some()
    }

    /// The declared cast for `path`, if any.
    pub fn cast_for(&self, path: &str) -> Option<CastType> {
        self.casts
            .iter()
            .find(|(declared, _)| *declared == path)
            .map(|(_, cast)| *cast)
    }

    /// Build an object with default [`Features`].
    pub fn from(&'static self, raw: Attributes) -> JsonObject {
        JsonObject::build(self, raw, &Features::default())
    }

    /// Build an object with an explicit feature set. Nested objects created by
    /// the caster inherit it.
    pub fn from_with(&'static self, raw: Attributes, features: &Features) -> JsonObject {
        JsonObject::build(self, raw, features)
    }

    /// Build an object from JSON-shaped input.
    ///
    /// Objects are used as-is and arrays become index-keyed maps. Any other
    /// JSON value yields an empty object.
    pub fn from_json(&'static self, raw: serde_json::Value) -> JsonObject {
        self.from(json_to_attributes(raw))
    }
}

impl fmt::Debug for ObjectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let capabilities: Vec<_> = self.capabilities.iter().map(|c| c.name()).collect();
        f.debug_struct("ObjectSpec")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("casts", &self.casts)
            .field("capabilities", &capabilities)
            .field("rules", &self.rules.is_some())
            .finish()
    }
}

pub(crate) fn json_to_attributes(raw: serde_json::Value) -> Attributes {
    match raw {
        serde_json::Value::Object(map) => map_from_json(map),
        serde_json::Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| (i.to_string(), Value::from(item)))
            .collect(),
        _ => Attributes::new(),
    }
}
