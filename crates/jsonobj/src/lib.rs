//! # jsonobj Architecture
//!
//! jsonobj turns loosely shaped JSON into **typed value objects**: a definition
//! declares which keys to keep, which types they cast to and which optional
//! capabilities the object carries. The library does no I/O; the `jsonobj`
//! binary is a thin client that scaffolds definitions and manages config.
//!
//! ## The Construction Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Factory (ObjectSpec::from / from_with / from_json)         │
//! │  - The only way to build an object                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Schema Filter (schema.rs)                                  │
//! │  - Narrows raw input to the whitelisted paths               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Type Caster (cast.rs)                                      │
//! │  - Coerces declared paths, builds nested objects            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Capability Initializer (capabilities/)                     │
//! │  - Runs enabled hooks in declaration order                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! After construction the object is an ordered attribute map behind dot-path
//! accessors ([`JsonObject::get`], [`JsonObject::set`], ...). Serialization,
//! dirty tracking and validation all derive from that map's current state.
//!
//! ## Key Principle: Nothing Fails Quietly Except Casting
//!
//! Store reads, writes and casts never return errors: bad input degrades to a
//! documented fallback. Errors ([`Error`]) come only from explicit requests:
//! [`JsonObject::validate`] and [`ColumnCodec::encode`].
//!
//! ## Module Overview
//!
//! - [`value`]: the runtime [`Value`] enum and JSON conversion
//! - [`store`]: dot-path get/set/has/forget over attribute maps
//! - [`schema`]: whitelist filtering
//! - [`cast`]: type coercion
//! - [`spec`]: static object definitions ([`ObjectSpec`], [`CastType`])
//! - [`capabilities`]: dirty tracking, validation, logging
//! - [`rules`]: rule sets and the built-in validation engine
//! - [`object`]: [`JsonObject`] and its serializer
//! - [`column`]: storage column codec
//! - [`config`]: `jsonobj.toml` settings
//! - [`error`]: error types

pub mod capabilities;
pub mod cast;
pub mod column;
pub mod config;
pub mod error;
pub mod object;
pub mod rules;
pub mod schema;
pub mod spec;
pub mod store;
pub mod value;

pub use capabilities::{Capability, DirtyTracking, Features, Logging, Validation};
pub use column::ColumnCodec;
pub use config::JsonObjectConfig;
pub use error::{Error, Result, ValidationErrors};
pub use object::{JsonObject, JsonOptions, ToArray};
pub use rules::{RuleEngine, RuleSet, ValidationEngine};
pub use spec::{CastType, ObjectSpec};
pub use value::{Attributes, Value};
