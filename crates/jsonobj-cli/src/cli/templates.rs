//! Templates embedded at compile time.

/// Definition file generated by `jsonobj make`.
pub const OBJECT_TEMPLATE: &str = include_str!("templates/object.rs.jinja");
