//! Construction-time schema whitelist.
//!
//! A schema is a list of paths. An empty schema keeps everything. Otherwise a
//! raw key survives only if it is literally listed, and a dotted entry such as
//! `"dimensions.width"` narrows the kept data to that one nested value.
//! There are no wildcards and nothing is defaulted.

use crate::store::{data_get, data_set};
use crate::value::Attributes;

/// Apply `schema` to `raw`.
pub fn filter_attributes(raw: Attributes, schema: &[&str]) -> Attributes {
    if schema.is_empty() {
        return raw;
    }

    let nested: Vec<&str> = schema
        .iter()
        .copied()
        .filter(|path| path.contains('.') && !raw.contains_key(*path))
        .collect();

    let picked: Vec<_> = nested
        .iter()
        .filter_map(|path| data_get(&raw, path).map(|value| (*path, value.clone())))
        .collect();

    let mut kept: Attributes = raw
        .into_iter()
        .filter(|(key, _)| schema.contains(&key.as_str()))
        .collect();

    for (path, value) in picked {
        data_set(&mut kept, path, value);
    }
    kept
}
