//! # Attribute Store
//!
//! Dot-path access over an [`Attributes`] map. A path like `"dimensions.width"`
//! addresses `width` inside the `dimensions` map. Traversal descends into:
//!
//! - maps, by key
//! - nested [`JsonObject`](crate::JsonObject)s, through their own store
//! - lists, by numeric segment (`"tags.0"`)
//!
//! None of these operations fail. Missing data reads as absent, writes create
//! the intermediate maps they need, and removals of missing paths do nothing.
//!
//! | Operation | Missing path | Present `null` |
//! |-----------|--------------|----------------|
//! | [`data_get`] | `None` | `Some(&Null)` |
//! | [`data_has`] | `false` | `false` |
//! | [`data_set`] | creates maps | overwrites |
//! | [`data_forget`] | no-op | removes |

use crate::value::{Attributes, Value};

/// Read the value at `path`.
pub fn data_get<'a>(attrs: &'a Attributes, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = attrs.get(first)?;
    for segment in segments {
        current = step(current, segment)?;
    }
    Some(current)
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Map(map) => map.get(segment),
        Value::Object(obj) => obj.attributes().get(segment),
        Value::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// True if `path` resolves to a non-null value.
pub fn data_has(attrs: &Attributes, path: &str) -> bool {
    data_get(attrs, path).is_some_and(|value| !value.is_null())
}

/// Write `value` at `path`, creating intermediate maps as needed.
///
/// A scalar sitting where a container is needed is replaced by a map.
pub fn data_set(attrs: &mut Attributes, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            attrs.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let slot = attrs.entry(head.to_string()).or_insert(Value::Null);
            set_in(slot, rest, value);
        }
    }
}

fn set_in(target: &mut Value, path: &str, value: Value) {
    if let Value::Object(obj) = target {
        obj.set(path, value);
        return;
    }

    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };

    if let Value::List(items) = target {
        if let Ok(index) = head.parse::<usize>() {
            if index < items.len() {
                match rest {
                    None => items[index] = value,
                    Some(rest) => set_in(&mut items[index], rest, value),
                }
                return;
            }
            if index == items.len() {
                match rest {
                    None => items.push(value),
                    Some(rest) => {
                        let mut slot = Value::Null;
                        set_in(&mut slot, rest, value);
                        items.push(slot);
                    }
                }
                return;
            }
        }
        // Non-numeric or sparse index: the list becomes an index-keyed map.
        let map = std::mem::take(items)
            .into_iter()
            .enumerate()
            .map(|(i, item)| (i.to_string(), item))
            .collect();
        *target = Value::Map(map);
    }

    if !matches!(target, Value::Map(_)) {
        *target = Value::Map(Attributes::new());
    }
    if let Value::Map(map) = target {
        match rest {
            None => {
                map.insert(head.to_string(), value);
            }
            Some(rest) => {
                let slot = map.entry(head.to_string()).or_insert(Value::Null);
                set_in(slot, rest, value);
            }
        }
    }
}

/// Remove the value at `path`. Missing paths are ignored.
pub fn data_forget(attrs: &mut Attributes, path: &str) {
    match path.split_once('.') {
        None => {
            attrs.shift_remove(path);
        }
        Some((head, rest)) => {
            if let Some(slot) = attrs.get_mut(head) {
                forget_in(slot, rest);
            }
        }
    }
}

fn forget_in(target: &mut Value, path: &str) {
    match target {
        Value::Map(map) => data_forget(map, path),
        Value::Object(obj) => {
            obj.unset(path);
        }
        Value::List(items) => {
            let (head, rest) = match path.split_once('.') {
                Some((head, rest)) => (head, Some(rest)),
                None => (path, None),
            };
            if let Ok(index) = head.parse::<usize>() {
                if index < items.len() {
                    match rest {
                        None => {
                            items.remove(index);
                        }
                        Some(rest) => forget_in(&mut items[index], rest),
                    }
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::map_from_json;
    use serde_json::json;

    fn attrs(value: serde_json::Value) -> Attributes {
        match value {
            serde_json::Value::Object(map) => map_from_json(map),
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn test_get_reads_nested_paths() {
        let a = attrs(json!({"dimensions": {"width": 10, "depth": {"cm": 3}}}));
        assert_eq!(data_get(&a, "dimensions.width"), Some(&Value::Int(10)));
        assert_eq!(data_get(&a, "dimensions.depth.cm"), Some(&Value::Int(3)));
        assert_eq!(data_get(&a, "dimensions.height"), None);
        assert_eq!(data_get(&a, "missing.path"), None);
    }

    #[test]
    fn test_get_indexes_into_lists() {
        let a = attrs(json!({"tags": ["a", "b"]}));
        assert_eq!(data_get(&a, "tags.1"), Some(&Value::from("b")));
        assert_eq!(data_get(&a, "tags.2"), None);
        assert_eq!(data_get(&a, "tags.x"), None);
    }

    #[test]
    fn test_get_does_not_descend_into_scalars() {
        let a = attrs(json!({"name": "widget"}));
        assert_eq!(data_get(&a, "name.length"), None);
    }

    #[test]
    fn test_get_returns_present_null() {
        let a = attrs(json!({"note": null}));
        assert_eq!(data_get(&a, "note"), Some(&Value::Null));
        assert!(!data_has(&a, "note"));
    }

    #[test]
    fn test_set_creates_intermediate_maps() {
        let mut a = Attributes::new();
        data_set(&mut a, "a.b.c", Value::Int(1));
        assert_eq!(data_get(&a, "a.b.c"), Some(&Value::Int(1)));
        assert!(a["a"].as_map().is_some());
    }

    #[test]
    fn test_set_replaces_scalar_with_map() {
        let mut a = attrs(json!({"a": 5}));
        data_set(&mut a, "a.b", Value::Int(1));
        assert_eq!(Value::Map(a).to_json(), json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_set_into_lists_replaces_or_appends() {
        let mut a = attrs(json!({"tags": ["a", "b"]}));
        data_set(&mut a, "tags.0", Value::from("z"));
        data_set(&mut a, "tags.2", Value::from("c"));
        assert_eq!(Value::Map(a.clone()).to_json(), json!({"tags": ["z", "b", "c"]}));

        data_set(&mut a, "tags.7", Value::from("far"));
        assert_eq!(
            Value::Map(a).to_json(),
            json!({"tags": {"0": "z", "1": "b", "2": "c", "7": "far"}})
        );
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let mut a = Attributes::new();
        for (path, value) in [
            ("x", Value::Int(1)),
            ("y.z", Value::from("deep")),
            ("list", Value::List(vec![Value::Bool(true)])),
        ] {
            data_set(&mut a, path, value.clone());
            assert_eq!(data_get(&a, path), Some(&value));
        }
    }

    #[test]
    fn test_forget_removes_leaf_and_keeps_order() {
        let mut a = attrs(json!({"a": 1, "b": {"c": 2, "d": 3}, "e": 4}));
        data_forget(&mut a, "b.c");
        data_forget(&mut a, "a");
        assert_eq!(Value::Map(a).to_json(), json!({"b": {"d": 3}, "e": 4}));
    }

    #[test]
    fn test_forget_missing_path_is_noop() {
        let mut a = attrs(json!({"a": 1}));
        data_forget(&mut a, "x.y.z");
        data_forget(&mut a, "a.b");
        assert_eq!(Value::Map(a).to_json(), json!({"a": 1}));
    }

    #[test]
    fn test_forget_removes_list_items() {
        let mut a = attrs(json!({"tags": ["a", "b", "c"]}));
        data_forget(&mut a, "tags.1");
        assert_eq!(Value::Map(a).to_json(), json!({"tags": ["a", "c"]}));
    }
}
