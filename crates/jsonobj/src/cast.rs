//! # Type Casting
//!
//! After the schema filter runs, every entry of the definition's cast table is
//! applied in declaration order. For each `(path, type)`:
//!
//! 1. Read the value at `path`. Absent or null values are skipped; nothing is
//!    defaulted.
//! 2. Convert it according to the declared [`CastType`].
//! 3. Write the result back at `path`.
//!
//! Casting never fails. Input a conversion cannot make sense of degrades to
//! the conversion's zero value (`int`, `float`) or is left untouched
//! (`datetime`, unknown types).
//!
//! ## Coercion Table
//!
//! | Type | From string | From number | From container |
//! |------|-------------|-------------|----------------|
//! | `int` | numeric prefix, truncated (`"12.7kg"` → `12`, `"abc"` → `0`) | truncated toward zero | `0` if empty, else `1` |
//! | `float` | numeric prefix (`"1.5e2x"` → `150.0`) | widened | `0.0` if empty, else `1.0` |
//! | `string` | unchanged | decimal text (`1.0` → `"1"`) | compact JSON |
//! | `bool` | `""`/`"0"` → false | `0` → false | empty → false |
//! | `array` | `["text"]` | `[n]` | unchanged |
//! | `datetime` | RFC 3339, `Y-m-d H:M:S`, `Y-m-d`, `@ts` | unix timestamp | unchanged |
//!
//! ## Nested Objects
//!
//! A [`CastType::Object`] entry coerces the value to a map and builds the
//! nested definition through its own factory, so the nested object runs its
//! own filter, casts and capabilities. The parent never casts a path that
//! passes through a nested object: each level owns its own attributes, which
//! is also why the recursion always terminates.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use tracing::trace;

use crate::capabilities::Features;
use crate::spec::CastType;
use crate::store::{data_get, data_set};
use crate::value::{map_from_json, Attributes, Value};

/// Apply a cast table to `attrs` in place.
pub fn cast_attributes(attrs: &mut Attributes, casts: &[(&str, CastType)], features: &Features) {
    for (path, cast) in casts {
        if crosses_object(attrs, path) {
            trace!(path, "cast skipped: path is owned by a nested object");
            continue;
        }
        let value = match data_get(attrs, path) {
            Some(value) if !value.is_null() => value.clone(),
            _ => continue,
        };
        if let CastType::Other(name) = cast {
            trace!(path, cast = name, "unrecognized cast type, value left unchanged");
            continue;
        }
        data_set(attrs, path, cast_value(cast, value, features));
    }
}

/// True if some intermediate segment of `path` is a nested object.
fn crosses_object(attrs: &Attributes, path: &str) -> bool {
    let mut prefix_end = 0;
    while let Some(offset) = path[prefix_end..].find('.') {
        prefix_end += offset;
        if matches!(data_get(attrs, &path[..prefix_end]), Some(Value::Object(_))) {
            return true;
        }
        prefix_end += 1;
    }
    false
}

/// Convert a single non-null value.
pub fn cast_value(cast: &CastType, value: Value, features: &Features) -> Value {
    match cast {
        CastType::Int => match value {
            Value::UInt(u) => Value::UInt(u),
            other => Value::Int(to_int(&other)),
        },
        CastType::Float => Value::Float(to_float(&value)),
        CastType::String => Value::String(to_text(&value)),
        CastType::Bool => Value::Bool(value.is_truthy()),
        CastType::Array => to_array(value),
        CastType::DateTime => match parse_datetime(&value) {
            Some(dt) => Value::DateTime(dt),
            None => {
                trace!(kind = value.type_name(), "datetime cast left value unchanged");
                value
            }
        },
        CastType::Object(spec) => match value {
            Value::Object(obj) if std::ptr::eq(obj.spec(), *spec) => Value::Object(obj),
            other => Value::from(spec.from_with(to_map(other), features)),
        },
        CastType::Other(_) => value,
    }
}

fn to_int(value: &Value) -> i64 {
    match value {
        Value::Null => 0,
        Value::Bool(b) => i64::from(*b),
        Value::Int(i) => *i,
        Value::UInt(u) => i64::try_from(*u).unwrap_or(i64::MAX),
        Value::Float(f) => truncate(*f),
        Value::String(s) => {
            let prefix = numeric_prefix(s);
            prefix
                .parse::<i64>()
                .unwrap_or_else(|_| truncate(prefix.parse::<f64>().unwrap_or(0.0)))
        }
        Value::DateTime(dt) => dt.timestamp(),
        Value::List(items) => i64::from(!items.is_empty()),
        Value::Map(map) => i64::from(!map.is_empty()),
        Value::Object(_) => 1,
    }
}

fn to_float(value: &Value) -> f64 {
    match value {
        Value::Int(i) => *i as f64,
        Value::UInt(u) => *u as f64,
        Value::Float(f) => *f,
        Value::String(s) => numeric_prefix(s).parse::<f64>().unwrap_or(0.0),
        other => to_int(other) as f64,
    }
}

/// Truncate toward zero; non-finite input yields 0 and out-of-range input
/// saturates.
fn truncate(f: f64) -> i64 {
    if f.is_finite() {
        f.trunc() as i64
    } else {
        0
    }
}

/// The leading numeric part of `s`: optional whitespace and sign, digits with
/// an optional fraction, and an optional exponent. Empty when there are no
/// digits.
fn numeric_prefix(s: &str) -> &str {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return "";
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    &s[..end]
}

/// Parse a whole string as a finite number.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let prefix = numeric_prefix(s);
    if prefix.is_empty() || prefix.len() != s.trim_start().len() {
        return None;
    }
    prefix.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        Value::Float(f) => float_text(*f),
        Value::String(s) => s.clone(),
        Value::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        other => other.to_json().to_string(),
    }
}

fn float_text(f: f64) -> String {
    if f.is_nan() {
        "NAN".to_string()
    } else if f == f64::INFINITY {
        "INF".to_string()
    } else if f == f64::NEG_INFINITY {
        "-INF".to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

fn to_array(value: Value) -> Value {
    match value {
        Value::List(_) | Value::Map(_) => value,
        Value::Object(obj) => Value::Map(map_from_json(obj.to_array())),
        Value::Null => Value::List(Vec::new()),
        scalar => Value::List(vec![scalar]),
    }
}

/// Coerce a value into the raw input of a nested object.
fn to_map(value: Value) -> Attributes {
    match value {
        Value::Map(map) => map,
        Value::Object(obj) => map_from_json(obj.to_array()),
        Value::List(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| (i.to_string(), item))
            .collect(),
        Value::Null => Attributes::new(),
        scalar => Attributes::from([("0".to_string(), scalar)]),
    }
}

/// Interpret a value as a timezone-aware date-time.
pub fn parse_datetime(value: &Value) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::DateTime(dt) => Some(*dt),
        Value::Int(ts) => from_timestamp(*ts, 0),
        Value::Float(f) if f.is_finite() => {
            let secs = f.floor();
            let nanos = ((f - secs) * 1e9).round() as u32;
            from_timestamp(secs as i64, nanos.min(999_999_999))
        }
        Value::String(s) => parse_datetime_str(s),
        _ => None,
    }
}

/// Parse the date-time formats accepted by the `datetime` cast. Strings
/// without an offset are taken as UTC.
pub(crate) fn parse_datetime_str(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Some(ts) = s.strip_prefix('@') {
        return ts.parse::<i64>().ok().and_then(|ts| from_timestamp(ts, 0));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt);
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

fn from_timestamp(secs: i64, nanos: u32) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(secs, nanos).map(|dt| dt.fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ObjectSpec;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn cast(cast: CastType, value: Value) -> Value {
        cast_value(&cast, value, &Features::default())
    }

    #[test]
    fn test_int_from_strings() {
        assert_eq!(cast(CastType::Int, "123".into()), Value::Int(123));
        assert_eq!(cast(CastType::Int, "  42 apples".into()), Value::Int(42));
        assert_eq!(cast(CastType::Int, "-12.9kg".into()), Value::Int(-12));
        assert_eq!(cast(CastType::Int, "1e3".into()), Value::Int(1000));
        assert_eq!(cast(CastType::Int, "abc".into()), Value::Int(0));
        assert_eq!(cast(CastType::Int, "".into()), Value::Int(0));
        assert_eq!(cast(CastType::Int, ".5".into()), Value::Int(0));
        assert_eq!(cast(CastType::Int, "0x1A".into()), Value::Int(0));
        assert_eq!(
            cast(CastType::Int, "99999999999999999999".into()),
            Value::Int(i64::MAX)
        );
    }

    #[test]
    fn test_int_from_other_kinds() {
        assert_eq!(cast(CastType::Int, Value::Float(-3.99)), Value::Int(-3));
        assert_eq!(cast(CastType::Int, Value::Float(f64::NAN)), Value::Int(0));
        assert_eq!(cast(CastType::Int, Value::Bool(true)), Value::Int(1));
        assert_eq!(cast(CastType::Int, Value::List(vec![])), Value::Int(0));
        assert_eq!(cast(CastType::Int, Value::List(vec![Value::Null])), Value::Int(1));
        assert_eq!(cast(CastType::Int, Value::UInt(u64::MAX)), Value::UInt(u64::MAX));
    }

    #[test]
    fn test_float_from_strings() {
        assert_eq!(cast(CastType::Float, "19.99".into()), Value::Float(19.99));
        assert_eq!(cast(CastType::Float, "1.5e2x".into()), Value::Float(150.0));
        assert_eq!(cast(CastType::Float, "-.25".into()), Value::Float(-0.25));
        assert_eq!(cast(CastType::Float, "nope".into()), Value::Float(0.0));
        assert_eq!(cast(CastType::Float, Value::Int(7)), Value::Float(7.0));
        assert_eq!(cast(CastType::Float, Value::UInt(1 << 63)), Value::Float(9.223372036854776e18));
    }

    #[test]
    fn test_string_representations() {
        assert_eq!(cast(CastType::String, Value::Int(10)), Value::from("10"));
        assert_eq!(
            cast(CastType::String, Value::UInt(u64::MAX)),
            Value::from("18446744073709551615")
        );
        assert_eq!(cast(CastType::String, Value::Float(1.0)), Value::from("1"));
        assert_eq!(cast(CastType::String, Value::Float(2.5)), Value::from("2.5"));
        assert_eq!(cast(CastType::String, Value::Bool(true)), Value::from("1"));
        assert_eq!(cast(CastType::String, Value::Bool(false)), Value::from(""));
        assert_eq!(
            cast(CastType::String, Value::from(json!({"a": [1]}))),
            Value::from(r#"{"a":[1]}"#)
        );
    }

    #[test]
    fn test_bool_truthiness() {
        for falsy in [
            Value::Int(0),
            Value::from("0"),
            Value::from(""),
            Value::List(vec![]),
            Value::Map(Attributes::new()),
            Value::Float(0.0),
        ] {
            assert_eq!(cast(CastType::Bool, falsy), Value::Bool(false));
        }
        for truthy in [Value::Int(2), Value::from("no"), Value::from("0.0"), Value::List(vec![Value::Int(0)])] {
            assert_eq!(cast(CastType::Bool, truthy), Value::Bool(true));
        }
    }

    #[test]
    fn test_array_wraps_scalars_only() {
        assert_eq!(cast(CastType::Array, "x".into()), Value::List(vec!["x".into()]));
        assert_eq!(cast(CastType::Array, Value::Int(1)), Value::List(vec![Value::Int(1)]));
        let map = Value::from(json!({"k": "v"}));
        assert_eq!(cast(CastType::Array, map.clone()), map);
        let list = Value::from(json!([1, 2]));
        assert_eq!(cast(CastType::Array, list.clone()), list);
    }

    #[test]
    fn test_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap().fixed_offset();
        for input in [
            "2024-01-15T14:30:00Z",
            "2024-01-15T16:30:00+02:00",
            "2024-01-15 14:30:00",
            "2024-01-15T14:30:00",
            "2024-01-15 14:30",
        ] {
            assert_eq!(
                cast(CastType::DateTime, input.into()),
                Value::DateTime(expected),
                "input {input}"
            );
        }
        assert_eq!(
            cast(CastType::DateTime, Value::Int(expected.timestamp())),
            Value::DateTime(expected)
        );
        assert_eq!(
            cast(CastType::DateTime, Value::from(format!("@{}", expected.timestamp()))),
            Value::DateTime(expected)
        );
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        let Value::DateTime(dt) = cast(CastType::DateTime, "2024-03-01".into()) else {
            panic!("expected a datetime");
        };
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_datetime_keeps_offset() {
        let Value::DateTime(dt) = cast(CastType::DateTime, "2024-01-15T16:30:00+02:00".into()) else {
            panic!("expected a datetime");
        };
        assert_eq!(dt.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_unparseable_datetime_is_left_unchanged() {
        assert_eq!(cast(CastType::DateTime, "next tuesday".into()), Value::from("next tuesday"));
        assert_eq!(cast(CastType::DateTime, Value::Bool(true)), Value::Bool(true));
    }

    #[test]
    fn test_unknown_cast_is_noop() {
        let mut attrs = crate::spec::json_to_attributes(json!({"price": "9.50"}));
        cast_attributes(&mut attrs, &[("price", CastType::Other("decimal:2"))], &Features::default());
        assert_eq!(attrs["price"], Value::from("9.50"));
    }

    #[test]
    fn test_null_and_absent_values_are_skipped() {
        let mut attrs = crate::spec::json_to_attributes(json!({"a": null}));
        cast_attributes(
            &mut attrs,
            &[("a", CastType::Int), ("b", CastType::Int), ("c.d", CastType::Bool)],
            &Features::default(),
        );
        assert_eq!(Value::Map(attrs).to_json(), json!({"a": null}));
    }

    #[test]
    fn test_nested_paths_cast_in_place() {
        let mut attrs = crate::spec::json_to_attributes(json!({"dims": {"w": "3", "h": "4"}}));
        cast_attributes(&mut attrs, &[("dims.w", CastType::Int)], &Features::default());
        assert_eq!(Value::Map(attrs).to_json(), json!({"dims": {"w": 3, "h": "4"}}));
    }

    static INNER: ObjectSpec = ObjectSpec::new("Inner").casts(&[("n", CastType::Int)]);

    #[test]
    fn test_object_cast_builds_nested_definition() {
        let value = cast(CastType::Object(&INNER), Value::from(json!({"n": "5"})));
        let obj = value.as_object().expect("nested object");
        assert_eq!(obj.name(), "Inner");
        assert_eq!(obj.get("n"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_object_cast_coerces_scalars_and_lists() {
        let value = cast(CastType::Object(&INNER), "x".into());
        assert_eq!(value.as_object().unwrap().get("0"), Some(&Value::from("x")));

        let value = cast(CastType::Object(&INNER), Value::from(json!(["a", "b"])));
        assert_eq!(value.as_object().unwrap().get("1"), Some(&Value::from("b")));
    }

    #[test]
    fn test_object_cast_passes_same_definition_through() {
        let mut inner = INNER.from_json(json!({"n": 1}));
        inner.set("n", "raw");
        let value = cast(CastType::Object(&INNER), Value::from(inner));
        assert_eq!(value.as_object().unwrap().get("n"), Some(&Value::from("raw")));
    }

    #[test]
    fn test_parent_does_not_recast_inside_nested_objects() {
        let mut attrs = crate::spec::json_to_attributes(json!({"inner": {"n": "5", "s": 10}}));
        cast_attributes(
            &mut attrs,
            &[("inner", CastType::Object(&INNER)), ("inner.s", CastType::String)],
            &Features::default(),
        );
        let inner = attrs["inner"].as_object().unwrap();
        assert_eq!(inner.get("n"), Some(&Value::Int(5)));
        assert_eq!(inner.get("s"), Some(&Value::Int(10)));
    }

    #[test]
    fn test_numeric_prefix_edges() {
        assert_eq!(numeric_prefix("12abc"), "12");
        assert_eq!(numeric_prefix("-"), "");
        assert_eq!(numeric_prefix("1e"), "1");
        assert_eq!(numeric_prefix("1e+5x"), "1e+5");
        assert_eq!(numeric_prefix("5."), "5.");
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("inf"), None);
    }
}
