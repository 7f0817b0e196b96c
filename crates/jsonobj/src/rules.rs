//! # Validation Rules
//!
//! A [`RuleSet`] maps field paths to rule expressions. Expressions use the
//! familiar pipe syntax (`"required|string|max:255"`) and are parsed once into
//! [`Rule`] values when the set is built.
//!
//! Rule sets are evaluated by a [`ValidationEngine`]. The crate ships
//! [`RuleEngine`], which understands:
//!
//! | Rule | Passes when |
//! |------|-------------|
//! | `required` | present, not null, not blank, not an empty container |
//! | `present` | the key exists (null allowed) |
//! | `filled` | absent, or present and not empty |
//! | `nullable` | always; a null value then skips every non-implicit rule |
//! | `string` | a string |
//! | `integer` | an integer, or a string of one |
//! | `numeric` | a number, or a numeric string |
//! | `boolean` | `true`, `false`, `0`, `1`, `"0"`, `"1"` |
//! | `array` | a list or a map |
//! | `date` | a date-time string the `datetime` cast understands |
//! | `min:N`, `max:N`, `between:A,B` | size within bounds |
//! | `in:a,b,...` | textual value is one of the options |
//!
//! Size is string length in characters, container length, or the numeric
//! value (for numbers, and for numeric strings under `integer`/`numeric`).
//! Absent or blank fields skip every rule except `required`, `present` and
//! `filled`. Unknown rules are ignored.

use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

use crate::cast::{parse_datetime_str, parse_number};
use crate::error::ValidationErrors;

/// A parsed rule expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    Present,
    Filled,
    Nullable,
    String,
    Integer,
    Numeric,
    Boolean,
    Array,
    Date,
    Min(f64),
    Max(f64),
    Between(f64, f64),
    In(Vec<String>),
    Unknown(String),
}

impl Rule {
    /// Parse one expression, e.g. `"max:10"`.
    pub fn parse(expr: &str) -> Rule {
        let expr = expr.trim();
        let (name, args) = match expr.split_once(':') {
            Some((name, args)) => (name, Some(args)),
            None => (expr, None),
        };
        let number = |s: &str| s.trim().parse::<f64>().ok();

        match (name, args) {
            ("required", None) => Rule::Required,
            ("present", None) => Rule::Present,
            ("filled", None) => Rule::Filled,
            ("nullable", None) => Rule::Nullable,
            ("string", None) => Rule::String,
            ("integer" | "int", None) => Rule::Integer,
            ("numeric", None) => Rule::Numeric,
            ("boolean" | "bool", None) => Rule::Boolean,
            ("array", None) => Rule::Array,
            ("date", None) => Rule::Date,
            ("min", Some(n)) => number(n).map(Rule::Min).unwrap_or_else(|| Rule::unknown(expr)),
            ("max", Some(n)) => number(n).map(Rule::Max).unwrap_or_else(|| Rule::unknown(expr)),
            ("between", Some(range)) => match range.split_once(',') {
                Some((lo, hi)) => match (number(lo), number(hi)) {
                    (Some(lo), Some(hi)) => Rule::Between(lo, hi),
                    _ => Rule::unknown(expr),
                },
                None => Rule::unknown(expr),
            },
            ("in", Some(options)) => {
                Rule::In(options.split(',').map(|o| o.trim().to_string()).collect())
            }
            _ => Rule::unknown(expr),
        }
    }

    fn unknown(expr: &str) -> Rule {
        Rule::Unknown(expr.to_string())
    }

    /// Rules that still run when the field is absent or blank.
    fn is_implicit(&self) -> bool {
        matches!(self, Rule::Required | Rule::Present | Rule::Filled)
    }
}

/// Field path → rules, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    fields: IndexMap<String, Vec<Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add rules for `field` from a pipe-separated expression.
    pub fn field(self, field: impl Into<String>, rules: &str) -> Self {
        self.field_rules(field, rules.split('|').filter(|r| !r.trim().is_empty()))
    }

    /// Add rules for `field` from individual expressions.
    pub fn field_rules<'a>(
        mut self,
        field: impl Into<String>,
        rules: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.fields
            .entry(field.into())
            .or_default()
            .extend(rules.into_iter().map(Rule::parse));
        self
    }

    pub fn get(&self, field: &str) -> Option<&[Rule]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.fields
            .iter()
            .map(|(field, rules)| (field.as_str(), rules.as_slice()))
    }
}

/// Evaluates a rule set against serialized attributes.
pub trait ValidationEngine {
    fn validate(&self, data: &Map<String, JsonValue>, rules: &RuleSet)
        -> Result<(), ValidationErrors>;
}

/// An engine that accepts everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEngine;

impl ValidationEngine for NoopEngine {
    fn validate(&self, _: &Map<String, JsonValue>, _: &RuleSet) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// The built-in rule engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleEngine;

impl ValidationEngine for RuleEngine {
    fn validate(
        &self,
        data: &Map<String, JsonValue>,
        rules: &RuleSet,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (field, field_rules) in rules.iter() {
            check_field(&mut errors, field, lookup(data, field), field_rules);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn lookup<'a>(data: &'a Map<String, JsonValue>, path: &str) -> Option<&'a JsonValue> {
    let mut segments = path.split('.');
    let mut current = data.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            JsonValue::Object(map) => map.get(segment)?,
            JsonValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn check_field(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&JsonValue>,
    rules: &[Rule],
) {
    // Null counts as blank, so a nullable null only meets the implicit rules.
    let blank = value.map_or(true, is_blank);

    for rule in rules {
        if blank && !rule.is_implicit() {
            continue;
        }
        if let Some(message) = check_rule(field, value, rule, rules) {
            errors.add(field, message);
        }
    }
}

fn check_rule(
    field: &str,
    value: Option<&JsonValue>,
    rule: &Rule,
    rules: &[Rule],
) -> Option<String> {
    let fails = match (rule, value) {
        (Rule::Required, v) => v.map_or(true, is_empty),
        (Rule::Present, v) => v.is_none(),
        (Rule::Filled, v) => v.is_some_and(is_empty),
        (_, None) => false,
        (Rule::Nullable, _) | (Rule::Unknown(_), _) => false,
        (Rule::String, Some(v)) => !v.is_string(),
        (Rule::Integer, Some(v)) => !is_integer(v),
        (Rule::Numeric, Some(v)) => numeric_value(v).is_none(),
        (Rule::Boolean, Some(v)) => !is_boolean(v),
        (Rule::Array, Some(v)) => !(v.is_array() || v.is_object()),
        (Rule::Date, Some(v)) => v.as_str().and_then(parse_datetime_str).is_none(),
        (Rule::Min(n), Some(v)) => size(v, rules).is_some_and(|s| s < *n),
        (Rule::Max(n), Some(v)) => size(v, rules).is_some_and(|s| s > *n),
        (Rule::Between(lo, hi), Some(v)) => size(v, rules).is_some_and(|s| s < *lo || s > *hi),
        (Rule::In(options), Some(v)) => !options.iter().any(|o| *o == text(v)),
    };
    fails.then(|| message(field, rule, value))
}

fn message(field: &str, rule: &Rule, value: Option<&JsonValue>) -> String {
    let unit = match value {
        Some(JsonValue::String(_)) => " characters",
        Some(JsonValue::Array(_)) | Some(JsonValue::Object(_)) => " items",
        _ => "",
    };
    match rule {
        Rule::Required => format!("The {field} field is required."),
        Rule::Present => format!("The {field} field must be present."),
        Rule::Filled => format!("The {field} field must have a value."),
        Rule::String => format!("The {field} field must be a string."),
        Rule::Integer => format!("The {field} field must be an integer."),
        Rule::Numeric => format!("The {field} field must be a number."),
        Rule::Boolean => format!("The {field} field must be true or false."),
        Rule::Array => format!("The {field} field must be an array."),
        Rule::Date => format!("The {field} field must be a valid date."),
        Rule::Min(n) => format!("The {field} field must be at least {n}{unit}."),
        Rule::Max(n) => format!("The {field} field must not be greater than {n}{unit}."),
        Rule::Between(lo, hi) => format!("The {field} field must be between {lo} and {hi}{unit}."),
        Rule::In(_) => format!("The selected {field} is invalid."),
        Rule::Nullable | Rule::Unknown(_) => format!("The {field} field is invalid."),
    }
}

fn is_blank(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn is_empty(value: &JsonValue) -> bool {
    match value {
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(map) => map.is_empty(),
        other => is_blank(other),
    }
}

fn is_integer(value: &JsonValue) -> bool {
    match value {
        JsonValue::Number(n) => n.is_i64() || n.is_u64(),
        JsonValue::String(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}

fn is_boolean(value: &JsonValue) -> bool {
    match value {
        JsonValue::Bool(_) => true,
        JsonValue::Number(n) => matches!(n.as_i64(), Some(0 | 1)),
        JsonValue::String(s) => s == "0" || s == "1",
        _ => false,
    }
}

fn numeric_value(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => parse_number(s.trim()),
        _ => None,
    }
}

fn size(value: &JsonValue, rules: &[Rule]) -> Option<f64> {
    let numeric = rules.contains(&Rule::Numeric) || rules.contains(&Rule::Integer);
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) if numeric => parse_number(s.trim()).or(Some(s.chars().count() as f64)),
        JsonValue::String(s) => Some(s.chars().count() as f64),
        JsonValue::Array(items) => Some(items.len() as f64),
        JsonValue::Object(map) => Some(map.len() as f64),
        _ => None,
    }
}

fn text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(true) => "1".to_string(),
        JsonValue::Bool(false) => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    fn check(value: JsonValue, rules: RuleSet) -> Result<(), ValidationErrors> {
        RuleEngine.validate(&data(value), &rules)
    }

    #[test]
    fn test_parses_pipe_expressions() {
        let rules = RuleSet::new().field("name", "required|string|max:10|in:a,b");
        assert_eq!(
            rules.get("name").unwrap(),
            &[
                Rule::Required,
                Rule::String,
                Rule::Max(10.0),
                Rule::In(vec!["a".into(), "b".into()])
            ]
        );
    }

    #[test]
    fn test_malformed_arguments_are_unknown() {
        assert_eq!(Rule::parse("max:lots"), Rule::Unknown("max:lots".into()));
        assert_eq!(Rule::parse("between:1"), Rule::Unknown("between:1".into()));
        assert_eq!(Rule::parse("uuid"), Rule::Unknown("uuid".into()));
    }

    #[test]
    fn test_required_rejects_missing_and_blank() {
        let rules = RuleSet::new().field("foo", "required");
        assert!(check(json!({"foo": "bar"}), rules.clone()).is_ok());

        for invalid in [json!({}), json!({"foo": ""}), json!({"foo": "  "}), json!({"foo": null}), json!({"foo": []})] {
            let errors = check(invalid, rules.clone()).unwrap_err();
            assert_eq!(errors.get("foo").unwrap(), &["The foo field is required."]);
        }
    }

    #[test]
    fn test_optional_fields_skip_type_rules_when_absent() {
        let rules = RuleSet::new().field("age", "integer|min:18");
        assert!(check(json!({}), rules.clone()).is_ok());
        assert!(check(json!({"age": ""}), rules.clone()).is_ok());
        assert!(check(json!({"age": 20}), rules.clone()).is_ok());
        assert!(check(json!({"age": "20"}), rules.clone()).is_ok());
        assert!(check(json!({"age": 12}), rules.clone()).is_err());
        assert!(check(json!({"age": "twelve"}), rules).is_err());
    }

    #[test]
    fn test_nullable_skips_type_rules() {
        let rules = RuleSet::new().field("note", "nullable|string");
        assert!(check(json!({"note": null}), rules.clone()).is_ok());
        assert!(check(json!({"note": 5}), rules).is_err());
    }

    #[test]
    fn test_nullable_still_runs_required() {
        let rules = RuleSet::new().field("foo", "required|nullable");
        let err = check(json!({"foo": null}), rules.clone()).unwrap_err();
        assert!(err.contains("foo"));
        assert!(check(json!({"foo": "bar"}), rules).is_ok());

        let filled = RuleSet::new().field("foo", "nullable|filled");
        assert!(check(json!({"foo": null}), filled).is_err());
    }

    #[test]
    fn test_present_allows_null_but_not_missing() {
        let rules = RuleSet::new().field("x", "present");
        assert!(check(json!({"x": null}), rules.clone()).is_ok());
        assert!(check(json!({}), rules).is_err());
    }

    #[test]
    fn test_filled_only_checks_when_present() {
        let rules = RuleSet::new().field("x", "filled");
        assert!(check(json!({}), rules.clone()).is_ok());
        assert!(check(json!({"x": "v"}), rules.clone()).is_ok());
        assert!(check(json!({"x": ""}), rules).is_err());
    }

    #[test]
    fn test_size_depends_on_value_kind() {
        let rules = RuleSet::new().field("v", "max:3");
        assert!(check(json!({"v": "abc"}), rules.clone()).is_ok());
        assert!(check(json!({"v": "abcd"}), rules.clone()).is_err());
        assert!(check(json!({"v": [1, 2, 3, 4]}), rules.clone()).is_err());
        assert!(check(json!({"v": 3.5}), rules.clone()).is_err());
        assert!(check(json!({"v": "1000"}), rules).is_err());

        let numeric = RuleSet::new().field("v", "numeric|max:3");
        assert!(check(json!({"v": "2.5"}), numeric).is_ok());
    }

    #[test]
    fn test_size_messages_name_units() {
        let errors = check(json!({"v": "abcd"}), RuleSet::new().field("v", "max:3")).unwrap_err();
        assert_eq!(
            errors.get("v").unwrap(),
            &["The v field must not be greater than 3 characters."]
        );
    }

    #[test]
    fn test_between_and_in() {
        let rules = RuleSet::new()
            .field("n", "between:1,5")
            .field("color", "in:red,green");
        assert!(check(json!({"n": 3, "color": "red"}), rules.clone()).is_ok());

        let errors = check(json!({"n": 9, "color": "blue"}), rules).unwrap_err();
        assert!(errors.contains("n"));
        assert_eq!(errors.get("color").unwrap(), &["The selected color is invalid."]);
    }

    #[test]
    fn test_type_rules() {
        let rules = RuleSet::new()
            .field("s", "string")
            .field("b", "boolean")
            .field("a", "array")
            .field("d", "date")
            .field("n", "numeric");
        assert!(check(
            json!({"s": "x", "b": "1", "a": {"k": 1}, "d": "2024-01-15", "n": "1e3"}),
            rules.clone()
        )
        .is_ok());

        let errors =
            check(json!({"s": 1, "b": "yes", "a": "x", "d": "soon", "n": "abc"}), rules).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["s", "b", "a", "d", "n"]);
    }

    #[test]
    fn test_dotted_fields_read_nested_values() {
        let rules = RuleSet::new().field("dimensions.width", "required|integer");
        assert!(check(json!({"dimensions": {"width": 10}}), rules.clone()).is_ok());
        let errors = check(json!({"dimensions": {}}), rules).unwrap_err();
        assert!(errors.contains("dimensions.width"));
    }

    #[test]
    fn test_unknown_rules_are_ignored() {
        let rules = RuleSet::new().field("x", "uuid|required");
        assert!(check(json!({"x": "not-a-uuid"}), rules).is_ok());
    }

    #[test]
    fn test_noop_engine_accepts_everything() {
        let rules = RuleSet::new().field("x", "required");
        assert!(NoopEngine.validate(&Map::new(), &rules).is_ok());
    }
}
