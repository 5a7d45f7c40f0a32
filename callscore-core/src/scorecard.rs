//! Nested scorecards and the recursive override merge.
//!
//! A scorecard is a JSON object whose leaves are scalar scores and whose
//! inner nodes are category mappings, e.g.
//!
//! ```json
//! {"criteria_1": {"technical_aspects": {"call_closing": {"score": 7}}}}
//! ```
//!
//! No schema is imposed beyond "the root is an object".

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Nested category → score mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scorecard(Map<String, Value>);

impl Scorecard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Convert a decoded JSON value into a scorecard.
    ///
    /// `null` is an empty scorecard; any other non-object is rejected.
    pub fn from_value(call_id: &str, value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(CoreError::malformed_scorecard(
                call_id,
                format!("expected a JSON object, found {}", json_kind(&other)),
            )),
        }
    }

    /// Parse scorecard text as stored in the warehouse.
    pub fn parse(call_id: &str, raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| CoreError::malformed_scorecard(call_id, e.to_string()))?;
        Self::from_value(call_id, value)
    }

    /// Parse scorecard text, falling back to an empty scorecard.
    ///
    /// Used on listing paths where one bad row must not fail the response.
    pub fn parse_lenient(call_id: &str, raw: &str) -> Self {
        Self::parse(call_id, raw).unwrap_or_else(|err| {
            tracing::warn!(call_id, error = %err, "Treating malformed scorecard as empty");
            Self::default()
        })
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return a copy of this scorecard with `overrides` applied on top.
    ///
    /// `self` is left untouched.
    pub fn merged_with(&self, overrides: &Scorecard) -> Scorecard {
        let mut merged = self.0.clone();
        deep_merge(&mut merged, &overrides.0);
        Scorecard(merged)
    }
}

impl From<Map<String, Value>> for Scorecard {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Scorecard> for Value {
    fn from(scorecard: Scorecard) -> Self {
        Value::Object(scorecard.0)
    }
}

/// Apply `overrides` onto `base` in place.
///
/// For every key in `overrides`: when both sides hold objects the merge
/// recurses, otherwise the override value replaces (or inserts) the base
/// value. Every override leaf counts as present, including `0`, `false`,
/// `""` and `null`.
pub fn deep_merge(base: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (key, override_value) in overrides {
        match (base.get_mut(key), override_value) {
            (Some(Value::Object(base_child)), Value::Object(override_child)) => {
                deep_merge(base_child, override_child);
            }
            _ => {
                base.insert(key.clone(), override_value.clone());
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card(value: Value) -> Scorecard {
        Scorecard::from_value("test", value).unwrap()
    }

    #[test]
    fn override_wins_and_siblings_survive() {
        let ai = card(json!({"a": {"b": 1, "c": 2}, "d": 3}));
        let overrides = card(json!({"a": {"b": 5}}));

        let merged = ai.merged_with(&overrides);

        assert_eq!(Value::from(merged), json!({"a": {"b": 5, "c": 2}, "d": 3}));
    }

    #[test]
    fn merge_does_not_touch_input() {
        let ai = card(json!({"a": {"b": 1}}));
        let before = ai.clone();

        let _ = ai.merged_with(&card(json!({"a": {"b": 9, "z": 1}})));

        assert_eq!(ai, before);
    }

    #[test]
    fn scalar_replaces_mapping_and_mapping_replaces_scalar() {
        let ai = card(json!({"a": {"b": 1}, "x": 4}));
        let overrides = card(json!({"a": 0, "x": {"score": 8}}));

        let merged = ai.merged_with(&overrides);

        assert_eq!(Value::from(merged), json!({"a": 0, "x": {"score": 8}}));
    }

    #[test]
    fn new_keys_are_inserted_at_depth() {
        let ai = card(json!({"criteria_1": {"technical_aspects": {"call_closing": {"score": 7}}}}));
        let overrides = card(json!({
            "criteria_1": {"technical_aspects": {"recording_disclosure": {"score": 10}}},
            "criteria_3": {"empathy": {"score": 6}}
        }));

        let merged = ai.merged_with(&overrides);

        assert_eq!(
            Value::from(merged),
            json!({
                "criteria_1": {"technical_aspects": {
                    "call_closing": {"score": 7},
                    "recording_disclosure": {"score": 10}
                }},
                "criteria_3": {"empathy": {"score": 6}}
            })
        );
    }

    #[test]
    fn falsy_override_leaves_are_applied() {
        let ai = card(json!({"a": 5, "b": true, "c": "ok", "d": 1}));
        let overrides = card(json!({"a": 0, "b": false, "c": "", "d": null}));

        let merged = ai.merged_with(&overrides);

        assert_eq!(Value::from(merged), json!({"a": 0, "b": false, "c": "", "d": null}));
    }

    #[test]
    fn parse_rejects_non_object() {
        let err = Scorecard::parse("call-1", "[1, 2]").unwrap_err();
        assert!(err.to_string().contains("found array"));

        assert!(Scorecard::parse("call-1", "{not json").is_err());
    }

    #[test]
    fn parse_null_is_empty() {
        assert!(Scorecard::parse("call-1", "null").unwrap().is_empty());
    }

    #[test]
    fn lenient_parse_falls_back_to_empty() {
        assert!(Scorecard::parse_lenient("call-1", "{broken").is_empty());

        let ok = Scorecard::parse_lenient("call-1", r#"{"a": 1}"#);
        assert_eq!(ok.get("a"), Some(&json!(1)));
    }
}
