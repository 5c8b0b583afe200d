//! Loose, JSON-shaped configuration for effects.
//!
//! Every effect documents its tunables as named optional parameters. Values that are missing keep
//! the documented default; values that are present but unusable (wrong type, non-finite, zero or
//! negative where a positive number is needed, malformed colors) are replaced by the default and
//! logged at debug level. Nothing here returns an error to the effect.
//!
//! Typed `*Options` structs run the same coercion through [`positive_or`], [`unit_or`] and
//! [`count_or`] in their `normalized()` methods so direct Rust callers get the same guarantees.

use crate::color::Rgb;
use crate::error::FxError;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Upper bound for every count read from props (particles, bars, ripples, lattice points).
pub const MAX_COUNT: usize = 10_000;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props {
    values: Map<String, Value>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object. An empty or whitespace-only document is an empty bag.
    pub fn from_json(input: &str) -> Result<Props, FxError> {
        if input.trim().is_empty() {
            return Ok(Props::new());
        }
        match serde_json::from_str::<Value>(input)? {
            Value::Object(values) => Ok(Props { values }),
            other => Err(FxError::InvalidProps(format!(
                "expected a JSON object, got {}",
                kind_name(&other)
            ))),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// A finite number strictly greater than zero.
    pub fn positive_f32(&self, key: &str, default: f32) -> f32 {
        self.number(key, default, |v| v > 0.0, "a positive number")
    }

    /// A finite number that is zero or greater.
    pub fn non_negative_f32(&self, key: &str, default: f32) -> f32 {
        self.number(key, default, |v| v >= 0.0, "a non-negative number")
    }

    /// A finite number in the open interval (0, 1), e.g. a damping factor.
    pub fn unit_f32(&self, key: &str, default: f32) -> f32 {
        self.number(key, default, |v| v > 0.0 && v < 1.0, "a number in (0, 1)")
    }

    /// Any finite number (offsets, angles).
    pub fn finite_f32(&self, key: &str, default: f32) -> f32 {
        self.number(key, default, |_| true, "a finite number")
    }

    /// A positive integer count, capped at [`MAX_COUNT`]. Fractions are truncated before the
    /// check.
    pub fn count(&self, key: &str, default: usize) -> usize {
        let Some(value) = self.values.get(key) else {
            return default;
        };
        let parsed = match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            _ => None,
        };
        match parsed {
            Some(n) if n > MAX_COUNT as i64 => {
                tracing::debug!(key, requested = n, cap = MAX_COUNT, "count capped");
                MAX_COUNT
            }
            Some(n) if n > 0 => n as usize,
            _ => {
                rejected(key, value, "a positive integer");
                default
            }
        }
    }

    pub fn color(&self, key: &str, default: Rgb) -> Rgb {
        let Some(value) = self.values.get(key) else {
            return default;
        };
        match value.as_str().map(Rgb::parse_hex) {
            Some(Ok(rgb)) => rgb,
            _ => {
                rejected(key, value, "a hex color");
                default
            }
        }
    }

    pub fn text(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            None => default.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                rejected(key, other, "a string");
                default.to_string()
            }
        }
    }

    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                rejected(key, other, "a boolean");
                default
            }
        }
    }

    /// A list of strings (tab labels, dock items). Non-string entries are skipped.
    pub fn string_list(&self, key: &str, default: &[&str]) -> Vec<String> {
        let fallback = || default.iter().map(|s| s.to_string()).collect();
        match self.values.get(key) {
            None => fallback(),
            Some(Value::Array(items)) => {
                let out: Vec<String> = items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
                if out.is_empty() {
                    rejected(key, &Value::Array(items.clone()), "a non-empty list of strings");
                    fallback()
                } else {
                    out
                }
            }
            Some(other) => {
                rejected(key, other, "a list of strings");
                fallback()
            }
        }
    }

    /// Seed for the effect's random number generator. Accepts any non-negative integer.
    pub fn seed(&self, default: u64) -> u64 {
        match self.values.get("seed") {
            None => default,
            Some(value) => match value.as_u64() {
                Some(s) => s,
                None => {
                    rejected("seed", value, "a non-negative integer");
                    default
                }
            },
        }
    }

    fn number(&self, key: &str, default: f32, accept: impl Fn(f32) -> bool, want: &str) -> f32 {
        let Some(value) = self.values.get(key) else {
            return default;
        };
        match value.as_f64().map(|f| f as f32) {
            Some(v) if v.is_finite() && accept(v) => v,
            _ => {
                rejected(key, value, want);
                default
            }
        }
    }
}

fn rejected(key: &str, value: &Value, want: &str) {
    tracing::debug!(key, %value, want, "prop rejected, using default");
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `value` when it is finite and positive, otherwise `default`.
pub fn positive_or(value: f32, default: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        default
    }
}

/// `value` when it lies in the open interval (0, 1), otherwise `default`.
pub fn unit_or(value: f32, default: f32) -> f32 {
    if value.is_finite() && value > 0.0 && value < 1.0 {
        value
    } else {
        default
    }
}

/// `value` when it is finite and not negative, otherwise `default`.
pub fn non_negative_or(value: f32, default: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        default
    }
}

/// `value` capped at [`MAX_COUNT`] when it is non-zero, otherwise `default`.
pub fn count_or(value: usize, default: usize) -> usize {
    if value == 0 {
        default
    } else {
        value.min(MAX_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let p = Props::new();
        assert_eq!(p.positive_f32("radius", 12.0), 12.0);
        assert_eq!(p.count("count", 500), 500);
        assert_eq!(p.text("text", "hi"), "hi");
        assert!(p.flag("loop", true));
    }

    #[test]
    fn non_positive_counts_fall_back() {
        for bad in [0, -5] {
            let p = Props::new().with("count", bad);
            assert_eq!(p.count("count", 500), 500);
        }
        let p = Props::new().with("count", 12.9);
        assert_eq!(p.count("count", 500), 12);
        let p = Props::new().with("count", "many");
        assert_eq!(p.count("count", 500), 500);
    }

    #[test]
    fn huge_counts_are_capped() {
        let p = Props::from_json(r#"{"count": 1e12, "bars": 9223372036854775807}"#).unwrap();
        assert_eq!(p.count("count", 500), MAX_COUNT);
        assert_eq!(p.count("bars", 5), MAX_COUNT);
        assert_eq!(count_or(usize::MAX, 3), MAX_COUNT);
    }

    #[test]
    fn damping_must_be_inside_unit_interval() {
        for bad in [0.0, 1.0, 1.5, -0.2] {
            let p = Props::new().with("damping", bad);
            assert_eq!(p.unit_f32("damping", 0.9), 0.9);
        }
        let p = Props::new().with("damping", 0.5);
        assert_eq!(p.unit_f32("damping", 0.9), 0.5);
    }

    #[test]
    fn malformed_color_falls_back() {
        let default = Rgb::new(1, 2, 3);
        assert_eq!(Props::new().with("color", "#zzz").color("color", default), default);
        assert_eq!(Props::new().with("color", 7).color("color", default), default);
        assert_eq!(
            Props::new().with("color", "#ffffff").color("color", default),
            Rgb::WHITE
        );
    }

    #[test]
    fn from_json_requires_an_object() {
        assert!(Props::from_json("[1, 2]").is_err());
        assert!(Props::from_json("{nope").is_err());
        assert!(Props::from_json("  ").unwrap().is_empty());
        let p = Props::from_json(r#"{"radius": 4.5}"#).unwrap();
        assert_eq!(p.positive_f32("radius", 1.0), 4.5);
    }

    #[test]
    fn string_list_skips_non_strings() {
        let p = Props::from_json(r#"{"items": ["a", 1, "b"]}"#).unwrap();
        assert_eq!(p.string_list("items", &["x"]), vec!["a", "b"]);
        let p = Props::from_json(r#"{"items": []}"#).unwrap();
        assert_eq!(p.string_list("items", &["x"]), vec!["x"]);
    }

    #[test]
    fn helpers_reject_non_finite() {
        assert_eq!(positive_or(f32::NAN, 2.0), 2.0);
        assert_eq!(positive_or(f32::INFINITY, 2.0), 2.0);
        assert_eq!(unit_or(0.95, 0.5), 0.95);
        assert_eq!(count_or(0, 3), 3);
        assert_eq!(non_negative_or(-1.0, 0.0), 0.0);
    }
}
