use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single row of the flags table.
///
/// Only the `fields` of a store row map onto this struct; record metadata (`id`,
/// `created_time`) is filled in by the store that decoded the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagRecord {
    /// Flag key. Not required to be unique: lookups return the first match.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Disabled flags always resolve to the caller's default.
    #[serde(rename = "Enabled", default, deserialize_with = "deserialize_truthy")]
    pub enabled: bool,
    #[serde(
        rename = "Value",
        default,
        skip_serializing_if = "FlagValue::is_absent"
    )]
    pub value: FlagValue,
    #[serde(skip)]
    pub id: Option<String>,
    #[serde(skip)]
    pub created_time: Option<DateTime<Utc>>,
}

impl FlagRecord {
    /// Create a record that did not come from a store.
    ///
    /// ```
    /// # use airtable_flags::{FlagRecord, FlagValue};
    /// let record = FlagRecord::new("dark-mode", true, true);
    /// assert_eq!(record.value, FlagValue::Boolean(true));
    /// ```
    pub fn new(name: impl Into<String>, enabled: bool, value: impl Into<FlagValue>) -> Self {
        FlagRecord {
            name: name.into(),
            enabled,
            value: value.into(),
            id: None,
            created_time: None,
        }
    }
}

/// Payload of the `Value` column.
///
/// The store does not know which type a flag is supposed to have, so the payload is decoded
/// as-is and checked against the requested type at resolution time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// The column is missing from the row. Airtable omits empty cells entirely.
    #[default]
    #[serde(skip)]
    Absent,
    /// Explicit `null`.
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    /// Any JSON object or array.
    Structure(serde_json::Value),
}

impl FlagValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FlagValue::Absent)
    }

    /// Boolean view of the value. A missing value reads as `false`.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            FlagValue::Boolean(b) => Some(*b),
            FlagValue::Absent => Some(false),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value. `NaN` is not a usable number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FlagValue::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&serde_json::Value> {
        match self {
            FlagValue::Structure(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for FlagValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<serde_json::Value> for FlagValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Boolean(b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::String(s),
            structure @ (Value::Array(_) | Value::Object(_)) => Self::Structure(structure),
        }
    }
}

/// `Enabled` is a checkbox column, but rows edited by hand or imported from elsewhere may carry
/// other types. Those are read with the usual truthiness rules instead of failing the page.
fn deserialize_truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    use serde_json::Value;
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{FlagRecord, FlagValue};

    #[test]
    fn missing_columns_use_defaults() {
        let record: FlagRecord = serde_json::from_value(json!({ "Name": "bare" })).unwrap();
        assert_eq!(record.name, "bare");
        assert!(!record.enabled);
        assert_eq!(record.value, FlagValue::Absent);
    }

    #[test]
    fn explicit_null_is_not_absent() {
        let record: FlagRecord =
            serde_json::from_value(json!({ "Name": "n", "Enabled": true, "Value": null }))
                .unwrap();
        assert_eq!(record.value, FlagValue::Null);
    }

    #[test]
    fn decodes_each_value_type() {
        let decode = |value: serde_json::Value| -> FlagValue {
            serde_json::from_value::<FlagRecord>(json!({ "Name": "f", "Value": value }))
                .unwrap()
                .value
        };

        assert_eq!(decode(json!(true)), FlagValue::Boolean(true));
        assert_eq!(decode(json!(3)), FlagValue::Number(3.0));
        assert_eq!(decode(json!(2.5)), FlagValue::Number(2.5));
        assert_eq!(decode(json!("blue")), FlagValue::String("blue".to_owned()));
        assert_eq!(
            decode(json!({ "limit": 10 })),
            FlagValue::Structure(json!({ "limit": 10 }))
        );
        assert_eq!(
            decode(json!(["a", "b"])),
            FlagValue::Structure(json!(["a", "b"]))
        );
    }

    #[test]
    fn enabled_uses_truthiness() {
        let enabled = |value: serde_json::Value| -> bool {
            serde_json::from_value::<FlagRecord>(json!({ "Name": "f", "Enabled": value }))
                .unwrap()
                .enabled
        };

        assert!(enabled(json!(true)));
        assert!(enabled(json!("yes")));
        assert!(enabled(json!(1)));
        assert!(!enabled(json!(false)));
        assert!(!enabled(json!("")));
        assert!(!enabled(json!(0)));
        assert!(!enabled(json!(null)));
    }

    #[test]
    fn absent_value_is_not_serialized() {
        let record = FlagRecord {
            value: FlagValue::Absent,
            ..FlagRecord::new("f", true, false)
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({ "Name": "f", "Enabled": true })
        );
    }

    #[test]
    fn typed_views() {
        assert_eq!(FlagValue::Absent.as_boolean(), Some(false));
        assert_eq!(FlagValue::Null.as_boolean(), None);
        assert_eq!(FlagValue::from("x").as_boolean(), None);
        assert_eq!(FlagValue::Number(f64::NAN).as_number(), None);
        assert_eq!(FlagValue::Number(1.5).as_number(), Some(1.5));
        assert_eq!(FlagValue::Null.as_structure(), None);
        assert_eq!(FlagValue::from(json!(null)), FlagValue::Null);
        assert_eq!(FlagValue::from(json!(7)), FlagValue::Number(7.0));
    }
}
