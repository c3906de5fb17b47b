//! # Parameter Bag
//!
//! Per-item parameter values handed over by the host, keyed by the host's
//! parameter names (see [`crate::operation::param`]).

use crate::error::{AthMovilError, AthMovilResult};
use crate::model::{AdditionalFields, Amount, LineItem};
use crate::operation::param;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameter values for a single input item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamBag(Map<String, Value>);

impl ParamBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON object. Anything else is rejected.
    pub fn from_value(value: Value) -> AthMovilResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(AthMovilError::invalid(
                "parameters",
                format!("expected an object, got {}", json_kind(&other)),
            )),
        }
    }

    /// Builder: set a parameter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Value of a parameter; explicit `null` counts as unset
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Required text parameter. Blank strings count as missing.
    pub fn require_str(&self, name: &str) -> AthMovilResult<String> {
        match self.get(name) {
            None => Err(AthMovilError::missing(name)),
            Some(Value::String(s)) if s.trim().is_empty() => Err(AthMovilError::missing(name)),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(AthMovilError::invalid(
                name,
                format!("expected text, got {}", json_kind(other)),
            )),
        }
    }

    /// Required decimal amount
    pub fn require_amount(&self, name: &str) -> AthMovilResult<Amount> {
        let value = self.get(name).ok_or_else(|| AthMovilError::missing(name))?;
        to_amount(name, value)
    }

    /// Line items, accepting a bare array or the host's `{ "item": [...] }` collection.
    /// Absent means no items.
    pub fn items(&self) -> AthMovilResult<Vec<LineItem>> {
        let list = match self.get(param::ITEMS) {
            None => return Ok(Vec::new()),
            Some(Value::Array(list)) => list.clone(),
            Some(Value::Object(collection)) => match collection.get("item") {
                None | Some(Value::Null) => return Ok(Vec::new()),
                Some(Value::Array(list)) => list.clone(),
                Some(other) => {
                    return Err(AthMovilError::invalid(
                        param::ITEMS,
                        format!("expected item list, got {}", json_kind(other)),
                    ))
                }
            },
            Some(other) => {
                return Err(AthMovilError::invalid(
                    param::ITEMS,
                    format!("expected item list, got {}", json_kind(other)),
                ))
            }
        };

        list.into_iter()
            .enumerate()
            .map(|(i, raw)| {
                serde_json::from_value(raw)
                    .map_err(|e| AthMovilError::invalid(format!("items[{i}]"), e.to_string()))
            })
            .collect()
    }

    /// Optional payment fields under `additionalFields`
    pub fn additional_fields(&self) -> AthMovilResult<AdditionalFields> {
        let fields = match self.get(param::ADDITIONAL_FIELDS) {
            None => return Ok(AdditionalFields::default()),
            Some(Value::Object(fields)) => fields,
            Some(other) => {
                return Err(AthMovilError::invalid(
                    param::ADDITIONAL_FIELDS,
                    format!("expected an object, got {}", json_kind(other)),
                ))
            }
        };

        // timeout is taken only when truthy; tax and subtotal whenever defined
        let timeout = match fields.get("timeout") {
            Some(value) if is_truthy(value) => Some(to_seconds("timeout", value)?),
            _ => None,
        };
        let tax = match fields.get("tax") {
            Some(value) if !value.is_null() => Some(to_amount("tax", value)?),
            _ => None,
        };
        let subtotal = match fields.get("subtotal") {
            Some(value) if !value.is_null() => Some(to_amount("subtotal", value)?),
            _ => None,
        };

        Ok(AdditionalFields {
            timeout,
            tax,
            subtotal,
        })
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ParamBag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// JavaScript-style truthiness of a host value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn to_amount(name: &str, value: &Value) -> AthMovilResult<Amount> {
    Amount::deserialize(value).map_err(|e| AthMovilError::invalid(name, e.to_string()))
}

fn to_seconds(name: &str, value: &Value) -> AthMovilResult<u32> {
    let seconds = match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_seconds)),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(whole_seconds),
        _ => None,
    };
    seconds
        .and_then(|s| u32::try_from(s).ok())
        .ok_or_else(|| AthMovilError::invalid(name, "expected a whole number of seconds"))
}

/// `300.0` counts as 300 seconds; fractional or negative values do not
fn whole_seconds(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64)
        .then_some(value as u64)
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

    #[test]
    fn test_require_str() {
        let bag = ParamBag::new()
            .with("ecommerceId", "ec-123")
            .with("phoneNumber", 7875550100_u64)
            .with("blank", "   ")
            .with("nothing", Value::Null);

        assert_eq!(bag.require_str("ecommerceId").unwrap(), "ec-123");
        assert_eq!(bag.require_str("phoneNumber").unwrap(), "7875550100");
        assert_eq!(bag.require_str("blank").unwrap_err(), AthMovilError::missing("blank"));
        assert_eq!(
            bag.require_str("nothing").unwrap_err(),
            AthMovilError::missing("nothing")
        );
        assert_eq!(bag.require_str("absent").unwrap_err(), AthMovilError::missing("absent"));
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(ParamBag::from_value(json!([1, 2])).is_err());
        assert!(ParamBag::from_value(json!({"total": 5})).is_ok());
    }

    #[test]
    fn test_items_shapes() {
        let bare = ParamBag::new().with("items", json!([{"name": "A", "price": 2.5}]));
        assert_eq!(bare.items().unwrap()[0].price.cents(), 250);

        let collection = ParamBag::new().with(
            "items",
            json!({"item": [{"name": "A"}, {"name": "B", "quantity": 3}]}),
        );
        let items = collection.items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].quantity, 3);

        assert!(ParamBag::new().items().unwrap().is_empty());
        assert!(ParamBag::new().with("items", json!({})).items().unwrap().is_empty());
        assert!(ParamBag::new().with("items", "nope").items().is_err());
    }

    #[test]
    fn test_additional_fields_presence_rules() {
        let bag = ParamBag::new().with("additionalFields", json!({}));
        assert_eq!(bag.additional_fields().unwrap(), AdditionalFields::default());

        let bag = ParamBag::new().with(
            "additionalFields",
            json!({"timeout": 0, "tax": 0, "subtotal": 0}),
        );
        let fields = bag.additional_fields().unwrap();
        assert_eq!(fields.timeout, None);
        assert_eq!(fields.tax, Some(Amount::ZERO));
        assert_eq!(fields.subtotal, Some(Amount::ZERO));

        let bag = ParamBag::new().with("additionalFields", json!({"timeout": 300}));
        assert_eq!(bag.additional_fields().unwrap().timeout, Some(300));

        let bag = ParamBag::new().with("additionalFields", json!({"timeout": -5}));
        assert!(bag.additional_fields().is_err());
    }

    #[test]
    fn test_timeout_accepts_whole_floats() {
        let bag = ParamBag::new().with("additionalFields", json!({"timeout": 300.0}));
        assert_eq!(bag.additional_fields().unwrap().timeout, Some(300));

        let bag = ParamBag::new().with("additionalFields", json!({"timeout": "240"}));
        assert_eq!(bag.additional_fields().unwrap().timeout, Some(240));

        let bag = ParamBag::new().with("additionalFields", json!({"timeout": 300.5}));
        assert_eq!(
            bag.additional_fields().unwrap_err(),
            AthMovilError::invalid("timeout", "expected a whole number of seconds")
        );
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&Value::Null));
        assert!(is_truthy(&json!(120)));
        assert!(is_truthy(&json!("0")));
    }
}
