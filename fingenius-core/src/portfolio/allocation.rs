//! Allocation maps (asset class / sector / geography -> amount)

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// Stored weighting of a portfolio across buckets.
///
/// Keys are open strings ("stocks", "bonds", "technology", "europe", ...);
/// nothing restricts them to a closed asset-class set. Amounts serialize as
/// JSON numbers and deserialize from numbers or numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AllocationMap(BTreeMap<String, Decimal>);

#[derive(Serialize)]
struct AsFloat(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Serialize for AllocationMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, amount) in &self.0 {
            map.serialize_entry(key, &AsFloat(*amount))?;
        }
        map.end()
    }
}

impl AllocationMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Amount stored under `key`, if any
    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.0.get(key).copied()
    }

    pub fn insert(&mut self, key: impl Into<String>, amount: Decimal) -> Option<Decimal> {
        self.0.insert(key.into(), amount)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Parse a stored JSON blob.
    ///
    /// The blob must be an object whose values are numbers or numeric strings.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::Consistency(format!("allocation map must be a JSON object, got {}", value))
        })?;

        let mut map = BTreeMap::new();
        for (key, raw) in object {
            let amount = match raw {
                Value::Number(n) => parse_decimal(&n.to_string()),
                Value::String(s) => parse_decimal(s.trim()),
                _ => None,
            }
            .ok_or_else(|| {
                Error::Consistency(format!("allocation '{}' has non-numeric amount {}", key, raw))
            })?;
            map.insert(key.clone(), amount);
        }
        Ok(Self(map))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl FromIterator<(String, Decimal)> for AllocationMap {
    fn from_iter<T: IntoIterator<Item = (String, Decimal)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_from_json_numbers_and_strings() {
        let map = AllocationMap::from_json(&json!({"stocks": 6500, "bonds": "1200.50", "cash": 0.25}))
            .unwrap();
        assert_eq!(map.get("stocks"), Some(dec!(6500)));
        assert_eq!(map.get("bonds"), Some(dec!(1200.50)));
        assert_eq!(map.get("cash"), Some(dec!(0.25)));
        assert_eq!(map.get("crypto"), None);
    }

    #[test]
    fn test_from_json_scientific() {
        let map = AllocationMap::from_json(&json!({"stocks": "1e3"})).unwrap();
        assert_eq!(map.get("stocks"), Some(dec!(1000)));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            AllocationMap::from_json(&json!([1, 2])),
            Err(Error::Consistency(_))
        ));
        assert!(matches!(
            AllocationMap::from_json(&json!({"stocks": true})),
            Err(Error::Consistency(_))
        ));
        assert!(AllocationMap::from_json(&json!({"stocks": "lots"})).is_err());
    }

    #[test]
    fn test_amounts_serialize_as_numbers() {
        let mut map = AllocationMap::new();
        map.insert("stocks", dec!(6500));
        map.insert("bonds", dec!(12.5));
        let json = map.to_json();
        assert_eq!(json, json!({"stocks": 6500.0, "bonds": 12.5}));
        assert!(json["stocks"].is_number());
    }

    #[test]
    fn test_json_round_trip_keeps_keys() {
        let mut map = AllocationMap::new();
        map.insert("stocks", dec!(60));
        map.insert("bonds", dec!(40));
        let parsed = AllocationMap::from_json(&map.to_json()).unwrap();
        assert_eq!(parsed, map);
    }
}
