//! Untyped planner options, as handed over by scripts and configuration files.
//!
//! The typed configs ([`AStarConfig`](crate::astar::AStarConfig),
//! [`RrtConfig`](crate::rrt::RrtConfig)) read their fields from a [`ConfigMap`].

use std::collections::BTreeMap;

use crate::{PlanError, Result};

/// A single option value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(untagged))]
pub enum ConfigValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

pub type ConfigMap = BTreeMap<String, ConfigValue>;

impl ConfigValue {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Integer(val) => Some(val as f64),
            Self::Float(val) => Some(val),
            Self::Text(_) => None,
        }
    }

    pub fn as_usize(&self) -> Option<usize> {
        match *self {
            Self::Integer(val) => usize::try_from(val).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(val) => Some(val),
            _ => None,
        }
    }
}

impl From<f64> for ConfigValue {
    fn from(val: f64) -> Self {
        Self::Float(val)
    }
}

impl From<i64> for ConfigValue {
    fn from(val: i64) -> Self {
        Self::Integer(val)
    }
}

impl From<i32> for ConfigValue {
    fn from(val: i32) -> Self {
        Self::Integer(val.into())
    }
}

impl From<&str> for ConfigValue {
    fn from(val: &str) -> Self {
        Self::Text(val.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(val: String) -> Self {
        Self::Text(val)
    }
}

/// Builds a [`ConfigMap`] from key value pairs
pub fn config_map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> ConfigMap
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

pub(crate) fn require<'a>(map: &'a ConfigMap, key: &str) -> Result<&'a ConfigValue> {
    map.get(key)
        .ok_or_else(|| PlanError::Configuration(format!("missing option `{key}`")))
}

fn malformed(key: &str, expected: &str, val: &ConfigValue) -> PlanError {
    PlanError::Configuration(format!("option `{key}` must be {expected}, got {val:?}"))
}

pub(crate) fn float(map: &ConfigMap, key: &str) -> Result<Option<f64>> {
    map.get(key)
        .map(|val| val.as_f64().ok_or_else(|| malformed(key, "a number", val)))
        .transpose()
}

pub(crate) fn count(map: &ConfigMap, key: &str) -> Result<Option<usize>> {
    map.get(key)
        .map(|val| {
            val.as_usize()
                .ok_or_else(|| malformed(key, "a non negative integer", val))
        })
        .transpose()
}

pub(crate) fn text<'a>(map: &'a ConfigMap, key: &str) -> Result<Option<&'a str>> {
    map.get(key)
        .map(|val| val.as_str().ok_or_else(|| malformed(key, "a string", val)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access() {
        let map = config_map([
            ("w", ConfigValue::from(0.5)),
            ("nodes", 10i64.into()),
            ("name", "euclidean".into()),
            ("negative", (-1i64).into()),
        ]);

        assert_eq!(float(&map, "w"), Ok(Some(0.5)));
        assert_eq!(float(&map, "nodes"), Ok(Some(10.0)));
        assert_eq!(count(&map, "nodes"), Ok(Some(10)));
        assert_eq!(text(&map, "name"), Ok(Some("euclidean")));
        assert_eq!(float(&map, "missing"), Ok(None));

        assert!(count(&map, "w").is_err());
        assert!(count(&map, "negative").is_err());
        assert!(float(&map, "name").is_err());
        assert!(require(&map, "missing").is_err());
    }
}
