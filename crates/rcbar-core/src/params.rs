//! Flat string-keyed parameter map.
//!
//! Every configuration source (TOML file, host user attributes, code) is
//! flattened into this map first. Typed accessors parse on demand and report
//! the offending key through [`RcbarError::InvalidParameter`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RcbarError, Result};

/// Separator for list-valued parameters such as `Lengths = "6000;4000"`.
pub const LIST_SEPARATOR: char = ';';

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterMap {
    values: BTreeMap<String, String>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.values.insert(key.into(), value.to_string());
        self
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Raw string value, trimmed.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.trim())
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| RcbarError::parameter(format!("{key} is missing")))
    }

    pub fn f64(&self, key: &str) -> Result<f64> {
        parse_number(key, self.require(key)?)
    }

    /// Like [`f64`](Self::f64) but falls back to `default` when the key is
    /// absent. A present but malformed value is still an error.
    pub fn f64_or(&self, key: &str, default: f64) -> Result<f64> {
        match self.get(key) {
            None | Some("") => Ok(default),
            Some(raw) => parse_number(key, raw),
        }
    }

    pub fn opt_f64(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key) {
            None | Some("") => Ok(None),
            Some(raw) => parse_number(key, raw).map(Some),
        }
    }

    /// A strictly positive dimension.
    pub fn positive(&self, key: &str) -> Result<f64> {
        let value = self.f64(key)?;
        if value <= 0.0 {
            return Err(RcbarError::parameter(format!(
                "{key} must be positive, got {value}"
            )));
        }
        Ok(value)
    }

    /// A dimension that may be zero but not negative.
    pub fn non_negative_or(&self, key: &str, default: f64) -> Result<f64> {
        let value = self.f64_or(key, default)?;
        if value < 0.0 {
            return Err(RcbarError::parameter(format!(
                "{key} must not be negative, got {value}"
            )));
        }
        Ok(value)
    }

    /// `;`-separated list of numbers. Absent keys yield `None`.
    pub fn list(&self, key: &str) -> Result<Option<Vec<f64>>> {
        let raw = match self.get(key) {
            None | Some("") => return Ok(None),
            Some(raw) => raw,
        };
        raw.split(LIST_SEPARATOR)
            .map(|item| parse_number(key, item.trim()))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Boolean flag written as `0`/`1`/`true`/`false`.
    pub fn flag(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            None | Some("") => Ok(default),
            Some("1") => Ok(true),
            Some("0") => Ok(false),
            Some(raw) if raw.eq_ignore_ascii_case("true") => Ok(true),
            Some(raw) if raw.eq_ignore_ascii_case("false") => Ok(false),
            Some(raw) => Err(RcbarError::parameter(format!(
                "{key} is not a flag: {raw:?}"
            ))),
        }
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            None | Some("") => default.to_string(),
            Some(raw) => raw.to_string(),
        }
    }

    /// Merge `other` into `self`, overriding existing keys.
    pub fn extend(&mut self, other: &ParameterMap) {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), v.clone());
        }
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParameterMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

fn parse_number(key: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .parse()
        .map_err(|_| RcbarError::parameter(format!("{key} is not a number: {raw:?}")))?;
    if !value.is_finite() {
        return Err(RcbarError::parameter(format!("{key} is not finite")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParameterMap {
        ParameterMap::new()
            .with("Height", "2000")
            .with("Width", " 300 ")
            .with("Bad", "abc")
            .with("Lengths", "6000; 4000;2500")
            .with("Flag", "1")
    }

    #[test]
    fn test_required_number() {
        let map = sample();
        assert_eq!(map.f64("Height").unwrap(), 2000.0);
        assert_eq!(map.f64("Width").unwrap(), 300.0);
    }

    #[test]
    fn test_missing_and_malformed_name_the_key() {
        let map = sample();
        match map.f64("Missing") {
            Err(RcbarError::InvalidParameter(msg)) => assert!(msg.contains("Missing")),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
        match map.f64_or("Bad", 1.0) {
            Err(RcbarError::InvalidParameter(msg)) => assert!(msg.contains("Bad")),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_and_lists() {
        let map = sample();
        assert_eq!(map.f64_or("Cover", 50.0).unwrap(), 50.0);
        assert_eq!(map.list("Lengths").unwrap().unwrap(), vec![6000.0, 4000.0, 2500.0]);
        assert!(map.list("Nope").unwrap().is_none());
        assert!(map.flag("Flag", false).unwrap());
        assert!(!map.flag("Other", false).unwrap());
    }

    #[test]
    fn test_positive_rejects_zero() {
        let map = ParameterMap::new().with("Width", 0);
        assert!(map.positive("Width").is_err());
    }
}
