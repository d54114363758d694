//! Query-parameter encoding for catalog filters.
//!
//! The MBTA API takes each constraint as `filter[<name>]=<value>`, with
//! list-valued constraints sent as a single comma-separated string.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{Error, Result};

/// Query parameters ready to append to a request URL.
pub type FilterParams = BTreeMap<String, String>;

/// The value of a single named constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Single(String),
    List(Vec<String>),
}

impl FilterValue {
    /// Encodes the value the way the service expects it.
    pub fn encode(&self) -> String {
        match self {
            FilterValue::Single(s) => s.clone(),
            FilterValue::List(items) => items.join(","),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Single(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Single(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::List(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        FilterValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Named constraints restricting a catalog query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
    entries: BTreeMap<String, FilterValue>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the constraint `name`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.entries.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Converts a single dynamically-typed value for constraint `name`.
    ///
    /// Only strings and arrays of strings are accepted; numbers are not
    /// coerced.
    pub fn value_from_json(name: &str, value: Value) -> Result<FilterValue> {
        match value {
            Value::String(s) => Ok(FilterValue::Single(s)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(invalid_type(name, &other)),
                })
                .collect::<Result<Vec<_>>>()
                .map(FilterValue::List),
            other => Err(invalid_type(name, &other)),
        }
    }
}

fn invalid_type(name: &str, found: &Value) -> Error {
    Error::InvalidParameterType {
        name: name.to_string(),
        found: found.to_string(),
    }
}

impl TryFrom<Value> for Constraints {
    type Error = Error;

    /// Parses a JSON object such as `{"route": "Red", "type": ["0", "1"]}`.
    fn try_from(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(invalid_type("<root>", &value));
        };

        let mut constraints = Constraints::new();
        for (name, value) in map {
            let value = Constraints::value_from_json(&name, value)?;
            constraints = constraints.with(name, value);
        }
        Ok(constraints)
    }
}

/// Builds the `filter[<name>]` query parameters for `constraints`.
pub fn filter_params(constraints: &Constraints) -> FilterParams {
    constraints
        .iter()
        .map(|(name, value)| (format!("filter[{name}]"), value.encode()))
        .collect()
}
