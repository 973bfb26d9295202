//! Typed field access over an untyped JSON object
//!
//! Every model goes through [`Fields`] so presence and type checks are
//! explicit per field and the first violation becomes one [`ParseError`].
//! `null` is treated as absent everywhere. Optional timestamps also treat
//! `""` and `0` as absent, and optional objects treat `{}` as absent.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::timestamp::parse_timestamp;

/// Models constructed from API JSON
pub trait FromJson: Sized {
    /// Entity name used in error messages
    const ENTITY: &'static str;

    fn from_json(value: &Value) -> Result<Self, ParseError>;

    /// Parse a JSON array of this entity, failing on the first bad element
    fn from_json_array(value: &Value) -> Result<Vec<Self>, ParseError> {
        value
            .as_array()
            .ok_or(ParseError::NotAnArray {
                entity: Self::ENTITY,
            })?
            .iter()
            .map(Self::from_json)
            .collect()
    }
}

pub(crate) struct Fields<'a> {
    entity: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub(crate) fn of(entity: &'static str, value: &'a Value) -> Result<Self, ParseError> {
        let map = value
            .as_object()
            .ok_or(ParseError::NotAnObject { entity })?;
        Ok(Self { entity, map })
    }

    fn get(&self, field: &'static str) -> Option<&'a Value> {
        self.map.get(field).filter(|v| !v.is_null())
    }

    fn require(&self, field: &'static str) -> Result<&'a Value, ParseError> {
        self.get(field).ok_or(ParseError::MissingField {
            entity: self.entity,
            field,
        })
    }

    fn wrong_type(&self, field: &'static str, expected: &'static str) -> ParseError {
        ParseError::InvalidType {
            entity: self.entity,
            field,
            expected,
        }
    }

    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> ParseError {
        ParseError::InvalidValue {
            entity: self.entity,
            field,
            reason: reason.into(),
        }
    }

    fn as_string(&self, field: &'static str, value: &Value) -> Result<String, ParseError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.wrong_type(field, "string"))
    }

    pub(crate) fn string(&self, field: &'static str) -> Result<String, ParseError> {
        let value = self.require(field)?;
        self.as_string(field, value)
    }

    pub(crate) fn opt_string(&self, field: &'static str) -> Result<Option<String>, ParseError> {
        self.get(field)
            .map(|v| self.as_string(field, v))
            .transpose()
    }

    pub(crate) fn bool(&self, field: &'static str) -> Result<bool, ParseError> {
        self.require(field)?
            .as_bool()
            .ok_or_else(|| self.wrong_type(field, "boolean"))
    }

    pub(crate) fn f64(&self, field: &'static str) -> Result<f64, ParseError> {
        self.require(field)?
            .as_f64()
            .ok_or_else(|| self.wrong_type(field, "number"))
    }

    /// Non-negative integer. Numeric strings are accepted since the API
    /// sometimes quotes micro-unit amounts.
    pub(crate) fn u64(&self, field: &'static str) -> Result<u64, ParseError> {
        match self.require(field)? {
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Ok(v)
                } else if n.as_i64().is_some() {
                    Err(self.invalid(field, format!("{} is negative", n)))
                } else {
                    Err(self.wrong_type(field, "integer"))
                }
            }
            Value::String(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|e| self.invalid(field, format!("{:?}: {}", s, e))),
            _ => Err(self.wrong_type(field, "integer")),
        }
    }

    pub(crate) fn timestamp(&self, field: &'static str) -> Result<DateTime<Utc>, ParseError> {
        parse_timestamp(self.require(field)?)
    }

    pub(crate) fn opt_timestamp(
        &self,
        field: &'static str,
    ) -> Result<Option<DateTime<Utc>>, ParseError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
            Some(v) => parse_timestamp(v).map(Some),
        }
    }

    pub(crate) fn string_list(&self, field: &'static str) -> Result<Vec<String>, ParseError> {
        let Some(value) = self.get(field) else {
            return Ok(Vec::new());
        };
        value
            .as_array()
            .ok_or_else(|| self.wrong_type(field, "array of strings"))?
            .iter()
            .map(|item| self.as_string(field, item))
            .collect()
    }

    /// Optional nested object
    pub(crate) fn opt_object<T: FromJson>(
        &self,
        field: &'static str,
    ) -> Result<Option<T>, ParseError> {
        self.get(field)
            .filter(|v| v.as_object().map_or(true, |m| !m.is_empty()))
            .map(T::from_json)
            .transpose()
    }

    /// Optional array of nested objects, empty when absent
    pub(crate) fn list<T: FromJson>(&self, field: &'static str) -> Result<Vec<T>, ParseError> {
        let Some(value) = self.get(field) else {
            return Ok(Vec::new());
        };
        value
            .as_array()
            .ok_or_else(|| self.wrong_type(field, "array"))?
            .iter()
            .map(T::from_json)
            .collect()
    }

    /// Required array of nested objects
    pub(crate) fn required_list<T: FromJson>(
        &self,
        field: &'static str,
    ) -> Result<Vec<T>, ParseError> {
        self.require(field)?;
        self.list(field)
    }

    /// Run a custom conversion on a required string field
    pub(crate) fn parsed<T>(
        &self,
        field: &'static str,
        convert: impl FnOnce(&str) -> Result<T, String>,
    ) -> Result<T, ParseError> {
        let raw = self.string(field)?;
        convert(&raw).map_err(|reason| self.invalid(field, reason))
    }
}
