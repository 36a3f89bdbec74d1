pub mod basket;
pub mod cards;
pub mod catalog;
pub mod orders;
pub mod stores;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Product lookup code, the catalog's item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Plu(i64);

impl Plu {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn inner(&self) -> i64 {
        self.0
    }
}

impl From<i64> for Plu {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Plu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Plu {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for Plu {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        num::i64_flex(deserializer).map(Plu)
    }
}

/// Numeric fields the backend serves interchangeably as numbers or
/// strings. Coercion happens at the decode layer so the domain records
/// only ever hold the declared types.
pub(crate) mod num {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    fn as_f64<E: serde::de::Error>(raw: Raw) -> Result<f64, E> {
        match raw {
            Raw::Int(v) => Ok(v as f64),
            Raw::Float(v) => Ok(v),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid numeric string {s:?}"))),
        }
    }

    fn as_i64<E: serde::de::Error>(raw: Raw) -> Result<i64, E> {
        match raw {
            Raw::Int(v) => Ok(v),
            Raw::Float(v) => Err(E::custom(format!("expected an integer, got {v}"))),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid integer string {s:?}"))),
        }
    }

    pub fn f64_flex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        as_f64(Raw::deserialize(deserializer)?)
    }

    pub fn i64_flex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        as_i64(Raw::deserialize(deserializer)?)
    }

    pub fn opt_f64_flex<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(raw) => as_f64(raw).map(Some),
        }
    }

    pub fn opt_i64_flex<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(raw) => as_i64(raw).map(Some),
        }
    }

    /// Identifiers the backend serves as either strings or numbers.
    pub fn string_flex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Ok(s),
            Raw::Int(v) => Ok(v.to_string()),
            Raw::Float(v) => Ok(v.to_string()),
        }
    }
}
