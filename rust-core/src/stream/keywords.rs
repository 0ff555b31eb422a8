//! Typed keyword tags carried alongside a stream

use std::fmt;

/// Channel-level RF reference frequency keyword
pub const CHAN_RF: &str = "CHAN_RF";

/// Collection-level RF reference frequency keyword
pub const COL_RF: &str = "COL_RF";

/// Keyword value, keeping the type it was declared with
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordValue {
    String(String),
    Float(f64),
    Int(i64),
    Bool(bool),
}

impl KeywordValue {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            KeywordValue::Float(v) => Some(*v),
            KeywordValue::Int(v) => Some(*v as f64),
            KeywordValue::String(s) => s.trim().parse().ok(),
            KeywordValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for KeywordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeywordValue::String(v) => write!(f, "{}", v),
            KeywordValue::Float(v) => write!(f, "{}", v),
            KeywordValue::Int(v) => write!(f, "{}", v),
            KeywordValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for KeywordValue {
    fn from(v: &str) -> Self {
        KeywordValue::String(v.to_string())
    }
}

impl From<String> for KeywordValue {
    fn from(v: String) -> Self {
        KeywordValue::String(v)
    }
}

impl From<f64> for KeywordValue {
    fn from(v: f64) -> Self {
        KeywordValue::Float(v)
    }
}

impl From<i64> for KeywordValue {
    fn from(v: i64) -> Self {
        KeywordValue::Int(v)
    }
}

impl From<bool> for KeywordValue {
    fn from(v: bool) -> Self {
        KeywordValue::Bool(v)
    }
}

/// One named keyword
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub id: String,
    pub value: KeywordValue,
}

/// Ordered keyword set, unique by id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Keywords {
    entries: Vec<Keyword>,
}

impl Keywords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, id: &str, value: impl Into<KeywordValue>) -> Self {
        self.insert(id, value);
        self
    }

    /// Insert or replace; a replaced keyword keeps its position.
    /// Returns true when the set changed.
    pub fn insert(&mut self, id: &str, value: impl Into<KeywordValue>) -> bool {
        let value = value.into();
        match self.entries.iter_mut().find(|k| k.id == id) {
            Some(existing) if existing.value == value => false,
            Some(existing) => {
                existing.value = value;
                true
            }
            None => {
                self.entries.push(Keyword {
                    id: id.to_string(),
                    value,
                });
                true
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&KeywordValue> {
        self.entries.iter().find(|k| k.id == id).map(|k| &k.value)
    }

    pub fn remove(&mut self, id: &str) -> Option<KeywordValue> {
        let pos = self.entries.iter().position(|k| k.id == id)?;
        Some(self.entries.remove(pos).value)
    }

    /// RF reference frequency: CHAN_RF wins over COL_RF
    pub fn reference_frequency(&self) -> Option<f64> {
        self.get(CHAN_RF)
            .and_then(KeywordValue::as_f64)
            .or_else(|| self.get(COL_RF).and_then(KeywordValue::as_f64))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>, V: Into<KeywordValue>> FromIterator<(S, V)> for Keywords {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut keywords = Keywords::new();
        for (id, value) in iter {
            keywords.insert(id.as_ref(), value);
        }
        keywords
    }
}
