//! Typed per-element settings.
//!
//! Every element carries an ordered list of `(key, value)` settings whose
//! meaning is defined by its element type. Absent keys are `None` through the
//! typed accessors; there are no empty-string or zero sentinels.

use serde::{Deserialize, Serialize};

/// A single typed setting scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Flag(bool),
}

impl SettingValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            SettingValue::Number(value) => Some(*value),
            SettingValue::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            SettingValue::Flag(value) => Some(*value),
            _ => None,
        }
    }
}

/// Ordered element settings with typed lookup.
///
/// Order is preserved because builders present settings in a fixed sequence;
/// lookup is by key, last write wins on duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementSettings {
    entries: Vec<(String, SettingValue)>,
}

impl ElementSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: SettingValue) {
        let key = key.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: SettingValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(SettingValue::as_text)
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(SettingValue::as_integer)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(SettingValue::as_number)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(SettingValue::as_flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Kind of value a setting key accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    Text,
    Integer,
    Number,
    Flag,
}

/// Declares one setting key an element type understands.
///
/// Used by builder UIs to render configuration controls; the engine itself
/// only consults it for documentation purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingDescriptor {
    pub key: &'static str,
    pub kind: SettingKind,
    pub label: &'static str,
}

impl SettingDescriptor {
    pub fn new(key: &'static str, kind: SettingKind, label: &'static str) -> Self {
        Self { key, kind, label }
    }
}
