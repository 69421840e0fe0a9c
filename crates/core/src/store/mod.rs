//! Section-scoped key/value store with canonical INI-like text.
//!
//! Every value is stored as text. The typed accessors (`get_as_int`,
//! `get_as_vector2`, ...) are read projections over that text and never fail:
//! a malformed field reads as the type's zero value so one corrupted entry
//! cannot block reading the rest of the store.
//!
//! Sections and keys keep their insertion order for serialization, but order
//! does not take part in equality.

mod parser;
mod vector;

use std::collections::HashMap;

use tracing::debug;

use crate::errors::{ParseError, StoreError};

pub use vector::{Vector2, Vector4};

/// Canonical boolean spellings written by [`KeyValueStore::set_bool`].
pub const TRUE_TEXT: &str = "True";
pub const FALSE_TEXT: &str = "False";

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// One named group of keys.
#[derive(Debug, Clone)]
struct Section {
    name: String,
    /// Keys in insertion order.
    keys: Vec<String>,
    values: HashMap<String, String>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            keys: Vec::new(),
            values: HashMap::new(),
        }
    }

    fn set(&mut self, key: &str, value: String) {
        match self.values.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                self.keys.push(key.to_string());
                self.values.insert(key.to_string(), value);
            }
        }
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        let value = self.values.remove(key)?;
        self.keys.retain(|k| k != key);
        Some(value)
    }

    fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys
            .iter()
            .filter_map(|k| self.values.get(k).map(|v| (k.as_str(), v.as_str())))
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// A mapping from `(section, key)` to a text value, grouped by section.
///
/// Any key, section name or value written through [`set`](Self::set)
/// round-trips through [`serialize`](Self::serialize) and
/// [`parse`](Self::parse); names that clash with the text grammar are escaped.
#[derive(Debug, Clone, Default)]
pub struct KeyValueStore {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl KeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse canonical text into a fresh store.
    ///
    /// Never touches an existing store: callers compare or merge the result
    /// themselves.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parser::parse(text)
    }

    /// Render the store as canonical text.
    ///
    /// The same store state always yields byte-identical output.
    pub fn serialize(&self) -> String {
        parser::serialize(self)
    }

    // -----------------------------------------------------------------------
    // Raw access
    // -----------------------------------------------------------------------

    /// Look up the text value of `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Result<&str, StoreError> {
        self.section(section)
            .and_then(|s| s.values.get(key))
            .map(String::as_str)
            .ok_or_else(|| StoreError::MissingKey {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    /// Store `value` under `key`, creating the section if needed.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        let idx = self.ensure_section(section);
        self.sections[idx].set(key, value.into());
    }

    /// Create an empty section if it does not exist yet.
    pub fn add_section(&mut self, section: &str) {
        self.ensure_section(section);
    }

    /// Remove one key, returning its previous value.
    pub fn remove(&mut self, section: &str, key: &str) -> Option<String> {
        let idx = *self.index.get(section)?;
        self.sections[idx].remove(key)
    }

    /// Drop every key of `section` but keep the (now empty) section.
    pub fn clear_section(&mut self, section: &str) {
        if let Some(&idx) = self.index.get(section) {
            let s = &mut self.sections[idx];
            s.keys.clear();
            s.values.clear();
        }
    }

    /// Remove all sections and keys.
    pub fn clear(&mut self) {
        self.sections.clear();
        self.index.clear();
    }

    pub fn contains_section(&self, section: &str) -> bool {
        self.index.contains_key(section)
    }

    pub fn contains_key(&self, section: &str, key: &str) -> bool {
        self.section(section)
            .is_some_and(|s| s.values.contains_key(key))
    }

    /// Section names in insertion order.
    pub fn sections(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Key names of `section` in insertion order (empty if the section is absent).
    pub fn keys_in(&self, section: &str) -> Vec<&str> {
        self.section(section)
            .map(|s| s.keys.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every `(section, key, value)` triple in serialization order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.sections
            .iter()
            .flat_map(|s| s.entries().map(move |(k, v)| (s.name.as_str(), k, v)))
    }

    /// Number of `(section, key)` pairs.
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.keys.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -----------------------------------------------------------------------
    // Typed projections
    // -----------------------------------------------------------------------

    /// Read an integer; missing or malformed text reads as `0`.
    pub fn get_as_int(&self, section: &str, key: &str) -> i64 {
        self.decode(section, key, |text| text.trim().parse::<i64>().ok())
            .unwrap_or_default()
    }

    /// Read a float; missing, malformed or non-finite text reads as `0.0`.
    pub fn get_as_float(&self, section: &str, key: &str) -> f64 {
        self.decode(section, key, vector::decode_float)
            .unwrap_or_default()
    }

    /// Read a boolean: `true` only for a case-insensitive `True`.
    pub fn get_as_bool(&self, section: &str, key: &str) -> bool {
        self.decode(section, key, |text| {
            let text = text.trim();
            if text.eq_ignore_ascii_case(TRUE_TEXT) {
                Some(true)
            } else if text.eq_ignore_ascii_case(FALSE_TEXT) {
                Some(false)
            } else {
                None
            }
        })
        .unwrap_or_default()
    }

    /// Read a `( x , y )` tuple; anything else reads as the zero vector.
    pub fn get_as_vector2(&self, section: &str, key: &str) -> Vector2 {
        self.decode(section, key, Vector2::decode)
            .unwrap_or_default()
    }

    /// Read a `( x , y , z , w )` tuple; anything else reads as the zero vector.
    pub fn get_as_vector4(&self, section: &str, key: &str) -> Vector4 {
        self.decode(section, key, Vector4::decode)
            .unwrap_or_default()
    }

    pub fn set_int(&mut self, section: &str, key: &str, value: i64) {
        self.set(section, key, value.to_string());
    }

    pub fn set_float(&mut self, section: &str, key: &str, value: f64) {
        self.set(section, key, value.to_string());
    }

    pub fn set_bool(&mut self, section: &str, key: &str, value: bool) {
        self.set(section, key, if value { TRUE_TEXT } else { FALSE_TEXT });
    }

    pub fn set_vector2(&mut self, section: &str, key: &str, value: Vector2) {
        self.set(section, key, value.to_string());
    }

    pub fn set_vector4(&mut self, section: &str, key: &str, value: Vector4) {
        self.set(section, key, value.to_string());
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn section(&self, name: &str) -> Option<&Section> {
        self.index.get(name).map(|&idx| &self.sections[idx])
    }

    fn ensure_section(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.sections.len();
        self.sections.push(Section::new(name));
        self.index.insert(name.to_string(), idx);
        idx
    }

    fn decode<T>(&self, section: &str, key: &str, f: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        let text = match self.get(section, key) {
            Ok(text) => text,
            Err(e) => {
                debug!(error = %e, "typed read of missing key, using zero default");
                return None;
            }
        };
        let value = f(text);
        if value.is_none() {
            debug!(section, key, text, "malformed field, using zero default");
        }
        value
    }
}

/// Two stores are equal when every `(section, key)` in either maps to the
/// same text in both. Ordering and empty sections do not matter.
impl PartialEq for KeyValueStore {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(section, key, value)| other.get(section, key) == Ok(value))
    }
}

impl Eq for KeyValueStore {}
