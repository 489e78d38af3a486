//! # Attribute Bag Model
//!
//! Host document parsers attach free-form key/value annotations to fenced
//! code blocks (e.g. ```` ```elm {l=hidden v=(a b) context=foo} ````). This
//! module models that annotation map: [`AttrValue`] is the value union and
//! [`AttributeBag`] the insertion-ordered mapping.
//!
//! Iteration order matters: the deriver processes keys in the order the
//! parser produced them, and a later `literate=false` aborts derivation even
//! when an earlier key already marked the block as literate.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single attribute value as produced by the host parser.
///
/// The union mirrors what block annotations can carry: bare flags
/// (`Bool`), numbers, plain strings, and parenthesized string lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<String>),
}

impl AttrValue {
    /// Truthiness as the annotation language defines it: `false`, `0`, and
    /// the empty string are falsy; lists are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Bool(b) => *b,
            AttrValue::Number(n) => *n != 0.0,
            AttrValue::Str(s) => !s.is_empty(),
            AttrValue::List(_) => true,
        }
    }
}

/// String coercion used when an attribute value lands in a string-typed
/// slot (context names, expression names). Lists join with commas.
impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Number(n) => write!(f, "{}", n),
            AttrValue::Str(s) => write!(f, "{}", s),
            AttrValue::List(items) => write!(f, "{}", items.join(",")),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Number(n as f64)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(items: Vec<String>) -> Self {
        AttrValue::List(items)
    }
}

impl From<Vec<&str>> for AttrValue {
    fn from(items: Vec<&str>) -> Self {
        AttrValue::List(items.into_iter().map(String::from).collect())
    }
}

/// An insertion-ordered attribute map for one code block.
///
/// Keys keep the order the host parser produced them in; re-setting an
/// existing key updates its value in place without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeBag {
    entries: Vec<(String, AttrValue)>,
}

/// Shorthand spellings and the canonical keys they stand for.
const KEY_ALIASES: &[(&str, &str)] = &[
    ("l", "literate"),
    ("v", "visualize"),
    ("r", "raw"),
    ("j", "json"),
    ("s", "siding"),
];

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`. An existing key is updated in place, keeping
    /// its original position; a new key is appended.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite shorthand keys (`l`, `v`, `r`, `j`, `s`) to their canonical
    /// spellings, in place. Positions are untouched, so iteration order is
    /// preserved. A bag carrying both a shorthand and its canonical key ends
    /// up with two entries under the canonical name; both are processed.
    pub fn normalize_aliases(&mut self) {
        for (key, _) in self.entries.iter_mut() {
            if let Some((_, canonical)) = KEY_ALIASES.iter().find(|(alias, _)| alias == key) {
                *key = (*canonical).to_string();
            }
        }
    }
}

impl Serialize for AttributeBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct BagVisitor;

impl<'de> Visitor<'de> for BagVisitor {
    type Value = AttributeBag;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of attribute names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, AttrValue>()? {
            entries.push((key, value));
        }
        Ok(AttributeBag { entries })
    }
}

impl<'de> Deserialize<'de> for AttributeBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BagVisitor)
    }
}
