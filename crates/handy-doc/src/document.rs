//! The key-indifferent document node.
//!
//! A [`Document`] maps normalized string keys to [`Value`]s. Every mutation
//! goes through [`Document::set`], [`Document::remove`] or
//! [`Document::get_mut`]; all three refuse to touch a frozen document, and
//! since a frozen document hands out no mutable references, nothing it holds
//! (nested documents, strings, arrays) can change after [`Document::freeze`].

use crate::error::{DocError, Result};
use crate::key::AsKey;
use crate::value::Value;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{btree_map, BTreeMap, HashMap};
use std::fmt;
use std::ops::Index;
use std::sync::LazyLock;
use tracing::{debug, trace};

static NIL: LazyLock<Document> = LazyLock::new(|| Document {
    entries: BTreeMap::new(),
    frozen: true,
    absent: true,
});

static NIL_VALUE: LazyLock<Value> = LazyLock::new(|| Value::Document(NIL.clone()));

static NULL: Value = Value::Null;

pub(crate) fn nil_value() -> &'static Value {
    &NIL_VALUE
}

/// An indifferent-key nested mapping.
#[derive(Clone, Default)]
pub struct Document {
    entries: BTreeMap<String, Value>,
    frozen: bool,
    /// Set only on the Nil-document; survives cloning.
    absent: bool,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared, frozen, empty Nil-document that stands for "no value".
    pub fn nil() -> &'static Document {
        &NIL
    }

    /// True for the Nil-document and copies of it.
    pub fn is_nil(&self) -> bool {
        self.absent
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Look up a key. Never wraps anything: values were wrapped when stored.
    pub fn get<K: AsKey>(&self, key: K) -> Option<&Value> {
        self.entries.get(key.as_key())
    }

    pub fn contains_key<K: AsKey>(&self, key: K) -> bool {
        self.entries.contains_key(key.as_key())
    }

    /// Store `value` under the normalized `key`, returning the previous value.
    pub fn set<K: AsKey, V: Into<Value>>(&mut self, key: K, value: V) -> Result<Option<Value>> {
        let key = key.as_key();
        self.ensure_mutable(key)?;
        Ok(self.entries.insert(key.to_string(), value.into()))
    }

    pub fn remove<K: AsKey>(&mut self, key: K) -> Result<Option<Value>> {
        let key = key.as_key();
        self.ensure_mutable(key)?;
        Ok(self.entries.remove(key))
    }

    /// Mutable access to a stored value; refused on frozen documents.
    pub fn get_mut<K: AsKey>(&mut self, key: K) -> Result<Option<&mut Value>> {
        let key = key.as_key();
        self.ensure_mutable(key)?;
        Ok(self.entries.get_mut(key))
    }

    /// Freeze this document and everything it holds. Irreversible.
    pub fn freeze(&mut self) {
        if self.frozen {
            return;
        }
        self.frozen = true;
        self.entries.values_mut().for_each(Value::freeze);
        trace!(keys = self.entries.len(), "froze document");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Parse a JSON object into a document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Document::try_from(value)
    }

    /// Convert into a `serde_json::Value`. Fails if an opaque value is held.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(DocError::from)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let out = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(out)
    }

    /// Insert without the frozen check, for documents under construction.
    pub(crate) fn insert_unchecked(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    /// Fresh deep copy, unfrozen at every depth and never tagged absent.
    pub(crate) fn thawed(&self) -> Document {
        Document {
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.thawed()))
                .collect(),
            frozen: false,
            absent: false,
        }
    }

    fn ensure_mutable(&self, key: &str) -> Result<()> {
        if self.frozen {
            debug!(key, "rejected write to frozen document");
            return Err(DocError::Frozen {
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

/// Iterator over `(key, value)` pairs of a document.
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, Value>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: AsKey, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (key, value) in iter {
            doc.insert_unchecked(key.as_key().to_string(), value.into());
        }
        doc
    }
}

/// Missing keys index to `Null`, like `serde_json::Value`.
impl<K: AsKey> Index<K> for Document {
    type Output = Value;

    fn index(&self, key: K) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl<K: AsKey> Index<K> for Value {
    type Output = Value;

    fn index(&self, key: K) -> &Value {
        match self {
            Value::Document(doc) => &doc[key],
            _ => &NULL,
        }
    }
}

/// Structural equality over entries; frozen state is not compared.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl PartialEq<serde_json::Value> for Document {
    fn eq(&self, other: &serde_json::Value) -> bool {
        match other {
            serde_json::Value::Object(map) => {
                self.len() == map.len()
                    && map
                        .iter()
                        .all(|(k, v)| self.get(k.as_str()).is_some_and(|mine| mine == v))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absent {
            return f.write_str("Nil");
        }
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Document {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: AsKey, V: Into<Value>> From<BTreeMap<K, V>> for Document {
    fn from(map: BTreeMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: AsKey, V: Into<Value>> From<HashMap<K, V>> for Document {
    fn from(map: HashMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl TryFrom<serde_json::Value> for Document {
    type Error = DocError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(map) => Ok(Document::from(map)),
            other => Err(DocError::NotAMapping {
                found: Value::from(other).type_name(),
            }),
        }
    }
}

impl TryFrom<Value> for Document {
    type Error = DocError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Document(doc) => Ok(doc),
            other => Err(DocError::NotAMapping {
                found: other.type_name(),
            }),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de::Error as _;
        let json = serde_json::Value::deserialize(deserializer)?;
        Document::try_from(json).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Symbol;
    use serde_json::json;

    fn sample() -> Document {
        Document::try_from(json!({
            "host": "h",
            "lib": {"opts": {"flag": 7}, "list": ["a", "b"]}
        }))
        .unwrap()
    }

    #[test]
    fn string_and_symbol_keys_are_indifferent() {
        let mut doc = Document::new();
        doc.set(Symbol::new("x"), 1).unwrap();
        assert_eq!(doc.get("x"), Some(&Value::from(1)));
        doc.set("x", 2).unwrap();
        assert_eq!(doc.get(Symbol::new("x")), Some(&Value::from(2)));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn set_wraps_nested_mappings() {
        let mut doc = Document::new();
        doc.set("lib", json!({"opts": {"flag": 1}})).unwrap();
        assert!(doc["lib"].is_document());
        assert!(doc["lib"]["opts"].is_document());
    }

    #[test]
    fn index_on_missing_key_is_null() {
        let doc = sample();
        assert!(doc["nope"].is_null());
        assert!(doc["host"]["deeper"].is_null());
    }

    #[test]
    fn freeze_blocks_writes_at_every_depth() {
        let mut doc = sample();
        doc.freeze();
        assert!(matches!(doc.set("host", "x"), Err(DocError::Frozen { .. })));
        assert!(matches!(doc.remove("host"), Err(DocError::Frozen { .. })));
        assert!(doc.get_mut("lib").is_err());
        let lib = doc["lib"].as_document().unwrap();
        assert!(lib.is_frozen());
        assert!(lib["opts"].as_document().unwrap().is_frozen());
        assert_eq!(doc["host"], json!("h"));
    }

    #[test]
    fn freeze_is_idempotent() {
        let mut doc = sample();
        doc.freeze();
        doc.freeze();
        assert!(doc.is_frozen());
    }

    #[test]
    fn nil_document_is_frozen_and_empty() {
        let nil = Document::nil();
        assert!(nil.is_nil());
        assert!(nil.is_frozen());
        assert!(nil.is_empty());
        assert!(std::ptr::eq(nil, Document::nil()));
    }

    #[test]
    fn nil_value_wraps_a_frozen_nil_document() {
        let value = Value::nil();
        assert!(value.is_nil());
        assert!(std::ptr::eq(value, Value::nil()));
        let doc = value.as_document().unwrap();
        assert!(doc.is_frozen());
        assert!(doc.is_empty());
        assert_eq!(doc, Document::nil());
    }

    #[test]
    fn thawed_copy_is_unfrozen_and_equal() {
        let mut doc = sample();
        doc.freeze();
        let copy = doc.thawed();
        assert_eq!(copy, doc);
        assert!(!copy.is_frozen());
        assert!(!copy["lib"].as_document().unwrap().is_frozen());
    }

    #[test]
    fn non_object_json_is_not_a_document() {
        let err = Document::try_from(json!([1, 2])).unwrap_err();
        assert!(matches!(err, DocError::NotAMapping { found: "array" }));
    }

    #[test]
    fn json_roundtrip() {
        let doc = sample();
        let text = doc.to_json_string(false).unwrap();
        assert_eq!(Document::from_json_str(&text).unwrap(), doc);
    }
}
