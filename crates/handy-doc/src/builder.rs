//! Fluent construction of change sets.
//!
//! A [`Builder`] records leaves and nested builders by name and materializes
//! them into a [`Document`] with [`Builder::data`]. Within one builder the
//! last write to a name wins; combining happens only when the result is used
//! as a patch.
//!
//! ```
//! use handy_doc::Builder;
//! use serde_json::json;
//!
//! let changes = Builder::build(|b| {
//!     b.scope("some_lib", |lib| {
//!         lib.child("init_opts").set("flags", 123);
//!     });
//!     b.set("foo", "bar");
//! })
//! .unwrap();
//! assert_eq!(changes.to_json().unwrap(), json!({"some_lib": {"init_opts": {"flags": 123}}, "foo": "bar"}));
//! ```

use crate::accessor::unescape;
use crate::document::Document;
use crate::error::{DocError, Result};
use crate::value::Value;
use std::collections::BTreeMap;

/// Records a nested change set through chained calls.
///
/// A name lives in at most one of `leaves` and `nested`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Builder {
    leaves: BTreeMap<String, Value>,
    nested: BTreeMap<String, Builder>,
    /// First malformed name seen, with the reason; reported by `data`.
    invalid: Option<(String, String)>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against a fresh builder and materialize the result.
    pub fn build<F>(f: F) -> Result<Document>
    where
        F: FnOnce(&mut Builder),
    {
        let mut builder = Builder::new();
        f(&mut builder);
        builder.data()
    }

    /// Record a leaf value at `name`.
    pub fn set<V: Into<Value>>(&mut self, name: &str, value: V) -> &mut Self {
        let key = self.key_for(name);
        self.nested.remove(&key);
        self.leaves.insert(key, value.into());
        self
    }

    /// Open a sub-builder at `name`, fill it with `f`, and record it.
    /// Replaces whatever was recorded at `name` before.
    pub fn scope<F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        let key = self.key_for(name);
        let mut nested = Builder::new();
        f(&mut nested);
        self.leaves.remove(&key);
        self.nested.insert(key, nested);
        self
    }

    /// Open an empty sub-builder at `name` and return it, for chained
    /// `a.b.c value` style paths. Replaces whatever was recorded at `name`.
    pub fn child(&mut self, name: &str) -> &mut Builder {
        let key = self.key_for(name);
        self.leaves.remove(&key);
        let slot = self.nested.entry(key).or_default();
        *slot = Builder::new();
        slot
    }

    pub fn len(&self) -> usize {
        self.leaves.len() + self.nested.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty() && self.nested.is_empty()
    }

    /// Materialize this builder and every nested builder into a document.
    pub fn data(&self) -> Result<Document> {
        if let Some((name, reason)) = &self.invalid {
            return Err(DocError::no_method(name.clone(), reason.clone()));
        }
        let mut doc = Document::new();
        for (key, value) in &self.leaves {
            doc.insert_unchecked(key.clone(), value.clone());
        }
        for (key, nested) in &self.nested {
            doc.insert_unchecked(key.clone(), Value::Document(nested.data()?));
        }
        Ok(doc)
    }

    fn key_for(&mut self, name: &str) -> String {
        if self.invalid.is_none() {
            if name.is_empty() {
                self.invalid = Some((name.to_string(), "empty builder name".to_string()));
            } else if name.ends_with('=') {
                self.invalid = Some((
                    name.to_string(),
                    "assignment is not supported through builders".to_string(),
                ));
            }
        }
        unescape(name).to_string()
    }
}
