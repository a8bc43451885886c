//! Non-destructive structural patching.
//!
//! Merge semantics, applied key by key:
//! - key only on the left: copied
//! - key only on the right: copied
//! - key on both sides, both documents: merged recursively
//! - key on both sides, anything else: right wins (arrays are replaced, never
//!   concatenated)
//!
//! Neither operand is modified. The result is a fresh document that shares
//! nothing mutable with its inputs and is unfrozen at every depth, even when
//! the inputs were frozen.

use crate::builder::Builder;
use crate::document::Document;
use crate::error::Result;
use crate::value::Value;
use tracing::{debug, trace};

/// Merge `right` over `left` into a new document.
pub fn merge(left: &Document, right: &Document) -> Document {
    let mut result = Document::new();

    for (key, value) in left {
        let merged = match (value, right.get(key)) {
            (_, None) => value.thawed(),
            (Value::Document(l), Some(Value::Document(r))) => Value::Document(merge(l, r)),
            (_, Some(overlay)) => overlay.thawed(),
        };
        result.insert_unchecked(key.to_string(), merged);
    }

    for (key, value) in right {
        if !left.contains_key(key) {
            result.insert_unchecked(key.to_string(), value.thawed());
        }
    }

    trace!(
        left = left.len(),
        right = right.len(),
        merged = result.len(),
        "merged documents"
    );
    result
}

/// Fold change sets over `base` left to right: later change sets take
/// precedence on conflicting scalars.
pub fn apply<'c, I>(base: &Document, change_sets: I) -> Document
where
    I: IntoIterator<Item = &'c Document>,
{
    let mut applied = 0usize;
    let result = change_sets
        .into_iter()
        .fold(base.thawed(), |acc, changes| {
            applied += 1;
            merge(&acc, changes)
        });
    debug!(change_sets = applied, keys = result.len(), "patched document");
    result
}

impl Document {
    /// Merge a single change set into a copy of this document.
    pub fn patch(&self, changes: &Document) -> Document {
        apply(self, [changes])
    }

    /// Fold several change sets into a copy of this document.
    pub fn patch_all<'c, I>(&self, change_sets: I) -> Document
    where
        I: IntoIterator<Item = &'c Document>,
    {
        apply(self, change_sets)
    }

    /// Describe the change set with a [`Builder`] instead of a literal.
    ///
    /// ```
    /// use handy_doc::Document;
    /// use serde_json::json;
    ///
    /// let doc = Document::try_from(json!({"lib": {"path": "/lib", "opts": {"flags": 1}}})).unwrap();
    /// let patched = doc
    ///     .patch_with(|b| {
    ///         b.child("lib").child("opts").set("flags", 123);
    ///     })
    ///     .unwrap();
    /// assert_eq!(patched["lib"]["opts"]["flags"], json!(123));
    /// assert_eq!(patched["lib"]["path"], json!("/lib"));
    /// ```
    pub fn patch_with<F>(&self, build: F) -> Result<Document>
    where
        F: FnOnce(&mut Builder),
    {
        let changes = Builder::build(build)?;
        Ok(apply(self, [&changes]))
    }

    /// Apply a literal change set, then a builder-described one.
    pub fn patch_both<F>(&self, literal: &Document, build: F) -> Result<Document>
    where
        F: FnOnce(&mut Builder),
    {
        let changes = Builder::build(build)?;
        Ok(apply(self, [literal, &changes]))
    }
}
