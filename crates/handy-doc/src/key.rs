//! Key normalization.
//!
//! Every key stored in a [`Document`](crate::Document) is a plain `String`.
//! Callers may address keys with string slices, owned strings or
//! [`Symbol`]s; all of them normalize to the same stored form, so
//! `doc.get("host")` and `doc.get(Symbol::new("host"))` observe the same value.

use std::borrow::Cow;
use std::fmt;

/// An identifier-like key, the counterpart of a string key.
///
/// Symbols exist so call sites can express "this is a field name" rather
/// than arbitrary text; after normalization they are indistinguishable from
/// the equivalent string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Cow<'static, str>);

impl Symbol {
    pub const fn new(name: &'static str) -> Self {
        Symbol(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Symbol(Cow::Owned(name))
    }
}

impl From<&'static str> for Symbol {
    fn from(name: &'static str) -> Self {
        Symbol::new(name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

/// Anything usable as a document key.
pub trait AsKey {
    /// The normalized key.
    fn as_key(&self) -> &str;
}

impl AsKey for str {
    fn as_key(&self) -> &str {
        self
    }
}

impl AsKey for String {
    fn as_key(&self) -> &str {
        self.as_str()
    }
}

impl AsKey for Symbol {
    fn as_key(&self) -> &str {
        self.as_str()
    }
}

impl<K: AsKey + ?Sized> AsKey for &K {
    fn as_key(&self) -> &str {
        (**self).as_key()
    }
}
