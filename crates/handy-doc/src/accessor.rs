//! Attribute-style access over document keys.
//!
//! An accessor name is resolved purely through key lookup, never through the
//! methods of [`Document`] itself:
//!
//! - `name` returns the stored value, or the Nil-document when absent; a
//!   stored `null` counts as absent, a stored `false` does not
//! - `name!` is *required*: an absent value fails with [`DocError::ValueMissing`]
//! - `_name_` is the escaped form and looks up `name`; it reaches keys such as
//!   `methods` or `len` that share a name with a document operation
//! - a single default argument replaces the Nil-document (and suppresses the
//!   required failure)
//!
//! Because the Nil-document is itself a document, chains of optional accessors
//! never fail partway: `doc.attr("a")?.attr("b")?.attr("c")?` yields the
//! Nil-document when `a` is missing.

use crate::document::Document;
use crate::error::{DocError, Result};
use crate::value::Value;
use tracing::debug;

/// A parsed accessor name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accessor<'n> {
    name: &'n str,
    key: &'n str,
    required: bool,
}

impl<'n> Accessor<'n> {
    /// Parse a raw accessor name.
    ///
    /// Assignment-shaped names (`name=`) and empty names are not data
    /// accesses and fail with [`DocError::NoMethod`].
    pub fn parse(name: &'n str) -> Result<Self> {
        if name.ends_with('=') {
            return Err(DocError::no_method(
                name,
                "assignment is not supported through accessors",
            ));
        }
        let (base, required) = match name.strip_suffix('!') {
            Some(base) => (base, true),
            None => (name, false),
        };
        if base.is_empty() {
            return Err(DocError::no_method(name, "empty accessor name"));
        }
        Ok(Accessor {
            name,
            key: unescape(base),
            required,
        })
    }

    /// The name as written, including any `!` or escaping underscores.
    pub fn name(&self) -> &'n str {
        self.name
    }

    /// The key looked up in the document.
    pub fn key(&self) -> &'n str {
        self.key
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Strip one leading and one trailing underscore from `_name_`.
///
/// Names that are only underscores with nothing between (`_`, `__`) are left
/// untouched.
pub fn unescape(name: &str) -> &str {
    match name.strip_prefix('_').and_then(|s| s.strip_suffix('_')) {
        Some(inner) if !inner.is_empty() => inner,
        _ => name,
    }
}

impl Document {
    /// Resolve a parsed accessor: stored non-null value, else `default`,
    /// else a required failure, else the Nil-document.
    pub fn resolve<'a>(
        &'a self,
        accessor: &Accessor<'_>,
        default: Option<&'a Value>,
    ) -> Result<&'a Value> {
        match self.get(accessor.key()) {
            Some(value) if !value.is_nil() && !value.is_null() => Ok(value),
            _ => match default {
                Some(default) => Ok(default),
                None if accessor.is_required() => {
                    debug!(key = accessor.key(), "required value missing");
                    Err(DocError::ValueMissing {
                        key: accessor.key().to_string(),
                    })
                }
                None => Ok(Value::nil()),
            },
        }
    }

    /// `doc.name` / `doc.name!` / `doc._name_`.
    pub fn attr(&self, name: &str) -> Result<&Value> {
        self.resolve(&Accessor::parse(name)?, None)
    }

    /// `doc.name(default)`.
    pub fn attr_or<'a>(&'a self, name: &str, default: &'a Value) -> Result<&'a Value> {
        self.resolve(&Accessor::parse(name)?, Some(default))
    }

    /// Dynamic call shape: zero arguments reads, one argument is the default,
    /// anything more is not an accessor.
    pub fn call<'a>(&'a self, name: &str, args: &'a [Value]) -> Result<&'a Value> {
        match args {
            [] => self.attr(name),
            [default] => self.attr_or(name, default),
            _ => Err(DocError::no_method(
                name,
                format!("wrong number of arguments (given {}, expected 0..1)", args.len()),
            )),
        }
    }
}

impl Value {
    /// Resolve an accessor against this value. Only documents (including the
    /// Nil-document) have accessors.
    pub fn resolve<'a>(
        &'a self,
        accessor: &Accessor<'_>,
        default: Option<&'a Value>,
    ) -> Result<&'a Value> {
        match self {
            Value::Document(doc) => doc.resolve(accessor, default),
            other => Err(DocError::no_method(
                accessor.name(),
                format!("not defined on {}", other.type_name()),
            )),
        }
    }

    pub fn attr(&self, name: &str) -> Result<&Value> {
        self.resolve(&Accessor::parse(name)?, None)
    }

    pub fn attr_or<'a>(&'a self, name: &str, default: &'a Value) -> Result<&'a Value> {
        self.resolve(&Accessor::parse(name)?, Some(default))
    }

    pub fn call<'a>(&'a self, name: &str, args: &'a [Value]) -> Result<&'a Value> {
        match self {
            Value::Document(doc) => doc.call(name, args),
            other => Err(DocError::no_method(
                name,
                format!("not defined on {}", other.type_name()),
            )),
        }
    }
}

/// Resolve a dotted chain of accessors such as `some_lib.init_opts.flags!`.
///
/// Every segment follows the accessor rules; `default` applies to the last
/// segment only.
pub fn resolve_path<'a>(
    doc: &'a Document,
    path: &str,
    default: Option<&'a Value>,
) -> Result<&'a Value> {
    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, init)) = segments.split_last() else {
        return Err(DocError::no_method(path, "empty accessor path"));
    };

    let mut current: Option<&'a Value> = None;
    for segment in init {
        let accessor = Accessor::parse(segment)?;
        current = Some(match current {
            None => doc.resolve(&accessor, None)?,
            Some(value) => value.resolve(&accessor, None)?,
        });
    }

    let accessor = Accessor::parse(last)?;
    match current {
        None => doc.resolve(&accessor, default),
        Some(value) => value.resolve(&accessor, default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_name() {
        let acc = Accessor::parse("host").unwrap();
        assert_eq!(acc.key(), "host");
        assert!(!acc.is_required());
    }

    #[test]
    fn parse_required_name() {
        let acc = Accessor::parse("host!").unwrap();
        assert_eq!(acc.key(), "host");
        assert!(acc.is_required());
        assert_eq!(acc.name(), "host!");
    }

    #[test]
    fn parse_escaped_required_name() {
        let acc = Accessor::parse("_methods_!").unwrap();
        assert_eq!(acc.key(), "methods");
        assert!(acc.is_required());
    }

    #[test]
    fn unescape_rules() {
        assert_eq!(unescape("_methods_"), "methods");
        assert_eq!(unescape("_a_b_"), "a_b");
        assert_eq!(unescape("___"), "_");
        assert_eq!(unescape("__"), "__");
        assert_eq!(unescape("_"), "_");
        assert_eq!(unescape("_private"), "_private");
        assert_eq!(unescape("trailing_"), "trailing_");
    }

    #[test]
    fn assignment_shapes_are_rejected() {
        assert!(matches!(
            Accessor::parse("host="),
            Err(DocError::NoMethod { .. })
        ));
        assert!(matches!(Accessor::parse("!"), Err(DocError::NoMethod { .. })));
        assert!(matches!(Accessor::parse(""), Err(DocError::NoMethod { .. })));
    }
}
