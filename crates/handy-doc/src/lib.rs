//! # handy-doc
//!
//! Key-indifferent nested documents with attribute-style accessors,
//! non-destructive deep patching and a fluent change-set builder.
//!
//! ## Quick start
//!
//! ```rust
//! use handy_doc::{Document, Value};
//! use serde_json::json;
//!
//! let doc = Document::try_from(json!({
//!     "host": "h",
//!     "lib": {"opts": {"flag": 7}}
//! }))
//! .unwrap();
//!
//! // Optional chaining never fails on missing keys.
//! assert!(doc.attr("missing").unwrap().attr("deeper").unwrap().is_nil());
//!
//! // Required access fails loudly.
//! assert!(doc.attr("missing!").is_err());
//!
//! // Patching returns a new document and leaves the original alone.
//! let patched = doc.patch(&Document::try_from(json!({"lib": {"opts": {"flag": 9}}})).unwrap());
//! assert_eq!(patched["lib"]["opts"]["flag"], json!(9));
//! assert_eq!(doc["lib"]["opts"]["flag"], json!(7));
//! assert_eq!(handy_doc::resolve_path(&doc, "lib.opts.flag!", None).unwrap(), &Value::from(7));
//! ```
//!
//! ## Modules
//!
//! - [`document`]: the indifferent-key node, freezing, the Nil-document
//! - [`value`]: the value variants and wrap-on-write conversions
//! - [`key`]: key normalization (`&str`, `String`, [`Symbol`])
//! - [`accessor`]: `name`, `name!`, `_name_` and default-argument resolution
//! - [`patch`]: recursive merge and left-fold of change sets
//! - [`builder`]: fluent change-set construction
//! - [`error`]: error types

pub mod accessor;
pub mod builder;
pub mod document;
pub mod error;
pub mod key;
pub mod patch;
pub mod value;

pub use accessor::{resolve_path, Accessor};
pub use builder::Builder;
pub use document::Document;
pub use error::{DocError, Result};
pub use key::{AsKey, Symbol};
pub use patch::{apply, merge};
pub use value::{Opaque, Value};
