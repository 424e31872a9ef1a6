//! HUML (Human-oriented Markup Language) parser and encoder.
//!
//! HUML is an indentation-sensitive configuration format with strict
//! whitespace rules, typed scalars, inline and multiline collections, and
//! raw or trimmed multiline string blocks.
//!
//! # Decoding
//!
//! The decoder is a single recursive-descent pass over a shared scanner:
//!
//! 1. **Scanner**: a byte cursor with line tracking, bounds-checked lookahead
//!    and the whitespace rules every line must satisfy.
//!
//! 2. **Structure Parser**: decides the root shape, then walks multiline and
//!    inline dicts and lists by indentation.
//!
//! 3. **Value Parser**: strings, string blocks, numbers and keywords.
//!
//! The first violation aborts decoding with the offending line number.
//!
//! # Encoding
//!
//! [`stringify`] writes a [`Value`] tree in canonical form; [`encode`] does
//! the same for any `serde::Serialize` type.
//!
//! ```
//! use libhuml::{decode, stringify, EncodeOptions};
//!
//! let value = decode("name: \"huml\"\nports:: 80, 443").unwrap();
//! assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("huml"));
//!
//! let text = stringify(&value, &EncodeOptions::new());
//! assert_eq!(text, "name: \"huml\"\nports::\n  - 80\n  - 443\n");
//! ```

mod encode;
mod error;
mod lexical;
mod options;
mod parser;
mod scalar;
mod scanner;
mod ser;
mod value;

pub use encode::{encode, stringify};
pub use error::{Error, ErrorKind, Result};
pub use lexical::SUPPORTED_VERSION;
pub use options::EncodeOptions;
pub use parser::Document;
pub use ser::{to_value, ValueSerializer};
pub use value::{Dict, Value};

/// Decode a HUML document into its root value.
///
/// # Example
///
/// ```
/// use libhuml::{decode, Value};
///
/// assert_eq!(decode("0x1F").unwrap(), Value::from(31i64));
/// assert!(decode("key:  value").is_err());
/// ```
pub fn decode(input: &str) -> Result<Value> {
    decode_document(input).map(|doc| doc.root)
}

/// Decode a HUML document, keeping the version from its `%HUML` header.
pub fn decode_document(input: &str) -> Result<Document> {
    parser::parse_document(input)
}
