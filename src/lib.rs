//! # tagson
//!
//! A type-preserving tagged-JSON codec.
//!
//! ## What is tagged JSON?
//!
//! JSON can carry strings, numbers, booleans, null, arrays, and
//! string-keyed objects, and nothing else. tagson extends that vocabulary
//! without leaving valid JSON: values whose native type is richer
//! (fixed-width numeric scalars, ordered-immutable tuples, references to
//! types, functions, and modules) are encoded as reserved tagged strings of
//! the form `__KIND__(PAYLOAD)` and reconstructed with their original type
//! on decode, not merely their numeric value. Non-string mapping keys are
//! tagged the same way, because JSON objects demand string keys.
//!
//! ## Key Features
//!
//! - **Round-trip-exact rich leaves**: scalars, tuples, and registered
//!   references decode back to their original type
//! - **Closed grammar**: user strings that happen to spell a tag are
//!   escaped with `__str__(..)`, so no plain string can be misread
//! - **Safe decoding**: reference payloads resolve through an injected
//!   [`SymbolResolver`] registry; nothing is imported or executed
//! - **Contained failures**: unresolvable references and malformed payloads
//!   degrade in place with structured [`Diagnostics`], never aborting the
//!   whole decode
//!
//! ## Quick Start
//!
//! ```rust
//! use tagson::{from_str, to_string, Scalar, Value};
//!
//! let value = Value::Tuple(vec![Value::from(1), Value::from(2)]);
//! let text = to_string(&value).unwrap();
//! assert_eq!(text, r#""__tuple__((1, 2))""#);
//!
//! let back = from_str(&text).unwrap();
//! assert_eq!(back, value);
//! assert!(back.is_tuple()); // a tuple, not an array
//! ```
//!
//! ### Mapping keys
//!
//! ```rust
//! use tagson::{from_str, tagson, to_string, Value};
//!
//! let record = tagson!({5: "a", 2.5: "b"});
//! let text = to_string(&record).unwrap();
//! assert_eq!(text, r#"{"__int__(5)":"a","__float__(2.5)":"b"}"#);
//!
//! let back = from_str(&text).unwrap();
//! let obj = back.as_object().unwrap();
//! // numeric keys again, not the strings "5"/"2.5"
//! assert_eq!(obj.get(&Value::from(5)).and_then(|v| v.as_str()), Some("a"));
//! ```
//!
//! ### References
//!
//! ```rust
//! use tagson::{from_str_with_resolver, to_string, SymbolRef, SymbolTable, Value};
//!
//! let ty = Value::Type(SymbolRef::new("collections", "OrderedDict"));
//! let text = to_string(&ty).unwrap();
//!
//! let mut table = SymbolTable::new();
//! table.register_type("collections.OrderedDict");
//! assert_eq!(from_str_with_resolver(&text, &table).unwrap(), ty);
//! ```
//!
//! ## What is deliberately lossy
//!
//! A [`Buffer`] (homogeneous numeric array) converts to nested plain arrays;
//! its dtype and shape are discarded and decode returns nested arrays, not a
//! buffer. Tuple payloads carry the tuple's printed literal form, so tuples
//! of plain scalars round-trip but tuples holding references do not. Both
//! are properties of the format, not bugs.

pub mod buffer;
pub mod decode;
pub mod diag;
pub mod encode;
pub mod error;
mod json;
pub mod literal;
pub mod macros;
pub mod map;
pub mod resolve;
pub mod tag;
pub mod value;
pub mod walk;

pub mod handler;

pub use buffer::{Buffer, BufferData, Dtype};
pub use decode::Decoder;
pub use diag::{Diagnostic, DiagnosticKind, Diagnostics};
pub use encode::{EncodeOptions, Encoder};
pub use error::{Error, Result};
pub use handler::{Frequencies, FrequencyGate, Mode, VisBackend, VisHandler};
pub use map::TagMap;
pub use resolve::{SymbolKind, SymbolResolver, SymbolTable};
pub use tag::Tag;
pub use value::{Number, Opaque, Scalar, SymbolRef, Value};
pub use walk::{transform, LeafCodec};

use std::io;

/// Encodes a value to tagged-JSON text with default options.
///
/// Diagnostics from degraded encodings are logged but not returned; use an
/// [`Encoder`] directly to observe them.
///
/// # Examples
///
/// ```rust
/// use tagson::{to_string, Scalar, Value};
///
/// let text = to_string(&Value::Scalar(Scalar::I32(5))).unwrap();
/// assert_eq!(text, r#""__int__(5)""#);
/// ```
///
/// # Errors
///
/// Returns an error for mapping keys with no string encoding and for
/// non-finite floats.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(value: &Value) -> Result<String> {
    to_string_with_options(value, EncodeOptions::new())
}

/// Encodes a value to pretty-printed tagged-JSON text.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty(value: &Value) -> Result<String> {
    to_string_with_options(value, EncodeOptions::pretty())
}

/// Encodes a value to tagged-JSON text with custom options.
///
/// # Examples
///
/// ```rust
/// use tagson::{to_string_with_options, EncodeOptions, Value};
///
/// let options = EncodeOptions::new().with_strict(true);
/// let text = to_string_with_options(&Value::from(1), options).unwrap();
/// assert_eq!(text, "1");
/// ```
///
/// # Errors
///
/// In addition to the default-mode failures, strict options turn any leaf
/// with no encode rule into an error instead of a degraded string.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(value: &Value, options: EncodeOptions) -> Result<String> {
    Encoder::new(options).encode_to_string(value)
}

/// Encodes a value to a writer as tagged-JSON text.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, value: &Value) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, value, EncodeOptions::new())
}

/// Encodes a value to a writer with custom options.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W>(mut writer: W, value: &Value, options: EncodeOptions) -> Result<()>
where
    W: io::Write,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Decodes tagged-JSON text with an empty symbol table.
///
/// Every reference payload degrades to its raw dotted path (with a logged
/// diagnostic); use [`from_str_with_resolver`] to resolve references, or a
/// [`Decoder`] directly to observe diagnostics.
///
/// # Examples
///
/// ```rust
/// use tagson::{from_str, Scalar, Value};
///
/// let value = from_str(r#""__float__(2.5)""#).unwrap();
/// assert_eq!(value, Value::Scalar(Scalar::F64(2.5)));
/// ```
///
/// # Errors
///
/// Returns an error only when the text is not valid JSON.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Value> {
    let table = SymbolTable::new();
    from_str_with_resolver(s, &table)
}

/// Decodes tagged-JSON text, resolving references through `resolver`.
///
/// # Errors
///
/// Returns an error only when the text is not valid JSON; unresolvable
/// references degrade per leaf instead.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_resolver(s: &str, resolver: &dyn SymbolResolver) -> Result<Value> {
    Decoder::new(resolver).decode_str(s)
}

/// Decodes tagged-JSON text from an I/O reader.
///
/// # Errors
///
/// Returns an error if reading fails or the text is not valid JSON.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Value>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Decodes tagged-JSON text from bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or not valid JSON.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<Value> {
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}
