//! The decode side: tagged plain JSON back to rich leaves.
//!
//! [`Decoder`] implements [`LeafCodec`] for the return trip. Only string
//! leaves are candidates: a string carrying a reserved tag prefix is
//! stripped and its payload materialized; everything else passes through
//! unchanged.
//!
//! Decoding never aborts the structure for one bad leaf. A payload that will
//! not parse and a reference that will not resolve both degrade in place
//! (raw string substituted) with a diagnostic; only malformed top-level JSON
//! is a structural error.

use crate::diag::{DiagnosticKind, Diagnostics};
use crate::resolve::{SymbolKind, SymbolResolver};
use crate::walk::{transform, LeafCodec};
use crate::{json, literal, Diagnostic, Dtype, Result, Scalar, Tag, Value};
use num_bigint::BigInt;

/// Decodes tag-carrying plain JSON into rich values.
///
/// Reference payloads resolve through the injected [`SymbolResolver`]; an
/// empty [`SymbolTable`](crate::SymbolTable) gives the fully degraded
/// behavior where every reference comes back as its raw dotted path.
///
/// # Examples
///
/// ```rust
/// use tagson::{Decoder, Scalar, SymbolTable, Value};
///
/// let table = SymbolTable::new();
/// let mut decoder = Decoder::new(&table);
/// let value = decoder.decode_str(r#""__int__(5)""#).unwrap();
/// assert_eq!(value, Value::Scalar(Scalar::I64(5)));
/// ```
pub struct Decoder<'r> {
    resolver: &'r dyn SymbolResolver,
    diagnostics: Diagnostics,
}

impl<'r> Decoder<'r> {
    #[must_use]
    pub fn new(resolver: &'r dyn SymbolResolver) -> Self {
        Decoder {
            resolver,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Decodes a plain value tree, reversing the tag grammar.
    pub fn decode(&mut self, value: &Value) -> Result<Value> {
        transform(value, self)
    }

    /// Parses JSON text and decodes it.
    ///
    /// # Errors
    ///
    /// Fails only when the text is not valid JSON.
    pub fn decode_str(&mut self, text: &str) -> Result<Value> {
        let plain = json::read(text)?;
        self.decode(&plain)
    }

    /// The diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Drains the recorded diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    fn decode_int(&mut self, raw: &str, payload: &str) -> Value {
        if let Ok(i) = payload.parse::<i64>() {
            return Value::Scalar(Scalar::I64(i));
        }
        if let Ok(u) = payload.parse::<u64>() {
            return Value::Scalar(Scalar::U64(u));
        }
        match payload.parse::<BigInt>() {
            Ok(b) => Value::Scalar(Scalar::Big(b)),
            Err(e) => self.malformed(raw, &format!("invalid integer payload: {}", e)),
        }
    }

    fn decode_float(&mut self, raw: &str, payload: &str) -> Value {
        match payload.parse::<f64>() {
            Ok(f) => Value::Scalar(Scalar::F64(f)),
            Err(e) => self.malformed(raw, &format!("invalid float payload: {}", e)),
        }
    }

    fn decode_tuple(&mut self, raw: &str, payload: &str) -> Value {
        match literal::parse_tuple(payload) {
            Ok(items) => Value::Tuple(items),
            Err(e) => self.malformed(raw, &e.to_string()),
        }
    }

    fn resolve(&mut self, kind: SymbolKind, path: &str) -> Value {
        if let Some(resolved) = self.resolver.resolve(kind, path) {
            return resolved;
        }
        // a bare __type__ payload may be a dtype name rather than a path
        if kind == SymbolKind::Type {
            if let Some(dtype) = Dtype::from_name(path) {
                return Value::Dtype(dtype);
            }
        }
        self.diagnostics.warn(
            DiagnosticKind::UnresolvedReference,
            path,
            "could not resolve reference, substituting raw path",
        );
        Value::String(path.to_string())
    }

    fn malformed(&mut self, raw: &str, message: &str) -> Value {
        self.diagnostics
            .warn(DiagnosticKind::MalformedPayload, raw, message);
        Value::String(raw.to_string())
    }
}

impl LeafCodec for Decoder<'_> {
    fn leaf(&mut self, value: &Value) -> Result<Value> {
        let Value::String(s) = value else {
            return Ok(value.clone());
        };
        let Some((tag, payload)) = Tag::strip(s) else {
            return Ok(value.clone());
        };
        Ok(match tag {
            Tag::Str => Value::String(payload.to_string()),
            Tag::Int => self.decode_int(s, payload),
            Tag::Float => self.decode_float(s, payload),
            Tag::Tuple => self.decode_tuple(s, payload),
            Tag::Type => self.resolve(SymbolKind::Type, payload),
            Tag::Function => self.resolve(SymbolKind::Function, payload),
            Tag::Module => self.resolve(SymbolKind::Module, payload),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SymbolRef, SymbolTable};

    fn decode_with(table: &SymbolTable, text: &str) -> (Value, usize) {
        let mut decoder = Decoder::new(table);
        let value = decoder.decode_str(text).unwrap();
        (value, decoder.diagnostics().len())
    }

    #[test]
    fn test_int_decodes_to_widest_lane() {
        let table = SymbolTable::new();
        let (value, warns) = decode_with(&table, r#""__int__(-42)""#);
        assert_eq!(value, Value::Scalar(Scalar::I64(-42)));
        assert_eq!(warns, 0);

        let (value, _) = decode_with(&table, r#""__int__(18446744073709551615)""#);
        assert_eq!(value, Value::Scalar(Scalar::U64(u64::MAX)));

        let (value, _) = decode_with(&table, r#""__int__(123456789012345678901234567890)""#);
        assert!(matches!(value, Value::Scalar(Scalar::Big(_))));
    }

    #[test]
    fn test_float_decode() {
        let table = SymbolTable::new();
        let (value, _) = decode_with(&table, r#""__float__(2.5)""#);
        assert_eq!(value, Value::Scalar(Scalar::F64(2.5)));
    }

    #[test]
    fn test_tuple_decode() {
        let table = SymbolTable::new();
        let (value, _) = decode_with(&table, r#""__tuple__((1, 2, 3))""#);
        assert_eq!(
            value,
            Value::Tuple(vec![Value::from(1), Value::from(2), Value::from(3)])
        );
    }

    #[test]
    fn test_escape_marker_stripped() {
        let table = SymbolTable::new();
        let (value, warns) = decode_with(&table, r#""__str__(__int__(5))""#);
        assert_eq!(value, Value::from("__int__(5)"));
        assert_eq!(warns, 0);
    }

    #[test]
    fn test_untagged_strings_pass_through() {
        let table = SymbolTable::new();
        let (value, warns) = decode_with(&table, r#""just text""#);
        assert_eq!(value, Value::from("just text"));
        assert_eq!(warns, 0);
    }

    #[test]
    fn test_registered_reference_resolves() {
        let mut table = SymbolTable::new();
        table.register_type("collections.OrderedDict");

        let (value, warns) = decode_with(&table, r#""__type__(collections.OrderedDict)""#);
        assert_eq!(
            value,
            Value::Type(SymbolRef::new("collections", "OrderedDict"))
        );
        assert_eq!(warns, 0);
    }

    #[test]
    fn test_unresolvable_reference_degrades() {
        let table = SymbolTable::new();
        let mut decoder = Decoder::new(&table);
        let value = decoder
            .decode_str(r#""__type__(nonexistent.module.Thing)""#)
            .unwrap();

        assert_eq!(value, Value::from("nonexistent.module.Thing"));
        assert!(decoder
            .diagnostics()
            .contains(DiagnosticKind::UnresolvedReference));
    }

    #[test]
    fn test_dtype_name_fallback() {
        let table = SymbolTable::new();
        let (value, warns) = decode_with(&table, r#""__type__(float32)""#);
        assert_eq!(value, Value::Dtype(Dtype::Float32));
        assert_eq!(warns, 0);
    }

    #[test]
    fn test_malformed_payload_fails_only_that_leaf() {
        let table = SymbolTable::new();
        let mut decoder = Decoder::new(&table);
        let value = decoder
            .decode_str(r#"["__int__(not a number)", 7]"#)
            .unwrap();

        assert_eq!(
            value,
            Value::Array(vec![
                Value::from("__int__(not a number)"),
                Value::from(7)
            ])
        );
        assert!(decoder
            .diagnostics()
            .contains(DiagnosticKind::MalformedPayload));
    }

    #[test]
    fn test_keys_decode_through_leaf_rule() {
        let table = SymbolTable::new();
        let (value, _) = decode_with(&table, r#"{"__int__(5)": "a"}"#);
        let obj = value.as_object().unwrap();
        assert_eq!(
            obj.get(&Value::Scalar(Scalar::I64(5))).and_then(|v| v.as_str()),
            Some("a")
        );
    }
}
