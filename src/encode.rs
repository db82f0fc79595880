//! The encode side: rich leaves down to tagged plain JSON.
//!
//! [`Encoder`] implements [`LeafCodec`] over an explicit, ordered table of
//! named encode rules. The table *is* the precedence policy: rules are tried
//! top to bottom and the first match wins, so facts like "tuples are tagged
//! before numeric scalars" and "references are tagged before the pass-through
//! fallback" are data a test can assert, not an accident of match-arm order.
//!
//! When no rule matches (an [`Opaque`](crate::Opaque) leaf), the default
//! behavior degrades to the leaf's textual representation with a
//! [`DegradedEncoding`](crate::DiagnosticKind::DegradedEncoding) diagnostic;
//! under [`EncodeOptions::strict`] the same leaf aborts the encode instead.

use crate::diag::{DiagnosticKind, Diagnostics};
use crate::walk::{transform, LeafCodec};
use crate::{json, literal, Diagnostic, Error, Number, Result, Tag, Value};

/// Configuration for encoding.
///
/// # Examples
///
/// ```rust
/// use tagson::EncodeOptions;
///
/// let default = EncodeOptions::new();
/// assert!(!default.strict);
///
/// let strict = EncodeOptions::new().with_strict(true);
/// assert!(strict.strict);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EncodeOptions {
    /// When set, a leaf with no encode rule aborts the encode instead of
    /// degrading to its textual representation.
    pub strict: bool,
    /// When set, the JSON output is pretty-printed.
    pub pretty: bool,
}

impl EncodeOptions {
    /// Creates default options: non-strict, compact output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for pretty-printed output.
    #[must_use]
    pub fn pretty() -> Self {
        EncodeOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets strict mode.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets pretty-printing.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// A single encode rule: returns the encoded plain value when it applies.
pub(crate) type EncodeRule = fn(&Value) -> Option<Value>;

/// The encode policy, in priority order. First match wins.
pub(crate) const ENCODE_RULES: &[(&str, EncodeRule)] = &[
    ("type", rule_type),
    ("dtype", rule_dtype),
    ("function", rule_function),
    ("module", rule_module),
    ("tuple", rule_tuple),
    ("int-scalar", rule_int_scalar),
    ("float-scalar", rule_float_scalar),
    ("buffer", rule_buffer),
    ("string-escape", rule_string_escape),
    ("passthrough", rule_passthrough),
];

fn rule_type(value: &Value) -> Option<Value> {
    match value {
        Value::Type(r) => Some(Value::String(Tag::Type.wrap(&r.path()))),
        _ => None,
    }
}

fn rule_dtype(value: &Value) -> Option<Value> {
    match value {
        // same tag family as types, bare payload
        Value::Dtype(d) => Some(Value::String(Tag::Type.wrap(d.name()))),
        _ => None,
    }
}

fn rule_function(value: &Value) -> Option<Value> {
    match value {
        Value::Function(r) => Some(Value::String(Tag::Function.wrap(&r.path()))),
        _ => None,
    }
}

fn rule_module(value: &Value) -> Option<Value> {
    match value {
        Value::Module(m) => Some(Value::String(Tag::Module.wrap(m))),
        _ => None,
    }
}

fn rule_tuple(value: &Value) -> Option<Value> {
    match value {
        Value::Tuple(items) => Some(Value::String(Tag::Tuple.wrap(&literal::write_tuple(items)))),
        _ => None,
    }
}

fn rule_int_scalar(value: &Value) -> Option<Value> {
    match value {
        Value::Scalar(s) if s.is_integer() => {
            Some(Value::String(Tag::Int.wrap(&s.to_string())))
        }
        _ => None,
    }
}

fn rule_float_scalar(value: &Value) -> Option<Value> {
    match value {
        Value::Scalar(s) if s.is_float() => {
            Some(Value::String(Tag::Float.wrap(&s.to_string())))
        }
        _ => None,
    }
}

fn rule_buffer(value: &Value) -> Option<Value> {
    match value {
        // lossy by design: dtype and shape are discarded
        Value::Buffer(buf) => Some(buf.to_nested()),
        _ => None,
    }
}

fn rule_string_escape(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) if Tag::collides(s) => Some(Value::String(Tag::Str.wrap(s))),
        _ => None,
    }
}

fn rule_passthrough(value: &Value) -> Option<Value> {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Some(value.clone()),
        _ => None,
    }
}

/// Encodes rich values into tag-carrying plain JSON.
///
/// The encoder is stateless between calls apart from its diagnostics sink;
/// one encoder can serve many values, accumulating diagnostics until they
/// are [taken](Encoder::take_diagnostics).
///
/// # Examples
///
/// ```rust
/// use tagson::{EncodeOptions, Encoder, Scalar, Value};
///
/// let mut encoder = Encoder::new(EncodeOptions::new());
/// let text = encoder.encode_to_string(&Value::Scalar(Scalar::I32(5))).unwrap();
/// assert_eq!(text, r#""__int__(5)""#);
/// ```
#[derive(Debug, Default)]
pub struct Encoder {
    options: EncodeOptions,
    diagnostics: Diagnostics,
}

impl Encoder {
    #[must_use]
    pub fn new(options: EncodeOptions) -> Self {
        Encoder {
            options,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Encodes a value tree into its plain, tag-carrying form.
    ///
    /// # Errors
    ///
    /// Fails only for an unsupported leaf under strict options or for a
    /// mapping key with no string encoding.
    pub fn encode(&mut self, value: &Value) -> Result<Value> {
        transform(value, self)
    }

    /// Encodes a value tree all the way to JSON text.
    pub fn encode_to_string(&mut self, value: &Value) -> Result<String> {
        let plain = self.encode(value)?;
        json::write(&plain, self.options.pretty)
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
}

impl LeafCodec for Encoder {
    fn leaf(&mut self, value: &Value) -> Result<Value> {
        for (_, rule) in ENCODE_RULES {
            if let Some(encoded) = rule(value) {
                return Ok(encoded);
            }
        }
        if self.options.strict {
            return Err(Error::unsupported_leaf(
                value.type_name(),
                "no encode rule matched",
            ));
        }
        let fallback = value.to_string();
        self.diagnostics.warn(
            DiagnosticKind::DegradedEncoding,
            &format!("{:?}", value),
            &format!(
                "no encode rule for {} leaf, substituting textual representation",
                value.type_name()
            ),
        );
        Ok(Value::String(fallback))
    }

    /// Mapping keys must come out as strings. Native numeric keys are tagged
    /// even though their value form would pass through untagged; everything
    /// else runs the value chain and is then coerced the way the underlying
    /// JSON layer would stringify it.
    fn key(&mut self, key: &Value) -> Result<Value> {
        match key {
            Value::Number(Number::Int(i)) => Ok(Value::String(Tag::Int.wrap(&i.to_string()))),
            Value::Number(Number::Float(f)) => {
                Ok(Value::String(Tag::Float.wrap(&f.to_string())))
            }
            Value::Array(_) | Value::Object(_) => Err(Error::invalid_key(&format!(
                "{} keys have no string encoding",
                key.type_name()
            ))),
            other => match self.leaf(other)? {
                s @ Value::String(_) => Ok(s),
                Value::Bool(b) => Ok(Value::String(b.to_string())),
                Value::Null => Ok(Value::String("null".to_string())),
                encoded => Err(Error::invalid_key(&format!(
                    "{} key encodes to {}, not a string",
                    other.type_name(),
                    encoded.type_name()
                ))),
            },
        }
    }
}
