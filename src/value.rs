//! Dynamic value representation for tagged-JSON data.
//!
//! This module provides the [`Value`] enum which represents any value the
//! codec can carry: the plain JSON vocabulary (null, bool, number, string,
//! array, object) plus the richer leaves that only survive a JSON round trip
//! through the tag grammar (fixed-width scalars, tuples, numeric buffers, and
//! references to types, functions, and modules).
//!
//! ## Core Types
//!
//! - [`Value`]: any codec value, plain or rich
//! - [`Number`]: a native JSON number (i64 integer or f64 float), never tagged
//! - [`Scalar`]: a fixed-width numeric scalar, always tagged on encode
//! - [`SymbolRef`]: a dotted-path reference to a type or function
//! - [`Opaque`]: extension point for leaves the codec cannot tag faithfully
//!
//! ## Equality and hashing
//!
//! `Value` implements `Eq` and `Hash` so it can serve as a mapping key (the
//! codec must tag integer, float, and tuple keys). Floats compare and hash by
//! bit pattern. Numeric comparison reaches across variants: fixed-width
//! scalars compare numerically across widths, and a native number equals a
//! scalar of the same kind and value, so a decoded key still finds its entry
//! even though the wire carries no width. Variant identity is still
//! observable through `is_number`/`is_scalar`.
//!
//! ## Examples
//!
//! ```rust
//! use tagson::{Scalar, Value};
//!
//! let native = Value::from(42);
//! let fixed = Value::Scalar(Scalar::I32(42));
//!
//! assert_eq!(native, fixed); // numerically equal
//! assert!(native.is_number() && !fixed.is_number()); // still a richer type
//! ```

use crate::{Buffer, Dtype, TagMap};
use num_bigint::BigInt;
use serde::de::{self, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A dynamically-typed representation of any value the codec can carry.
///
/// The first six variants are the plain JSON vocabulary and pass through the
/// codec untouched. The remaining variants are the richer leaves: they have no
/// native JSON form and are what the tag grammar exists for.
///
/// # Examples
///
/// ```rust
/// use tagson::{Number, Value};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::Int(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    /// A native number; serializes as a bare JSON number, never tagged.
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(TagMap),
    /// A fixed-width numeric scalar; encodes as `__int__(..)`/`__float__(..)`.
    Scalar(Scalar),
    /// An ordered-immutable tuple; encodes as `__tuple__(..)`.
    Tuple(Vec<Value>),
    /// A homogeneous numeric buffer; encodes lossily as nested arrays.
    Buffer(Buffer),
    /// A reference to a type; encodes as `__type__(module.Name)`.
    Type(SymbolRef),
    /// A numeric-dtype descriptor; encodes as `__type__(name)`.
    Dtype(Dtype),
    /// A reference to a callable; encodes as `__function__(module.name)`.
    Function(SymbolRef),
    /// A reference to a module; encodes as `__module__(path)`.
    Module(String),
    /// A caller-supplied leaf with no faithful encoding; drives the
    /// degraded-encoding and strict-mode paths.
    Opaque(Arc<dyn Opaque>),
}

/// A native JSON number.
///
/// Values of this type pass through the codec as bare JSON numbers. Numbers
/// that must come back with their richer type use [`Scalar`] instead.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(*i),
            Number::Float(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Number::Int(i) => {
                0u8.hash(state);
                i.hash(state);
            }
            Number::Float(f) => {
                1u8.hash(state);
                f.to_bits().hash(state);
            }
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

/// A fixed-width numeric scalar.
///
/// The encode side accepts every width; the wire carries only the decimal
/// text, so the decode side materializes the widest lane (`I64`/`U64`, `Big`
/// beyond, `F64` for floats). Equality and hashing are numeric across widths
/// so a round trip compares equal:
///
/// ```rust
/// use tagson::Scalar;
///
/// assert_eq!(Scalar::I32(5), Scalar::I64(5));
/// assert_eq!(Scalar::F32(2.5), Scalar::F64(2.5));
/// assert_ne!(Scalar::I64(5), Scalar::F64(5.0));
/// ```
#[derive(Clone, Debug)]
pub enum Scalar {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// An integer beyond the 64-bit lanes; the wire format's integers are
    /// arbitrary-precision.
    Big(BigInt),
}

impl Scalar {
    /// Returns `true` for the integer lanes, including `Big`.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        !matches!(self, Scalar::F32(_) | Scalar::F64(_))
    }

    /// Returns `true` for the floating-point lanes.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Scalar::F32(_) | Scalar::F64(_))
    }

    /// Converts integer lanes to `i128`; `None` for floats and for `Big`
    /// values outside `i128` range.
    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Scalar::I8(v) => Some(*v as i128),
            Scalar::I16(v) => Some(*v as i128),
            Scalar::I32(v) => Some(*v as i128),
            Scalar::I64(v) => Some(*v as i128),
            Scalar::U8(v) => Some(*v as i128),
            Scalar::U16(v) => Some(*v as i128),
            Scalar::U32(v) => Some(*v as i128),
            Scalar::U64(v) => Some(*v as i128),
            Scalar::Big(v) => i128::try_from(v).ok(),
            Scalar::F32(_) | Scalar::F64(_) => None,
        }
    }

    /// Converts float lanes to `f64`; `None` for integers.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::F32(v) => Some(*v as f64),
            Scalar::F64(v) => Some(*v),
            _ => None,
        }
    }

    fn to_bigint(&self) -> Option<BigInt> {
        match self {
            Scalar::Big(v) => Some(v.clone()),
            _ => self.as_i128().map(BigInt::from),
        }
    }

    fn from_number(n: &Number) -> Scalar {
        match n {
            Number::Int(i) => Scalar::I64(*i),
            Number::Float(f) => Scalar::F64(*f),
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_float(), other.is_float()) {
            (true, true) => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.to_bits() == b.to_bits(),
                _ => false,
            },
            (false, false) => match (self.as_i128(), other.as_i128()) {
                (Some(a), Some(b)) => a == b,
                _ => self.to_bigint() == other.to_bigint(),
            },
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let Some(f) = self.as_f64() {
            0u8.hash(state);
            f.to_bits().hash(state);
        } else if let Some(i) = self.as_i128() {
            1u8.hash(state);
            i.hash(state);
        } else {
            // Big beyond i128; narrower Big values took the i128 path so
            // hashing stays consistent with numeric equality
            2u8.hash(state);
            self.to_bigint().hash(state);
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::I8(v) => write!(f, "{}", v),
            Scalar::I16(v) => write!(f, "{}", v),
            Scalar::I32(v) => write!(f, "{}", v),
            Scalar::I64(v) => write!(f, "{}", v),
            Scalar::U8(v) => write!(f, "{}", v),
            Scalar::U16(v) => write!(f, "{}", v),
            Scalar::U32(v) => write!(f, "{}", v),
            Scalar::U64(v) => write!(f, "{}", v),
            Scalar::F32(v) => write!(f, "{}", v),
            Scalar::F64(v) => write!(f, "{}", v),
            Scalar::Big(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value)
                }
            }
        )*
    };
}

scalar_from! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f32 => F32, f64 => F64, BigInt => Big,
}

/// A dotted-path reference to a type or callable.
///
/// The pair of a module path and an attribute name, joined by `.` on the
/// wire: `__type__(collections.OrderedDict)` carries module `collections`,
/// name `OrderedDict`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SymbolRef {
    pub module: String,
    pub name: String,
}

impl SymbolRef {
    #[must_use]
    pub fn new(module: &str, name: &str) -> Self {
        SymbolRef {
            module: module.to_string(),
            name: name.to_string(),
        }
    }

    /// Splits a dotted path on its last separator. A path without a dot
    /// becomes a bare name with an empty module, mirroring the wire format.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        match path.rsplit_once('.') {
            Some((module, name)) => SymbolRef::new(module, name),
            None => SymbolRef::new("", path),
        }
    }

    /// The full dotted path.
    #[must_use]
    pub fn path(&self) -> String {
        if self.module.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.module, self.name)
        }
    }
}

impl fmt::Display for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.module, self.name)
        }
    }
}

/// A leaf the codec cannot tag faithfully.
///
/// Applications wrap their own types in `Value::Opaque` to route them through
/// the codec; under the default (non-strict) options such a leaf degrades to
/// its [`repr`](Opaque::repr) with a warning, under strict options it aborts
/// the encode.
pub trait Opaque: fmt::Debug + Send + Sync {
    /// Textual stand-in used for degraded encoding. Defaults to the debug
    /// representation.
    fn repr(&self) -> String {
        format!("{:?}", self)
    }

    /// A short name for error and diagnostic messages.
    fn type_name(&self) -> &str {
        "opaque"
    }
}

impl Value {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a native number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` if the value is a fixed-width scalar.
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    /// Returns `true` if the value is a tuple.
    #[inline]
    #[must_use]
    pub const fn is_tuple(&self) -> bool {
        matches!(self, Value::Tuple(_))
    }

    /// Returns `true` if the value is a numeric buffer.
    #[inline]
    #[must_use]
    pub const fn is_buffer(&self) -> bool {
        matches!(self, Value::Buffer(_))
    }

    /// Returns `true` for any of the reference leaves (type, dtype,
    /// function, module).
    #[inline]
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(
            self,
            Value::Type(_) | Value::Dtype(_) | Value::Function(_) | Value::Module(_)
        )
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a native integer, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// If the value is a native number, returns it as `f64`. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is an object, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&TagMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// If the value is a fixed-width scalar, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a tuple, returns its elements.
    #[inline]
    #[must_use]
    pub fn as_tuple(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// A short name for the variant, used in errors and diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Scalar(_) => "scalar",
            Value::Tuple(_) => "tuple",
            Value::Buffer(_) => "buffer",
            Value::Type(_) => "type",
            Value::Dtype(_) => "dtype",
            Value::Function(_) => "function",
            Value::Module(_) => "module",
            Value::Opaque(o) => o.type_name(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            // a native number equals a scalar of the same kind and value;
            // the wire carries no width, so decoded keys must still match
            (Value::Number(n), Value::Scalar(s)) | (Value::Scalar(s), Value::Number(n)) => {
                Scalar::from_number(n) == *s
            }
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Buffer(a), Value::Buffer(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Dtype(a), Value::Dtype(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Module(a), Value::Module(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => a.repr() == b.repr(),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Numbers and scalars share the scalar hashing scheme so that
        // cross-variant numeric equality stays consistent; every other
        // variant gets a distinct prefix byte.
        match self {
            Value::Number(n) => Scalar::from_number(n).hash(state),
            Value::Scalar(s) => s.hash(state),
            Value::Null => 20u8.hash(state),
            Value::Bool(b) => {
                21u8.hash(state);
                b.hash(state);
            }
            Value::String(s) => {
                22u8.hash(state);
                s.hash(state);
            }
            Value::Array(arr) => {
                23u8.hash(state);
                arr.hash(state);
            }
            Value::Object(obj) => {
                24u8.hash(state);
                obj.len().hash(state);
                // map equality ignores entry order, so the hash must too:
                // fold per-entry hashes commutatively
                let mut combined: u64 = 0;
                for (k, v) in obj.iter() {
                    let mut entry = DefaultHasher::new();
                    k.hash(&mut entry);
                    v.hash(&mut entry);
                    combined = combined.wrapping_add(entry.finish());
                }
                combined.hash(state);
            }
            Value::Tuple(items) => {
                25u8.hash(state);
                items.hash(state);
            }
            Value::Buffer(buf) => {
                26u8.hash(state);
                buf.hash(state);
            }
            Value::Type(r) => {
                27u8.hash(state);
                r.hash(state);
            }
            Value::Dtype(d) => {
                28u8.hash(state);
                d.hash(state);
            }
            Value::Function(r) => {
                29u8.hash(state);
                r.hash(state);
            }
            Value::Module(m) => {
                30u8.hash(state);
                m.hash(state);
            }
            Value::Opaque(o) => {
                31u8.hash(state);
                o.repr().hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(arr) => {
                write!(
                    f,
                    "[{}]",
                    arr.iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            Value::Object(obj) => write!(f, "{{object of {} entries}}", obj.len()),
            Value::Scalar(s) => write!(f, "{}", s),
            Value::Tuple(items) => {
                write!(
                    f,
                    "({})",
                    items
                        .iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            Value::Buffer(buf) => write!(f, "{}", buf),
            Value::Type(r) => write!(f, "<type {}>", r),
            Value::Dtype(d) => write!(f, "{}", d),
            Value::Function(r) => write!(f, "<function {}>", r),
            Value::Module(m) => write!(f, "<module {}>", m),
            Value::Opaque(o) => write!(f, "{}", o.repr()),
        }
    }
}

// From implementations for creating Value from primitives. Native widths map
// to Number; fixed-width scalars are constructed explicitly or via Scalar.
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Int(value as i64))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Int(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Int(value as i64))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<TagMap> for Value {
    fn from(value: TagMap) -> Self {
        Value::Object(value)
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

impl From<Buffer> for Value {
    fn from(value: Buffer) -> Self {
        Value::Buffer(value)
    }
}

impl From<Dtype> for Value {
    fn from(value: Dtype) -> Self {
        Value::Dtype(value)
    }
}

impl Serialize for Value {
    /// Serializes the plain projection of the value: rich leaves collapse to
    /// their natural data (scalars to numbers, tuples to sequences,
    /// references to path strings). Tag-preserving output goes through
    /// [`to_string`](crate::to_string) instead.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Int(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Scalar(s) => match s {
                Scalar::F32(v) => serializer.serialize_f64(*v as f64),
                Scalar::F64(v) => serializer.serialize_f64(*v),
                Scalar::U64(v) => serializer.serialize_u64(*v),
                Scalar::Big(v) => serializer.serialize_str(&v.to_string()),
                other => match other.as_i128() {
                    Some(i) => serializer.serialize_i64(i as i64),
                    None => Err(serde::ser::Error::custom("scalar out of range")),
                },
            },
            Value::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for element in items {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Buffer(buf) => buf.to_nested().serialize(serializer),
            Value::Type(r) => serializer.serialize_str(&r.path()),
            Value::Dtype(d) => serializer.serialize_str(d.name()),
            Value::Function(r) => serializer.serialize_str(&r.path()),
            Value::Module(m) => serializer.serialize_str(m),
            Value::Opaque(o) => Err(serde::ser::Error::custom(format!(
                "cannot serialize opaque leaf {}",
                o.repr()
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    /// Deserializes into the plain variants only; rich leaves are recovered
    /// by the decode path, not by serde.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid JSON value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Int(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                if value <= i64::MAX as u64 {
                    Ok(Value::Number(Number::Int(value as i64)))
                } else {
                    Ok(Value::Scalar(Scalar::U64(value)))
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = TagMap::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    values.insert(Value::String(key), value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
