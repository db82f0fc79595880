//! Homogeneous numeric buffers and dtype descriptors.
//!
//! A [`Buffer`] is an n-dimensional, row-major block of integers or floats,
//! the codec's stand-in for an external numeric array. Its encoding is
//! deliberately lossy: a buffer converts to nested plain arrays of numbers
//! and the dtype/shape metadata is discarded, so decoding yields nested
//! arrays, not a buffer. Only the numeric values survive the round trip.
//!
//! [`Dtype`] doubles as a standalone leaf: a dtype descriptor value encodes
//! as `__type__(<name>)` with a bare (dot-free) payload.

use crate::{Number, Value};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An element-type descriptor for numeric buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dtype {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

impl Dtype {
    /// All descriptors, used for name lookup on decode.
    pub const ALL: [Dtype; 10] = [
        Dtype::Int8,
        Dtype::Int16,
        Dtype::Int32,
        Dtype::Int64,
        Dtype::UInt8,
        Dtype::UInt16,
        Dtype::UInt32,
        Dtype::UInt64,
        Dtype::Float32,
        Dtype::Float64,
    ];

    /// The stable lower-case name carried in `__type__(..)` payloads.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Dtype::Int8 => "int8",
            Dtype::Int16 => "int16",
            Dtype::Int32 => "int32",
            Dtype::Int64 => "int64",
            Dtype::UInt8 => "uint8",
            Dtype::UInt16 => "uint16",
            Dtype::UInt32 => "uint32",
            Dtype::UInt64 => "uint64",
            Dtype::Float32 => "float32",
            Dtype::Float64 => "float64",
        }
    }

    /// Looks a descriptor up by its stable name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagson::Dtype;
    ///
    /// assert_eq!(Dtype::from_name("float32"), Some(Dtype::Float32));
    /// assert_eq!(Dtype::from_name("complex128"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Dtype> {
        Dtype::ALL.iter().copied().find(|d| d.name() == name)
    }

    /// Returns `true` for the floating-point descriptors.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Dtype::Float32 | Dtype::Float64)
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Row-major element storage for a [`Buffer`].
#[derive(Clone, Debug)]
pub enum BufferData {
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl BufferData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            BufferData::Int(v) => v.len(),
            BufferData::Float(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartialEq for BufferData {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (BufferData::Int(a), BufferData::Int(b)) => a == b,
            (BufferData::Float(a), BufferData::Float(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(x, y)| x.to_bits() == y.to_bits())
            }
            _ => false,
        }
    }
}

impl Eq for BufferData {}

impl Hash for BufferData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            BufferData::Int(v) => {
                0u8.hash(state);
                v.hash(state);
            }
            BufferData::Float(v) => {
                1u8.hash(state);
                for f in v {
                    f.to_bits().hash(state);
                }
            }
        }
    }
}

/// A homogeneous n-dimensional numeric buffer.
///
/// Shape is row-major and its element product must equal the data length.
///
/// # Examples
///
/// ```rust
/// use tagson::Buffer;
///
/// let buf = Buffer::from_ints(vec![2, 2], vec![1, 2, 3, 4]).unwrap();
/// assert_eq!(buf.ndim(), 2);
/// assert_eq!(buf.len(), 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Buffer {
    dtype: Dtype,
    shape: Vec<usize>,
    data: BufferData,
}

impl Buffer {
    /// Creates a buffer, validating that the shape matches the data length
    /// and the dtype matches the data lane.
    pub fn new(dtype: Dtype, shape: Vec<usize>, data: BufferData) -> crate::Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(crate::Error::custom(format!(
                "shape {:?} requires {} elements, got {}",
                shape,
                expected,
                data.len()
            )));
        }
        match (&data, dtype.is_float()) {
            (BufferData::Int(_), true) | (BufferData::Float(_), false) => {
                return Err(crate::Error::custom(format!(
                    "dtype {} does not match element storage",
                    dtype
                )));
            }
            _ => {}
        }
        Ok(Buffer { dtype, shape, data })
    }

    /// Creates an `int64` buffer from row-major elements.
    pub fn from_ints(shape: Vec<usize>, data: Vec<i64>) -> crate::Result<Self> {
        Buffer::new(Dtype::Int64, shape, BufferData::Int(data))
    }

    /// Creates a `float64` buffer from row-major elements.
    pub fn from_floats(shape: Vec<usize>, data: Vec<f64>) -> crate::Result<Self> {
        Buffer::new(Dtype::Float64, shape, BufferData::Float(data))
    }

    #[must_use]
    pub const fn dtype(&self) -> Dtype {
        self.dtype
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Converts the buffer to nested plain arrays of native numbers.
    ///
    /// This is the lossy leg of the codec: dtype and shape metadata are
    /// discarded and only the numeric values remain. A zero-dimensional
    /// buffer collapses to its single bare number.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagson::{Buffer, Value};
    ///
    /// let buf = Buffer::from_ints(vec![2, 2], vec![1, 2, 3, 4]).unwrap();
    /// let nested = buf.to_nested();
    /// let rows = nested.as_array().unwrap();
    /// assert_eq!(rows.len(), 2);
    /// assert_eq!(rows[0].as_array().unwrap()[1], Value::from(2));
    /// ```
    #[must_use]
    pub fn to_nested(&self) -> Value {
        let elements: Vec<Value> = match &self.data {
            BufferData::Int(v) => v
                .iter()
                .map(|i| Value::Number(Number::Int(*i)))
                .collect(),
            BufferData::Float(v) => v
                .iter()
                .map(|f| Value::Number(Number::Float(*f)))
                .collect(),
        };
        nest(&self.shape, &elements)
    }
}

fn nest(shape: &[usize], elements: &[Value]) -> Value {
    match shape {
        [] => elements.first().cloned().unwrap_or(Value::Null),
        [_] => Value::Array(elements.to_vec()),
        [outer, rest @ ..] => {
            // a zero-element inner dimension still yields `outer` empty rows
            let stride: usize = rest.iter().product();
            let rows = (0..*outer)
                .map(|i| nest(rest, &elements[i * stride..(i + 1) * stride]))
                .collect();
            Value::Array(rows)
        }
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer({}, shape={:?})", self.dtype, self.shape)
    }
}
