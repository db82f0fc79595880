//! Error types for tagged-JSON encoding and decoding.
//!
//! Only two classes of failure abort a whole operation: malformed top-level
//! JSON text and strict-mode encode failures. Everything that can be contained
//! at a single leaf (a degraded encoding, an unresolvable reference, a tag
//! payload that will not parse) is reported through the
//! [`Diagnostics`](crate::Diagnostics) sink instead and never surfaces here.
//!
//! ## Examples
//!
//! ```rust
//! use tagson::{from_str, Error};
//!
//! let result: Result<tagson::Value, Error> = from_str("{not json");
//! assert!(result.is_err());
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can abort tagged-JSON encoding/decoding.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The underlying JSON text could not be parsed or produced
    #[error("JSON error: {0}")]
    Json(String),

    /// A leaf had no applicable encode rule and strict mode was requested
    #[error("no encode rule applies to value of type {type_name}: {detail}")]
    UnsupportedLeaf { type_name: String, detail: String },

    /// A mapping key encoded to something other than a string
    #[error("mapping key cannot be represented as a JSON object key: {0}")]
    InvalidKey(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates an error wrapping a failure of the underlying JSON layer.
    pub fn json(err: &serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }

    /// Creates an unsupported-leaf error, raised only under strict encoding.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagson::Error;
    ///
    /// let err = Error::unsupported_leaf("Opaque", "no rule matched");
    /// assert!(err.to_string().contains("Opaque"));
    /// ```
    pub fn unsupported_leaf(type_name: &str, detail: &str) -> Self {
        Error::UnsupportedLeaf {
            type_name: type_name.to_string(),
            detail: detail.to_string(),
        }
    }

    /// Creates an invalid-key error for keys with no string encoding.
    pub fn invalid_key(msg: &str) -> Self {
        Error::InvalidKey(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagson::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
