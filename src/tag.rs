//! The reserved tag grammar embedded in plain JSON strings.
//!
//! A tagged scalar is a string of the form `__KIND__(PAYLOAD)`. This module
//! owns the prefix set, wrapping and stripping, and the collision test that
//! decides when a user string needs the `__str__(..)` escape.
//!
//! ```text
//! __int__(<integer literal>)
//! __float__(<float literal>)
//! __tuple__(<sequence literal>)
//! __type__(<dotted.module.path>.<QualifiedName>)
//! __function__(<dotted.module.path>.<qualified_name>)
//! __module__(<dotted.module.path>)
//! __str__(<raw user string>)
//! ```
//!
//! `__str__` is the escape marker: a user string whose prefix collides with
//! any reserved tag (including `__str__` itself) is wrapped at encode time
//! and unwrapped at decode time, so no untagged user string can be mistaken
//! for a tagged one.

use std::fmt;

/// The kind of a tagged scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Int,
    Float,
    Tuple,
    Type,
    Function,
    Module,
    /// The escape marker for user strings that collide with the grammar.
    Str,
}

impl Tag {
    /// All tags, in the order prefixes are tried during decode.
    pub const ALL: [Tag; 7] = [
        Tag::Int,
        Tag::Float,
        Tag::Tuple,
        Tag::Type,
        Tag::Function,
        Tag::Module,
        Tag::Str,
    ];

    /// The opening prefix, up to and including the parenthesis.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Tag::Int => "__int__(",
            Tag::Float => "__float__(",
            Tag::Tuple => "__tuple__(",
            Tag::Type => "__type__(",
            Tag::Function => "__function__(",
            Tag::Module => "__module__(",
            Tag::Str => "__str__(",
        }
    }

    /// Wraps a payload in this tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagson::Tag;
    ///
    /// assert_eq!(Tag::Int.wrap("42"), "__int__(42)");
    /// ```
    #[must_use]
    pub fn wrap(&self, payload: &str) -> String {
        format!("{}{})", self.prefix(), payload)
    }

    /// Splits a string into its tag and payload, if it is tagged.
    ///
    /// A string is tagged when it starts with a reserved prefix and ends
    /// with a closing parenthesis. Everything between is the payload, taken
    /// verbatim.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagson::Tag;
    ///
    /// assert_eq!(Tag::strip("__float__(2.5)"), Some((Tag::Float, "2.5")));
    /// assert_eq!(Tag::strip("plain text"), None);
    /// assert_eq!(Tag::strip("__int__(5"), None); // unterminated
    /// ```
    #[must_use]
    pub fn strip(s: &str) -> Option<(Tag, &str)> {
        for tag in Tag::ALL {
            let prefix = tag.prefix();
            if let Some(rest) = s.strip_prefix(prefix) {
                let payload = rest.strip_suffix(')')?;
                return Some((tag, payload));
            }
        }
        None
    }

    /// Returns `true` if a user string starts with any reserved prefix and
    /// therefore needs the `__str__(..)` escape.
    ///
    /// The test is prefix-only: `"__int__(5"` without the closing parenthesis
    /// still collides, because a future reader must not have to guess.
    #[must_use]
    pub fn collides(s: &str) -> bool {
        Tag::ALL
            .iter()
            .any(|tag| s.starts_with(tag.prefix().trim_end_matches('(')))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.prefix();
        write!(f, "{}", &prefix[..prefix.len() - 1])
    }
}
