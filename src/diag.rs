//! Structured diagnostics for leaf-scoped codec events.
//!
//! The original design of this codec reported degraded encodings and
//! unresolvable references through an ambient warning channel. Here they are
//! first-class data instead: every non-fatal event becomes a [`Diagnostic`]
//! collected by a [`Diagnostics`] sink owned by the encoder or decoder, so
//! callers can assert on them in tests or surface them in their own tooling.
//! Each entry is additionally mirrored to [`log::warn!`] for callers that only
//! care about the ambient channel.
//!
//! ## Examples
//!
//! ```rust
//! use tagson::{Decoder, SymbolTable};
//!
//! let table = SymbolTable::new();
//! let mut decoder = Decoder::new(&table);
//! decoder.decode_str(r#""__type__(nonexistent.module.Thing)""#).unwrap();
//! assert_eq!(decoder.diagnostics().len(), 1);
//! ```

use std::fmt;

/// The category of a non-fatal codec event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A leaf had no faithful encoding and was substituted by its textual
    /// representation (non-strict encode only).
    DegradedEncoding,
    /// A `__type__`/`__function__`/`__module__` payload could not be resolved;
    /// the raw dotted path was substituted.
    UnresolvedReference,
    /// A string matched a tag prefix but its payload failed to parse; the raw
    /// string was passed through.
    MalformedPayload,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::DegradedEncoding => write!(f, "degraded encoding"),
            DiagnosticKind::UnresolvedReference => write!(f, "unresolved reference"),
            DiagnosticKind::MalformedPayload => write!(f, "malformed tag payload"),
        }
    }
}

/// A single non-fatal event recorded during encoding or decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The offending input: the leaf's debug form on encode, the tagged
    /// string on decode.
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.kind, self.message, self.subject)
    }
}

/// An append-only collection of [`Diagnostic`]s.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and mirrors it to the `log` facade.
    pub fn warn(&mut self, kind: DiagnosticKind, subject: &str, message: &str) {
        let diagnostic = Diagnostic {
            kind,
            subject: subject.to_string(),
            message: message.to_string(),
        };
        log::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the recorded diagnostics, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Returns `true` if any entry has the given kind.
    #[must_use]
    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    /// Drains all entries, leaving the sink empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_collects_entries() {
        let mut sink = Diagnostics::new();
        assert!(sink.is_empty());

        sink.warn(DiagnosticKind::DegradedEncoding, "Opaque(..)", "no rule matched");
        sink.warn(DiagnosticKind::UnresolvedReference, "a.b.C", "not registered");

        assert_eq!(sink.len(), 2);
        assert!(sink.contains(DiagnosticKind::DegradedEncoding));
        assert!(!sink.contains(DiagnosticKind::MalformedPayload));
    }

    #[test]
    fn test_take_drains() {
        let mut sink = Diagnostics::new();
        sink.warn(DiagnosticKind::MalformedPayload, "__int__(x)", "invalid digit");

        let taken = sink.take();
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].kind, DiagnosticKind::MalformedPayload);
        assert!(sink.is_empty());
    }
}
