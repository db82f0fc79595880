//! Tuple-payload literals: a canonical printed form and a safe parser.
//!
//! `__tuple__(..)` carries the tuple's printed literal form, e.g.
//! `(1, 2.5, "a")`, not a recursively re-encoded structure. This module
//! writes that form and parses it back by recursive descent over a closed
//! literal grammar only: numbers, strings, booleans, null, and nested
//! parenthesized/bracketed sequences. Nothing is ever evaluated.
//!
//! The parser also accepts `True`/`False`/`None` and single-quoted strings,
//! so payloads printed by the format's original producer parse unchanged.
//!
//! Tuples containing rich leaves (references, opaque values) print as their
//! display form, which the grammar rejects on the way back in. Such tuples do
//! not round-trip; that is a documented property of the format, surfaced to
//! the caller as a malformed-payload diagnostic.

use crate::{Error, Number, Result, Scalar, Value};
use num_bigint::BigInt;
use std::fmt::Write as _;

/// Writes a sequence of values in canonical tuple-literal form.
///
/// A one-element tuple keeps the trailing comma (`(1,)`) so the form stays
/// unambiguous.
#[must_use]
pub fn write_tuple(items: &[Value]) -> String {
    let mut out = String::from("(");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_element(&mut out, item);
    }
    if items.len() == 1 {
        out.push(',');
    }
    out.push(')');
    out
}

fn write_element(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(out, "{}", b);
        }
        Value::Number(n) => {
            let _ = write!(out, "{}", n);
        }
        // scalars print their bare numeric form; the width is not recoverable
        // from inside a tuple payload
        Value::Scalar(s) => {
            let _ = write!(out, "{}", s);
        }
        Value::String(s) => write_quoted(out, s),
        Value::Tuple(items) => out.push_str(&write_tuple(items)),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_element(out, item);
            }
            out.push(']');
        }
        Value::Buffer(buf) => write_element(out, &buf.to_nested()),
        // no literal form; prints as a display placeholder the parser rejects
        other => {
            let _ = write!(out, "{}", other);
        }
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
}

/// Parses a tuple-literal payload into its elements.
///
/// The payload must be a single parenthesized or bracketed sequence with
/// nothing trailing.
///
/// # Examples
///
/// ```rust
/// use tagson::{literal, Value};
///
/// let items = literal::parse_tuple("(1, 2, 3)").unwrap();
/// assert_eq!(items, vec![Value::from(1), Value::from(2), Value::from(3)]);
/// ```
///
/// # Errors
///
/// Returns an error when the payload is not a well-formed literal sequence.
pub fn parse_tuple(payload: &str) -> Result<Vec<Value>> {
    let mut parser = Parser::new(payload);
    parser.skip_ws();
    let value = parser.parse_value()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(Error::custom(format!(
            "trailing characters in literal at offset {}",
            parser.pos
        )));
    }
    match value {
        Value::Tuple(items) | Value::Array(items) => Ok(items),
        other => Err(Error::custom(format!(
            "expected a sequence literal, found {}",
            other.type_name()
        ))),
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser { input, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn eat(&mut self, expected: char) -> Result<()> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(Error::custom(format!(
                "expected '{}', found '{}' at offset {}",
                expected, c, self.pos
            ))),
            None => Err(Error::custom(format!(
                "expected '{}', found end of payload",
                expected
            ))),
        }
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if self.input[self.pos..].starts_with(word) {
            let end = self.pos + word.len();
            // word must not run into an identifier tail
            let boundary = self.input[end..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric() && c != '_');
            if boundary {
                self.pos = end;
                return true;
            }
        }
        false
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_ws();
        match self.peek() {
            Some('(') => self.parse_seq('(', ')').map(Value::Tuple),
            Some('[') => self.parse_seq('[', ']').map(Value::Array),
            Some('"') => self.parse_string('"'),
            Some('\'') => self.parse_string('\''),
            Some(c) if c == '-' || c == '+' || c.is_ascii_digit() => self.parse_number(),
            Some(_) => {
                if self.eat_word("true") || self.eat_word("True") {
                    Ok(Value::Bool(true))
                } else if self.eat_word("false") || self.eat_word("False") {
                    Ok(Value::Bool(false))
                } else if self.eat_word("null") || self.eat_word("None") {
                    Ok(Value::Null)
                } else {
                    Err(Error::custom(format!(
                        "unexpected literal at offset {}",
                        self.pos
                    )))
                }
            }
            None => Err(Error::custom("unexpected end of payload")),
        }
    }

    fn parse_seq(&mut self, open: char, close: char) -> Result<Vec<Value>> {
        self.eat(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }
            items.push(self.parse_value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {}
                _ => {
                    return Err(Error::custom(format!(
                        "expected ',' or '{}' at offset {}",
                        close, self.pos
                    )))
                }
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<Value> {
        self.eat(quote)?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(Value::String(out)),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c @ ('"' | '\'' | '\\')) => out.push(c),
                    Some(c) => {
                        return Err(Error::custom(format!("invalid escape '\\{}'", c)));
                    }
                    None => return Err(Error::custom("unterminated escape")),
                },
                Some(c) => out.push(c),
                None => return Err(Error::custom("unterminated string literal")),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {
                    self.bump();
                }
                '.' | 'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some('-' | '+')) {
                        self.bump();
                    }
                }
                _ => break,
            }
        }
        let text = &self.input[start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(|f| Value::Number(Number::Float(f)))
                .map_err(|e| Error::custom(format!("invalid float '{}': {}", text, e)))
        } else if let Ok(i) = text.parse::<i64>() {
            Ok(Value::Number(Number::Int(i)))
        } else {
            text.parse::<BigInt>()
                .map(|b| Value::Scalar(Scalar::Big(b)))
                .map_err(|e| Error::custom(format!("invalid integer '{}': {}", text, e)))
        }
    }
}
