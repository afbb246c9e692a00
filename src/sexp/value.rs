//! S-expression values and their textual form

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, TagsError};

/// Characters allowed in a bare symbol.
pub const SYMBOL_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789+-*/@$%^&_=<>~.?![]{}";

pub fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "+-*/@$%^&_=<>~.?![]{}".contains(c)
}

/// A parsed s-expression.
///
/// Symbols and strings are kept apart so that alist keys (symbols) can be
/// told from string values even when their text is identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sexp {
    String(String),
    Integer(u64),
    Symbol(String),
    List(Vec<Sexp>),
}

impl Sexp {
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::String(text.into())
    }

    /// Lisp truth value: `t` or `nil`.
    pub fn boolean(value: bool) -> Self {
        Self::Symbol(if value { "t" } else { "nil" }.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Sexp]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_symbol(&self, name: &str) -> bool {
        self.as_symbol() == Some(name)
    }

    /// Build an alist `((key value) ...)` from symbol keys.
    pub fn alist<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Sexp)>) -> Self {
        Self::List(
            pairs
                .into_iter()
                .map(|(k, v)| Self::List(vec![Self::Symbol(k.into()), v]))
                .collect(),
        )
    }
}

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(&quote(s)),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Symbol(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Render text as a double-quoted string literal.
///
/// Only backslash and double quote are escaped. Tabs and other control
/// characters pass through raw even though the parser understands `\t`.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Convert a parsed alist `((key value) ...)` into a map keyed by symbol text.
///
/// Later duplicates win. Any element that is not a `(symbol value)` pair is
/// a protocol violation.
pub fn alist_to_map(alist: &Sexp) -> Result<HashMap<String, Sexp>> {
    let items = alist
        .as_list()
        .ok_or_else(|| TagsError::precondition(format!("expected an alist, found {}", alist)))?;

    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        match item.as_list() {
            Some([Sexp::Symbol(key), value]) => {
                map.insert(key.clone(), value.clone());
            }
            _ => {
                return Err(TagsError::precondition(format!(
                    "alist entry is not a (symbol value) pair: {}",
                    item
                )))
            }
        }
    }
    Ok(map)
}
