//! S-expression codec
//!
//! The Lisp-like data format shared by on-disk tag files and the wire
//! protocol:
//!
//! ```text
//! ((value ((filename "a.cc") (tag "foo") (lineno 10) (offset 5) (snippet "void foo(){}"))))
//! ```
//!
//! - [`parser`]: text to [`Sexp`]
//! - [`value`]: the [`Sexp`] type, string quoting and alist helpers

pub mod parser;
pub mod value;

pub use parser::{parse, parse_all};
pub use value::{alist_to_map, is_symbol_char, quote, Sexp, SYMBOL_CHARS};
