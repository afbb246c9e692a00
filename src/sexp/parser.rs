//! Recursive-descent s-expression reader
//!
//! Accepts strings, unsigned integers, symbols and lists of those. Improper
//! lists are flattened: `(1 2 . 3)` reads as `(1 2 3)`. Integers are a run of
//! ASCII digits only; signs, decimals and exponents are not supported.

use crate::error::{Result, TagsError};
use crate::sexp::value::{is_symbol_char, Sexp};

/// Parse the first s-expression in `input`. Trailing text is ignored.
pub fn parse(input: &str) -> Result<Sexp> {
    let mut reader = Reader::new(input);
    reader.read()
}

/// Parse every top-level s-expression in `input`, e.g. a whole tag file.
pub fn parse_all(input: &str) -> Result<Vec<Sexp>> {
    let mut reader = Reader::new(input);
    let mut forms = Vec::new();
    loop {
        reader.skip_whitespace();
        if reader.at_end() {
            return Ok(forms);
        }
        forms.push(reader.read()?);
    }
}

struct Reader {
    chars: Vec<char>,
    pos: usize,
}

impl Reader {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    // Line breaks appear between forms in tag files and after CRLF-terminated
    // replies, so they count as separators along with spaces and tabs.
    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
            self.pos += 1;
        }
    }

    fn read(&mut self) -> Result<Sexp> {
        self.skip_whitespace();
        let c = self
            .peek()
            .ok_or_else(|| TagsError::parse("No s-exp was found in input."))?;

        match c {
            '(' => self.read_list(),
            '"' => self.read_string(),
            '0'..='9' => self.read_integer(),
            c if is_symbol_char(c) || c == '\\' => self.read_symbol(),
            c => Err(TagsError::parse(format!(
                "Unexpected character '{}' was found in input; beginning of token/list was expected",
                c
            ))),
        }
    }

    fn read_list(&mut self) -> Result<Sexp> {
        self.pos += 1; // '('
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(TagsError::parse("Input unexpectedly ended inside a list.")),
                Some(')') => {
                    self.pos += 1;
                    return Ok(Sexp::List(items));
                }
                Some('.') if self.is_lone_dot() => {
                    self.pos += 1;
                }
                Some(_) => items.push(self.read()?),
            }
        }
    }

    /// A `.` followed by a separator is the improper-list marker, not a symbol.
    fn is_lone_dot(&self) -> bool {
        matches!(
            self.chars.get(self.pos + 1),
            None | Some(' ' | '\t' | '\r' | '\n' | ')' | '(')
        )
    }

    fn read_string(&mut self) -> Result<Sexp> {
        self.pos += 1; // opening quote
        let mut text = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(TagsError::parse(
                        "Input contains unterminated quoted string.",
                    ))
                }
                Some('"') => {
                    self.pos += 1;
                    return Ok(Sexp::String(text));
                }
                Some('\\') => {
                    self.pos += 1;
                    let escaped = self.peek().ok_or_else(|| {
                        TagsError::parse("Quoted string ends in unescaped backslash.")
                    })?;
                    text.push(unescape(escaped));
                    self.pos += 1;
                }
                Some(c) => {
                    text.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn read_integer(&mut self) -> Result<Sexp> {
        let start = self.pos;
        while matches!(self.peek(), Some('0'..='9')) {
            self.pos += 1;
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits
            .parse::<u64>()
            .map(Sexp::Integer)
            .map_err(|_| TagsError::parse(format!("Integer literal {} is out of range", digits)))
    }

    fn read_symbol(&mut self) -> Result<Sexp> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                let escaped = self
                    .peek()
                    .ok_or_else(|| TagsError::parse("Symbol ends in unescaped backslash."))?;
                name.push(unescape(escaped));
                self.pos += 1;
            } else if is_symbol_char(c) {
                name.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(Sexp::Symbol(name))
    }
}

/// `\t` is a tab; any other escaped character stands for itself.
fn unescape(c: char) -> char {
    match c {
        't' => '\t',
        other => other,
    }
}
