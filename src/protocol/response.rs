//! Server response decoding

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TagsError};
use crate::sexp::{alist_to_map, parse, Sexp};

/// One cross-reference hit returned by a tags server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    /// File name as the server reports it; not necessarily a local path
    pub filename: String,
    pub tag: String,
    /// 1-based line number
    pub line: u64,
    /// Byte offset of the line within the file
    pub offset: u64,
    /// Source line as text. Replies are decoded from UTF-8 before parsing,
    /// so bytes that are not valid UTF-8 arrive as U+FFFD.
    pub snippet: String,
}

impl TagRecord {
    fn from_alist(alist: &Sexp) -> Result<Self> {
        let fields = alist_to_map(alist)?;
        Ok(Self {
            filename: required_text(&fields, "filename")?,
            tag: required_text(&fields, "tag")?,
            line: required_integer(&fields, "lineno")?,
            offset: required_integer(&fields, "offset")?,
            snippet: required_text(&fields, "snippet")?,
        })
    }
}

fn required<'a>(fields: &'a HashMap<String, Sexp>, key: &str) -> Result<&'a Sexp> {
    fields
        .get(key)
        .ok_or_else(|| TagsError::precondition(format!("tag entry is missing `{}`", key)))
}

fn required_text(fields: &HashMap<String, Sexp>, key: &str) -> Result<String> {
    let value = required(fields, key)?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| TagsError::precondition(format!("`{}` should be a string, got {}", key, value)))
}

fn required_integer(fields: &HashMap<String, Sexp>, key: &str) -> Result<u64> {
    let value = required(fields, key)?;
    value
        .as_integer()
        .ok_or_else(|| TagsError::precondition(format!("`{}` should be an integer, got {}", key, value)))
}

/// Decode a lookup response into tag records.
///
/// If any element of the `value` list is an `(error ...)` form the whole
/// call fails with the server's message and no records are returned.
/// `(value nil)` is the empty list, as servers with no file index send it.
pub fn decode_response(raw: &str) -> Result<Vec<TagRecord>> {
    let value = decode_value(raw)?;
    if value.is_symbol("nil") {
        return Ok(Vec::new());
    }
    let elements = value
        .as_list()
        .ok_or_else(|| TagsError::precondition(format!("`value` should be a list, got {}", value)))?;

    if let Some(message) = elements.iter().find_map(error_message) {
        return Err(TagsError::Server { message });
    }

    elements.iter().map(TagRecord::from_alist).collect()
}

/// Decode a status-style response (ping, reload) and return its `value`.
///
/// A response with no `value` entry decodes to the empty list.
pub fn decode_status(raw: &str) -> Result<Sexp> {
    let fields = top_level_fields(raw)?;
    let value = fields
        .get("value")
        .cloned()
        .unwrap_or_else(|| Sexp::List(vec![]));

    if let Some(message) = value
        .as_list()
        .and_then(|items| items.iter().find_map(error_message))
    {
        return Err(TagsError::Server { message });
    }
    Ok(value)
}

fn decode_value(raw: &str) -> Result<Sexp> {
    top_level_fields(raw)?
        .remove("value")
        .ok_or_else(|| TagsError::precondition("response has no `value` entry"))
}

/// Parse the top-level alist, surfacing a top-level `(error ...)` entry.
fn top_level_fields(raw: &str) -> Result<HashMap<String, Sexp>> {
    let top = parse(raw)?;
    let fields = alist_to_map(&top)?;

    if let Some(error) = fields.get("error") {
        return Err(TagsError::Server {
            message: message_from_payload(std::slice::from_ref(error)),
        });
    }
    Ok(fields)
}

/// `Some(message)` when `element` is an `(error ...)` form.
fn error_message(element: &Sexp) -> Option<String> {
    match element.as_list() {
        Some([head, rest @ ..]) if head.is_symbol("error") => Some(message_from_payload(rest)),
        _ => None,
    }
}

/// Accepts both `((message "..."))` and `(message "...")` payload shapes.
fn message_from_payload(payload: &[Sexp]) -> String {
    let from_alist = |alist: &Sexp| {
        alist_to_map(alist)
            .ok()
            .and_then(|m| m.get("message").and_then(|v| v.as_str().map(str::to_string)))
    };

    payload
        .first()
        .and_then(from_alist)
        .or_else(|| from_alist(&Sexp::List(payload.to_vec())))
        .unwrap_or_else(|| {
            payload
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
}
