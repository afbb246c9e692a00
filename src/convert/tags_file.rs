//! s-expression TAGS files
//!
//! ```text
//! (tags-format-version 2)
//! (tags-comment "")
//! (timestamp 1160000000)
//! (tags-corpus-name "google3")
//! (file
//!   (path "foo.cc")
//!   (language "c++")
//!   (contents ((item (line 1) (offset 0) (descriptor (generic-tag (tag "Foo"))) (snippet "int Foo() {")))))
//! (deleted "old.cc")
//! ```

use std::io::{self, Write};
use std::path::Path;

use crate::error::{Result, TagsError};
use crate::lang::Language;
use crate::sexp::{self, alist_to_map, Sexp};

use super::etags::{parse_etags, EtagsFile};

pub const TAGS_FORMAT_VERSION: u64 = 2;

/// Continuation indent between items inside `(contents (...))`
const ITEM_SEPARATOR: &str = "\n             ";

/// Options for turning etags sections into a TAGS file.
#[derive(Debug, Clone)]
pub struct TagsFileOptions {
    pub corpus_name: String,
    /// Language written for every file unless guessing finds a better one
    pub language: String,
    /// Pick the language from each path's extension, falling back to `language`
    pub guess_language: bool,
    /// Emit `(call ...)` descriptors instead of `(generic-tag ...)`
    pub callers: bool,
    pub header: bool,
    /// Seconds since the epoch; `None` means now
    pub timestamp: Option<u64>,
}

impl Default for TagsFileOptions {
    fn default() -> Self {
        Self {
            corpus_name: crate::query::DEFAULT_CORPUS.to_string(),
            language: Language::Cpp.name().to_string(),
            guess_language: false,
            callers: false,
            header: true,
            timestamp: None,
        }
    }
}

impl TagsFileOptions {
    fn language_for(&self, path: &str) -> String {
        if self.guess_language {
            if let Some(lang) = Language::from_path(Path::new(path)) {
                return lang.name().to_string();
            }
        }
        self.language.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    /// `(generic-tag (tag "name"))`
    GenericTag(String),
    /// `(call (to (ref (name "name"))))`
    Call(String),
    /// Any descriptor shape this reader does not interpret
    Other(Sexp),
}

impl Descriptor {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::GenericTag(name) | Self::Call(name) => Some(name),
            Self::Other(_) => None,
        }
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        match self {
            Self::GenericTag(name) => {
                out.write_all(b"(generic-tag (tag ")?;
                out.write_all(&lisp_string(name))?;
                out.write_all(b"))")
            }
            Self::Call(name) => {
                out.write_all(b"(call (to (ref (name ")?;
                out.write_all(&lisp_string(name))?;
                out.write_all(b"))))")
            }
            Self::Other(value) => write!(out, "{}", value),
        }
    }

    fn from_sexp(value: &Sexp) -> Self {
        let items = value.as_list().unwrap_or_default();
        match items {
            [Sexp::Symbol(kind), Sexp::List(tag)] if kind == "generic-tag" => {
                if let [Sexp::Symbol(key), Sexp::String(name)] = tag.as_slice() {
                    if key == "tag" {
                        return Self::GenericTag(name.clone());
                    }
                }
            }
            [Sexp::Symbol(kind), Sexp::List(to)] if kind == "call" => {
                if let Some(name) = call_target(to) {
                    return Self::Call(name.to_string());
                }
            }
            _ => {}
        }
        Self::Other(value.clone())
    }
}

fn call_target(to: &[Sexp]) -> Option<&str> {
    let [Sexp::Symbol(to_key), Sexp::List(reference)] = to else {
        return None;
    };
    let [Sexp::Symbol(ref_key), Sexp::List(name)] = reference.as_slice() else {
        return None;
    };
    let [Sexp::Symbol(name_key), Sexp::String(name)] = name.as_slice() else {
        return None;
    };
    (to_key == "to" && ref_key == "ref" && name_key == "name").then_some(name.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagItem {
    pub line: u64,
    pub offset: u64,
    pub descriptor: Descriptor,
    /// Raw source line, written byte for byte
    pub snippet: Vec<u8>,
}

/// All tags of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTags {
    pub path: String,
    pub language: String,
    pub items: Vec<TagItem>,
}

impl FileTags {
    pub fn from_etags(file: &EtagsFile, options: &TagsFileOptions) -> Self {
        let items = file
            .entries
            .iter()
            .map(|entry| TagItem {
                line: entry.line,
                offset: entry.offset,
                descriptor: if options.callers {
                    Descriptor::Call(entry.tag.clone())
                } else {
                    Descriptor::GenericTag(entry.tag.clone())
                },
                snippet: entry.snippet.clone(),
            })
            .collect();

        Self {
            path: file.path.clone(),
            language: options.language_for(&file.path),
            items,
        }
    }

    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(b"(file \n  (path ")?;
        out.write_all(&lisp_string(&self.path))?;
        out.write_all(b")\n  (language ")?;
        out.write_all(&lisp_string(&self.language))?;
        out.write_all(b")\n  (contents (")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                out.write_all(ITEM_SEPARATOR.as_bytes())?;
            }
            write!(out, "(item (line {}) (offset {}) (descriptor ", item.line, item.offset)?;
            item.descriptor.write_to(out)?;
            out.write_all(b") (snippet ")?;
            out.write_all(&lisp_string(&item.snippet))?;
            out.write_all(b"))")?;
        }
        out.write_all(b")))\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagsHeader {
    pub format_version: u64,
    pub comment: String,
    pub timestamp: u64,
    pub corpus_name: String,
}

impl TagsHeader {
    pub fn new(corpus_name: impl Into<String>, timestamp: Option<u64>) -> Self {
        Self {
            format_version: TAGS_FORMAT_VERSION,
            comment: String::new(),
            timestamp: timestamp.unwrap_or_else(now),
            corpus_name: corpus_name.into(),
        }
    }

    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "(tags-format-version {})", self.format_version)?;
        out.write_all(b"(tags-comment ")?;
        out.write_all(&lisp_string(&self.comment))?;
        writeln!(out, ")\n(timestamp {})", self.timestamp)?;
        out.write_all(b"(tags-corpus-name ")?;
        out.write_all(&lisp_string(&self.corpus_name))?;
        out.write_all(b")\n")
    }
}

fn now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

/// A whole TAGS file, or an update file without a header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagsFile {
    pub header: Option<TagsHeader>,
    pub files: Vec<FileTags>,
    /// Paths whose tags the server should drop
    pub deleted: Vec<String>,
}

impl TagsFile {
    pub fn from_etags(etags: &[EtagsFile], deleted: &[String], options: &TagsFileOptions) -> Self {
        Self {
            header: options
                .header
                .then(|| TagsHeader::new(options.corpus_name.clone(), options.timestamp)),
            files: etags.iter().map(|f| FileTags::from_etags(f, options)).collect(),
            deleted: deleted.to_vec(),
        }
    }

    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        if let Some(header) = &self.header {
            header.write_to(out)?;
        }
        for file in &self.files {
            file.write_to(out)?;
        }
        for path in &self.deleted {
            out.write_all(b"(deleted ")?;
            out.write_all(&lisp_string(path))?;
            out.write_all(b")\n")?;
        }
        Ok(())
    }

    /// Read a TAGS file back. Unknown top-level forms are ignored.
    ///
    /// The codec reads text, so callers holding raw bytes decode them first
    /// and non-UTF-8 snippet bytes come back as U+FFFD.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tags = Self::default();
        let mut header = HeaderFields::default();

        for form in sexp::parse_all(text)? {
            let Some([Sexp::Symbol(head), rest @ ..]) = form.as_list() else {
                return Err(TagsError::precondition(format!(
                    "top-level form is not a tagged list: {}",
                    form
                )));
            };
            match (head.as_str(), rest) {
                ("tags-format-version", [value]) => header.format_version = value.as_integer(),
                ("tags-comment", [value]) => header.comment = value.as_str().map(str::to_string),
                ("timestamp", [value]) => header.timestamp = value.as_integer(),
                ("tags-corpus-name", [value]) => {
                    header.corpus_name = value.as_str().map(str::to_string)
                }
                ("file", fields) => tags.files.push(parse_file(fields)?),
                ("deleted", [Sexp::String(path)]) => tags.deleted.push(path.clone()),
                (other, _) => tracing::debug!("Skipping unknown TAGS form `{}`", other),
            }
        }

        tags.header = header.finish();
        Ok(tags)
    }
}

#[derive(Default)]
struct HeaderFields {
    format_version: Option<u64>,
    comment: Option<String>,
    timestamp: Option<u64>,
    corpus_name: Option<String>,
}

impl HeaderFields {
    fn finish(self) -> Option<TagsHeader> {
        let format_version = self.format_version?;
        Some(TagsHeader {
            format_version,
            comment: self.comment.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or(0),
            corpus_name: self.corpus_name.unwrap_or_default(),
        })
    }
}

fn parse_file(fields: &[Sexp]) -> Result<FileTags> {
    let map = alist_to_map(&Sexp::List(fields.to_vec()))?;
    let text = |key: &str| -> Result<String> {
        map.get(key)
            .and_then(Sexp::as_str)
            .map(str::to_string)
            .ok_or_else(|| TagsError::precondition(format!("file form without a `{}` string", key)))
    };

    let path = text("path")?;
    let language = text("language")?;
    let contents = match map.get("contents") {
        Some(Sexp::List(items)) => items.as_slice(),
        Some(other) => {
            return Err(TagsError::precondition(format!(
                "contents of {} is not a list: {}",
                path, other
            )))
        }
        None => &[],
    };

    let items = contents
        .iter()
        .map(parse_item)
        .collect::<Result<Vec<_>>>()?;

    Ok(FileTags {
        path,
        language,
        items,
    })
}

fn parse_item(item: &Sexp) -> Result<TagItem> {
    let Some([Sexp::Symbol(head), fields @ ..]) = item.as_list() else {
        return Err(TagsError::precondition(format!("not an item form: {}", item)));
    };
    if head != "item" {
        return Err(TagsError::precondition(format!("not an item form: {}", item)));
    }

    let map = alist_to_map(&Sexp::List(fields.to_vec()))?;
    let number = |key: &str| {
        map.get(key)
            .and_then(Sexp::as_integer)
            .ok_or_else(|| TagsError::precondition(format!("item without an integer `{}`", key)))
    };
    let descriptor = map
        .get("descriptor")
        .map(Descriptor::from_sexp)
        .ok_or_else(|| TagsError::precondition("item without a descriptor"))?;

    Ok(TagItem {
        line: number("line")?,
        offset: number("offset")?,
        descriptor,
        snippet: map
            .get("snippet")
            .and_then(Sexp::as_str)
            .map(|s| s.as_bytes().to_vec())
            .unwrap_or_default(),
    })
}

/// Quote bytes for a TAGS file, escaping only `\` and `"`. Other bytes,
/// valid UTF-8 or not, pass through. Text containing NUL is written as `""`.
pub fn lisp_string(text: impl AsRef<[u8]>) -> Vec<u8> {
    let text = text.as_ref();
    if text.contains(&0) {
        return b"\"\"".to_vec();
    }
    let mut quoted = Vec::with_capacity(text.len() + 2);
    quoted.push(b'"');
    for &byte in text {
        if byte == b'\\' || byte == b'"' {
            quoted.push(b'\\');
        }
        quoted.push(byte);
    }
    quoted.push(b'"');
    quoted
}

/// Convert etags text straight into TAGS output.
pub fn convert_etags<W: Write + ?Sized>(
    input: &[u8],
    out: &mut W,
    deleted: &[String],
    options: &TagsFileOptions,
) -> Result<usize> {
    let etags = parse_etags(input)?;
    TagsFile::from_etags(&etags, deleted, options).write_to(out)?;
    Ok(etags.len())
}
