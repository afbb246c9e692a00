//! Call-site extraction for reverse call graph tag files
//!
//! Every `identifier(` on a line becomes one etags entry whose snippet is the
//! whole line. The output feeds [`super::tags_file`] with `callers` set.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use regex::bytes::Regex;

use crate::error::{Result, TagsError};

use super::etags::{EtagsEntry, EtagsFile, SNIPPET_END, TAG_END};

/// Identifier immediately followed by an opening parenthesis
pub const CALL_PATTERN: &str = r"([a-zA-Z_][a-zA-Z0-9_]*)\(";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallgraphStats {
    pub files: usize,
    pub call_sites: usize,
    /// Files that could not be read and were left out
    pub failed: Vec<String>,
}

pub struct CallgraphExtractor {
    pattern: Regex,
}

impl CallgraphExtractor {
    pub fn new() -> Result<Self> {
        Self::with_pattern(CALL_PATTERN)
    }

    /// Use a custom pattern; its first capture group is the callee name.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| TagsError::Config {
            message: format!("Invalid call pattern: {}", e),
        })?;
        Ok(Self { pattern })
    }

    /// Distinct callee names on one line, in order of first appearance.
    pub fn call_sites(&self, line: &[u8]) -> Vec<String> {
        let mut seen = HashSet::new();
        self.pattern
            .captures_iter(line)
            .filter_map(|caps| caps.get(1).map(|m| m.as_bytes()))
            .filter(|name| seen.insert(*name))
            .map(|name| String::from_utf8_lossy(name).into_owned())
            .collect()
    }

    /// Build the etags section for one file's content.
    ///
    /// Lines are measured on the raw bytes, so offsets stay exact for
    /// files that are not valid UTF-8.
    pub fn extract(&self, path: &str, content: &[u8]) -> EtagsFile {
        let mut file = EtagsFile::new(path, content.len() as u64);
        let mut offset = 0u64;

        for (index, raw) in content.split_inclusive(|b| *b == b'\n').enumerate() {
            let line = raw.strip_suffix(b"\n").unwrap_or(raw);
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            let names = self.call_sites(line);
            if !names.is_empty() {
                let snippet = escape_snippet(line);
                for name in names {
                    file.entries.push(EtagsEntry {
                        snippet: snippet.clone(),
                        tag: name,
                        line: index as u64 + 1,
                        offset,
                    });
                }
            }
            offset += raw.len() as u64;
        }

        file
    }

    /// Read each path and write its section to `out`.
    ///
    /// Unreadable files are logged, recorded in the stats and skipped.
    pub fn extract_paths<P: AsRef<Path>, W: Write + ?Sized>(
        &self,
        paths: &[P],
        out: &mut W,
    ) -> Result<CallgraphStats> {
        let mut stats = CallgraphStats::default();

        for path in paths {
            let path = path.as_ref();
            let name = path.to_string_lossy().into_owned();
            let bytes = match fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("error processing file: {}: {}", name, e);
                    stats.failed.push(name);
                    continue;
                }
            };

            let file = self.extract(&name, &bytes);
            file.write_to(out)?;

            stats.files += 1;
            stats.call_sites += file.entries.len();
        }

        Ok(stats)
    }
}

/// Escape the etags separators so a snippet cannot end early.
pub fn escape_snippet(line: &[u8]) -> Vec<u8> {
    let mut escaped = Vec::with_capacity(line.len());
    for &byte in line {
        match byte {
            SNIPPET_END => escaped.extend_from_slice(b"\\0x7f"),
            TAG_END => escaped.extend_from_slice(b"\\0x01"),
            _ => escaped.push(byte),
        }
    }
    escaped
}
