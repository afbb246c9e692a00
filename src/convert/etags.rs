//! Exuberant etags text
//!
//! ```text
//! \x0c
//! path,size
//! snippet\x7ftag\x01line,offset
//! ```

use std::io::{self, Write};

use crate::error::{Result, TagsError};

/// Line that announces a new file section
pub const SECTION_MARK: &[u8] = b"\x0c";

/// Separates the snippet from the tag name
pub const SNIPPET_END: u8 = 0x7f;

/// Separates the tag name from `line,offset`
pub const TAG_END: u8 = 0x01;

/// One tagged line. The snippet keeps the source bytes as they were.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtagsEntry {
    pub snippet: Vec<u8>,
    pub tag: String,
    pub line: u64,
    pub offset: u64,
}

/// One `\x0c` section: a source file and its tagged lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtagsFile {
    pub path: String,
    pub size: u64,
    pub entries: Vec<EtagsEntry>,
}

impl EtagsFile {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            entries: Vec::new(),
        }
    }

    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(SECTION_MARK)?;
        writeln!(out)?;
        writeln!(out, "{},{}", self.path, self.size)?;
        for entry in &self.entries {
            out.write_all(&entry.snippet)?;
            out.write_all(&[SNIPPET_END])?;
            out.write_all(entry.tag.as_bytes())?;
            out.write_all(&[TAG_END])?;
            writeln!(out, "{},{}", entry.line, entry.offset)?;
        }
        Ok(())
    }
}

/// Lines split on `\n` with a trailing `\r` dropped, like `str::lines`.
fn byte_lines(input: &[u8]) -> impl Iterator<Item = &[u8]> {
    input
        .split_inclusive(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\n").unwrap_or(line))
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// Split etags text into file sections.
///
/// Entry lines without a `\x01` carry no tag name and are skipped. Snippets
/// are not decoded; paths and tag names are read as UTF-8, lossily.
pub fn parse_etags(input: &[u8]) -> Result<Vec<EtagsFile>> {
    let mut files: Vec<EtagsFile> = Vec::new();
    let mut expect_header = false;

    for (index, line) in byte_lines(input).enumerate() {
        let line_no = index + 1;

        if line == SECTION_MARK {
            expect_header = true;
            continue;
        }

        if expect_header {
            expect_header = false;
            files.push(parse_header(&String::from_utf8_lossy(line), line_no)?);
            continue;
        }

        let Some(tag_end) = line.iter().position(|b| *b == TAG_END) else {
            continue;
        };

        let file = files.last_mut().ok_or_else(|| TagsError::MalformedEtags {
            line: line_no,
            message: "tag entry before the first file header".to_string(),
        })?;
        file.entries.push(parse_entry(line, tag_end, line_no)?);
    }

    Ok(files)
}

fn parse_header(line: &str, line_no: usize) -> Result<EtagsFile> {
    let (path, size) = line.rsplit_once(',').ok_or_else(|| TagsError::MalformedEtags {
        line: line_no,
        message: format!("expected `path,size`, found {:?}", line),
    })?;
    let size = size.trim().parse().map_err(|_| TagsError::MalformedEtags {
        line: line_no,
        message: format!("bad file size {:?}", size),
    })?;
    Ok(EtagsFile::new(path, size))
}

fn parse_entry(line: &[u8], tag_end: usize, line_no: usize) -> Result<EtagsEntry> {
    let malformed = |message: String| TagsError::MalformedEtags {
        line: line_no,
        message,
    };

    let snippet_end = line[..tag_end]
        .iter()
        .position(|b| *b == SNIPPET_END)
        .ok_or_else(|| malformed("missing \\x7f before the tag name".to_string()))?;

    let position = String::from_utf8_lossy(&line[tag_end + 1..]);
    let (lineno, offset) = position
        .split_once(',')
        .ok_or_else(|| malformed(format!("expected `line,offset`, found {:?}", position)))?;
    let parse_num = |text: &str| {
        text.trim()
            .parse::<u64>()
            .map_err(|_| malformed(format!("bad number {:?}", text)))
    };

    Ok(EtagsEntry {
        snippet: line[..snippet_end].to_vec(),
        tag: String::from_utf8_lossy(&line[snippet_end + 1..tag_end]).into_owned(),
        line: parse_num(lineno)?,
        offset: parse_num(offset)?,
    })
}
