//! Editor-facing renderings of tag records
//!
//! Paths are prefixed with `gtags://` so the editor can resolve them against
//! the local checkout when the buffer is opened.

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::protocol::TagRecord;

pub const TAG_URL_SCHEME: &str = "gtags://";

/// `tag<TAB>gtags://file<TAB>line`, the format of a vi `tags` file.
pub fn vi_tag_line(tag: &TagRecord) -> String {
    format!("{}\t{}{}\t{}", tag.tag, TAG_URL_SCHEME, tag.filename, tag.line)
}

/// `gtags://file|line|snippet`, readable as a quickfix/grep list.
pub fn grep_line(tag: &TagRecord) -> String {
    format!("{}{}|{}|{}", TAG_URL_SCHEME, tag.filename, tag.line, tag.snippet)
}

/// `file|line| snippet` with the snippet trimmed.
pub fn short_list_line(tag: &TagRecord) -> String {
    format!("{}|{}| {}", tag.filename, tag.line, tag.snippet.trim())
}

/// `file|line|` padded so the tag name and snippet start near `width`.
pub fn long_list_line(tag: &TagRecord, width: usize) -> String {
    let reference = format!("{}|{}|", tag.filename, tag.line);
    let used = tag.tag.chars().count() + reference.chars().count();
    let spaces = width.saturating_sub(used).max(1);
    format!("{}{}{}{}", reference, " ".repeat(spaces), tag.tag, tag.snippet)
}

/// Sorted, de-duplicated tag names for completion menus.
pub fn completion_names(tags: &[TagRecord]) -> Vec<String> {
    tags.iter()
        .map(|t| t.tag.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn write_vi_tags<W: Write + ?Sized>(out: &mut W, tags: &[TagRecord]) -> io::Result<()> {
    for tag in tags {
        writeln!(out, "{}", vi_tag_line(tag))?;
    }
    Ok(())
}

/// Strip the `gtags://` prefix, if present.
pub fn strip_tag_url(name: &str) -> Option<&str> {
    name.strip_prefix(TAG_URL_SCHEME)
}

/// Find a tag path on disk: first under `project_root`, then under `cwd`.
/// Falls back to the path as given when neither exists.
pub fn resolve_filename(name: &str, project_root: Option<&Path>, cwd: &Path) -> PathBuf {
    project_root
        .into_iter()
        .chain(std::iter::once(cwd))
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.exists())
        .unwrap_or_else(|| PathBuf::from(name))
}
