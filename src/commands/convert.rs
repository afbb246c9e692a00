//! Conversion command handlers - etags to TAGS, and TAGS inspection

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::json;

use crate::cli::{ConvertArgs, InspectArgs, OutputFormat};
use crate::commands::{render_object, CommandContext};
use crate::convert::etags::parse_etags;
use crate::convert::{Descriptor, TagsFile, TagsFileOptions};
use crate::error::{Result, TagsError};
use crate::fs_utils::{open_output, write_atomic};

/// Run the convert command
pub fn run_convert(args: &ConvertArgs, ctx: &CommandContext) -> Result<String> {
    let input = read_input(&args.input)?;
    let deleted = match &args.deletion_list {
        Some(path) => read_deletion_list(path)?,
        None => Vec::new(),
    };

    let options = TagsFileOptions {
        corpus_name: ctx.config.corpus.clone(),
        language: ctx.language.clone(),
        guess_language: args.guess_language,
        callers: ctx.call_type.is_callgraph(),
        header: !args.no_header,
        timestamp: args.timestamp,
    };

    let etags = parse_etags(&input)?;
    let tags = TagsFile::from_etags(&etags, &deleted, &options);
    let mut rendered = Vec::new();
    tags.write_to(&mut rendered)?;

    if args.output == "-" {
        let mut out = open_output("-", false)?;
        out.write_all(&rendered)?;
        out.flush()?;
        return Ok(String::new());
    }

    write_atomic(Path::new(&args.output), &rendered)?;
    tracing::debug!("Wrote {} bytes to {}", rendered.len(), args.output);

    let summary = json!({
        "output": args.output,
        "files": tags.files.len(),
        "items": tags.files.iter().map(|f| f.items.len()).sum::<usize>(),
        "deleted": tags.deleted.len(),
    });
    render_object(&summary, ctx.format)
}

/// Run the inspect command
pub fn run_inspect(args: &InspectArgs, ctx: &CommandContext) -> Result<String> {
    if !args.path.exists() {
        return Err(TagsError::FileNotFound {
            path: args.path.display().to_string(),
        });
    }
    let bytes = fs::read(&args.path)?;
    let tags = TagsFile::parse(&String::from_utf8_lossy(&bytes))?;

    let files: Vec<_> = tags
        .files
        .iter()
        .map(|f| {
            let calls = f
                .items
                .iter()
                .filter(|i| matches!(i.descriptor, Descriptor::Call(_)))
                .count();
            json!({
                "path": f.path,
                "language": f.language,
                "items": f.items.len(),
                "calls": calls,
            })
        })
        .collect();

    let mut summary = json!({});
    if let Some(header) = &tags.header {
        summary["format_version"] = json!(header.format_version);
        summary["corpus"] = json!(header.corpus_name);
        summary["timestamp"] = json!(header.timestamp);
    }
    summary["file_count"] = json!(files.len());
    summary["deleted"] = json!(tags.deleted);

    match ctx.format {
        OutputFormat::Json | OutputFormat::Toon => {
            summary["files"] = json!(files);
            render_object(&summary, ctx.format)
        }
        _ => {
            let mut out = render_object(&summary, ctx.format)?;
            for file in &files {
                out.push_str(&format!(
                    "  {} ({}): {} items, {} calls\n",
                    file["path"].as_str().unwrap_or_default(),
                    file["language"].as_str().unwrap_or_default(),
                    file["items"],
                    file["calls"]
                ));
            }
            Ok(out)
        }
    }
}

/// Raw etags bytes; snippets are never decoded.
fn read_input(input: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    if input == "-" {
        io::stdin().read_to_end(&mut bytes)?;
    } else {
        let path = Path::new(input);
        if !path.exists() {
            return Err(TagsError::FileNotFound {
                path: input.to_string(),
            });
        }
        bytes = fs::read(path)?;
    }
    Ok(bytes)
}

fn read_deletion_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TagsError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => TagsError::Io(e),
    })?;
    Ok(content
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
