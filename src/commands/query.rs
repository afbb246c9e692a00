//! Lookup command handlers - tag queries against the selected server family

use std::env;

use serde_json::json;

use crate::cli::{FileArgs, LookupArgs, OutputFormat, ResolveArgs};
use crate::commands::{render_names, render_object, render_tags, CommandContext};
use crate::convert::{completion_names, resolve_filename, strip_tag_url, write_vi_tags};
use crate::error::Result;
use crate::fs_utils::write_atomic;

/// Run the lookup command
pub fn run_lookup(args: &LookupArgs, ctx: &CommandContext) -> Result<String> {
    let mut client = ctx.client()?;
    let (language, call_type) = (ctx.language.as_str(), ctx.call_type);

    let tags = if args.regexp {
        client.find_matching_tags(language, call_type, &args.tag)?
    } else if args.snippet {
        client.search_tag_snippets(language, call_type, &args.tag)?
    } else {
        client.find_exact_tag(language, call_type, &args.tag)?
    };

    if let Some(path) = &args.tags_file {
        let mut out = Vec::new();
        write_vi_tags(&mut out, &tags)?;
        write_atomic(path, &out)?;
        tracing::debug!("Wrote {} tags to {}", tags.len(), path.display());

        let summary = json!({
            "tags_file": path.display().to_string(),
            "tags": tags.len(),
        });
        return render_object(&summary, ctx.format);
    }

    if args.names {
        return render_names(&completion_names(&tags), ctx.format);
    }
    render_tags(&tags, ctx.format)
}

/// Run the file command
pub fn run_file(args: &FileArgs, ctx: &CommandContext) -> Result<String> {
    let mut client = ctx.client()?;
    let tags = client.list_tags_for_file(&ctx.language, ctx.call_type, &args.path)?;
    render_tags(&tags, ctx.format)
}

/// Run the resolve command
pub fn run_resolve(args: &ResolveArgs, ctx: &CommandContext) -> Result<String> {
    let name = strip_tag_url(&args.name).unwrap_or(args.name.as_str());
    let cwd = env::current_dir()?;
    let path = resolve_filename(name, args.root.as_deref(), &cwd);

    match ctx.format {
        OutputFormat::Json | OutputFormat::Toon => {
            let summary = json!({
                "name": name,
                "path": path.display().to_string(),
                "exists": path.exists(),
            });
            render_object(&summary, ctx.format)
        }
        _ => Ok(format!("{}\n", path.display())),
    }
}
