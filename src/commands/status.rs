//! Server maintenance command handlers

use serde_json::json;

use crate::cli::{OutputFormat, ServerFileArgs};
use crate::commands::{encode_toon, render_object, sexp_to_json, to_json_pretty, CommandContext};
use crate::error::Result;
use crate::lang::{CallType, Language};
use crate::sexp::Sexp;

pub fn run_ping(ctx: &CommandContext) -> Result<String> {
    let mut client = ctx.client()?;
    let status = client.check_server_status(&ctx.language, ctx.call_type)?;
    render_status(ctx, None, &status)
}

pub fn run_reload(args: &ServerFileArgs, ctx: &CommandContext) -> Result<String> {
    let mut client = ctx.client()?;
    let status = client.reload_tag_file(&ctx.language, ctx.call_type, &args.file)?;
    render_status(ctx, Some(&args.file), &status)
}

pub fn run_update(args: &ServerFileArgs, ctx: &CommandContext) -> Result<String> {
    let mut client = ctx.client()?;
    let status = client.load_update_file(&ctx.language, ctx.call_type, &args.file)?;
    render_status(ctx, Some(&args.file), &status)
}

pub fn run_restart_mixer(ctx: &CommandContext) -> Result<String> {
    let mut client = ctx.client()?;
    let manager = client.manager_mut();
    manager.restart_mixer()?;

    let settings = manager.mixer_settings();
    let summary = json!({
        "mixer": settings.command,
        "port": settings.port,
        "restarted": true,
    });
    render_object(&summary, ctx.format)
}

/// Run the ports command
pub fn run_ports(ctx: &CommandContext) -> Result<String> {
    let rows: Vec<_> = Language::ALL
        .iter()
        .flat_map(|lang| {
            [CallType::Definition, CallType::Callgraph].map(|call_type| {
                json!({
                    "language": lang.name(),
                    "call_type": call_type.name(),
                    "port": lang.default_port(call_type),
                    "tags_file": lang.tags_file_name(call_type),
                })
            })
        })
        .collect();

    match ctx.format {
        OutputFormat::Json => Ok(format!("{}\n", to_json_pretty(&json!(rows))?)),
        OutputFormat::Toon => Ok(format!("{}\n", encode_toon(&json!({ "servers": rows })))),
        _ => Ok(rows
            .iter()
            .map(|row| {
                format!(
                    "{}\t{}\t{}\t{}\n",
                    row["language"].as_str().unwrap_or_default(),
                    row["call_type"].as_str().unwrap_or_default(),
                    row["port"],
                    row["tags_file"].as_str().unwrap_or_default()
                )
            })
            .collect()),
    }
}

fn render_status(ctx: &CommandContext, file: Option<&str>, status: &Sexp) -> Result<String> {
    let mut summary = json!({
        "language": ctx.language,
        "call_type": ctx.call_type.name(),
    });
    if let Some(file) = file {
        summary["file"] = json!(file);
    }
    summary["status"] = sexp_to_json(status);
    render_object(&summary, ctx.format)
}
