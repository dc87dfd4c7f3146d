//! CLI entry point for inspecting BCF containers.
//!
//! # Responsibility
//! - Parse one container from disk and print a JSON summary.
//! - With no arguments, print the core version and default log level.

use bcf_core::{default_log_level, init_logging, parse_with_options, BcfDocument, ParseOptions};
use clap::Parser;
use log::info;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "bcf_cli", version, about = "Parse a BCF container and print a JSON summary")]
struct CliArgs {
    /// Container to parse; omit to print version lines.
    path: Option<PathBuf>,
    /// Attach snapshot images before summarizing.
    #[arg(long)]
    images: bool,
    /// Absolute directory for rotating log files.
    #[arg(long)]
    log_dir: Option<String>,
    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long)]
    log_level: Option<String>,
}

fn summarize(document: &BcfDocument) -> Value {
    let topics: Vec<Value> = document
        .topics
        .iter()
        .map(|topic| {
            json!({
                "identifier": topic.identifier,
                "title": topic.title,
                "status": topic.status,
                "type": topic.kind,
                "comments": topic.comments.len(),
                "viewpoints": topic.viewpoints.len(),
                "images": topic.viewpoints.iter().filter(|vp| vp.has_image()).count(),
                "custom_fields": topic.custom_fields.len(),
            })
        })
        .collect();

    json!({
        "filename": document.filename,
        "project": document.project,
        "topics": topics,
        "custom_field_registry": document.custom_field_registry,
        "extensions": document.extensions,
        "documents": document.documents,
    })
}

fn run(args: CliArgs) -> Result<(), String> {
    let Some(path) = args.path else {
        println!("bcf_core version={}", bcf_core::core_version());
        println!("bcf_core default_log_level={}", default_log_level());
        return Ok(());
    };

    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let bytes = std::fs::read(&path)
        .map_err(|err| format!("cannot read `{}`: {err}", path.display()))?;
    let display = path.to_string_lossy();
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(&display);

    let options = ParseOptions {
        eager_images: args.images,
        ..ParseOptions::default()
    };
    let document = parse_with_options(&bytes, filename, &options).map_err(|err| err.to_string())?;
    info!(
        "event=cli_parse module=cli status=ok file={} topics={}",
        filename,
        document.topics.len()
    );

    let summary = serde_json::to_string_pretty(&summarize(&document))
        .map_err(|err| format!("cannot encode summary: {err}"))?;
    println!("{summary}");
    Ok(())
}

fn main() -> ExitCode {
    match run(CliArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
