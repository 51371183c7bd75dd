//! Diff command
//!
//! Usage: contentkit diff <ID> --source <SOURCE> --target <TARGET> [--field-level]

use crate::commands::CommandResult;
use clap::Args;
use contentkit_core::diff::{compare_with, render_human_summary};
use contentkit_core::{ContentSource, DiffMode};
use contentkit_engine::{AdapterRegistry, ContentConfig};

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Content id to compare
    pub id: String,

    #[arg(long)]
    pub source: ContentSource,

    #[arg(long)]
    pub target: ContentSource,

    /// Report one change per field instead of whole documents
    #[arg(long)]
    pub field_level: bool,

    /// Print changes as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: DiffArgs, config: &ContentConfig) -> CommandResult {
    let registry = AdapterRegistry::from_config(config)?;
    let source = registry.get(args.source)?;
    let target = registry.get(args.target)?;

    let source_doc = source.load(&args.id).await?;
    let target_doc = match target.load(&args.id).await {
        Ok(doc) => Some(doc),
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(e.into()),
    };

    let mode = if args.field_level {
        DiffMode::Field
    } else {
        DiffMode::Document
    };
    let changes = compare_with(mode, &source_doc, target_doc.as_ref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
    } else {
        print!("{}", render_human_summary(&changes));
    }
    Ok(())
}
