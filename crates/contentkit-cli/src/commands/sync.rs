//! Sync command
//!
//! Usage: contentkit sync <IDS>... --source <SOURCE> --target <TARGET>
//!        [--dry-run] [--force] [--field-level] [--json]

use crate::commands::CommandResult;
use clap::Args;
use contentkit_core::diff::render_human_summary;
use contentkit_core::{ContentChange, ContentSource, DiffMode};
use contentkit_engine::{AdapterRegistry, ContentConfig, SyncManager, SyncOptions, SyncResult};

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Content ids to sync (e.g. site, page-home)
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Source to read from (local, remote, cdn)
    #[arg(long)]
    pub source: ContentSource,

    /// Target to write to
    #[arg(long)]
    pub target: ContentSource,

    /// Report changes without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite the target even if it changed since it was read
    #[arg(long)]
    pub force: bool,

    /// Report one change per field instead of whole documents
    #[arg(long)]
    pub field_level: bool,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: SyncArgs, config: &ContentConfig) -> CommandResult {
    let manager = SyncManager::new(AdapterRegistry::from_config(config)?);
    let diff_mode = if args.field_level {
        DiffMode::Field
    } else {
        DiffMode::Document
    };
    let options = SyncOptions::new(args.source, args.target)
        .dry_run(args.dry_run)
        .force(args.force)
        .diff_mode(diff_mode);

    let result = manager.sync_content(args.ids.as_slice(), options).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_human(&args.ids, &result);
    }

    if result.success {
        Ok(())
    } else {
        Err(format!("{} content id(s) failed to sync", result.errors.len()).into())
    }
}

fn print_human(ids: &[String], result: &SyncResult) {
    for id in ids {
        if let Some(failure) = result.errors.iter().find(|f| &f.content_id == id) {
            println!("{} FAILED {}", id, failure.message);
            continue;
        }
        let changes: Vec<ContentChange> = result
            .changes
            .iter()
            .filter(|c| &c.content_id == id)
            .map(|c| c.change.clone())
            .collect();
        println!("{}", id);
        for line in render_human_summary(&changes).lines() {
            println!("  {}", line);
        }
    }

    let s = &result.summary;
    println!(
        "{}added {}, updated {}, deleted {}, unchanged {}, failed {}",
        if result.dry_run { "(dry run) " } else { "" },
        s.added,
        s.updated,
        s.deleted,
        s.unchanged,
        s.failed
    );
}
