//! Assign command
//!
//! Usage: contentkit assign --test <FILE> [--user <ID>]

use crate::commands::CommandResult;
use clap::Args;
use contentkit_core::AbTest;
use contentkit_engine::experiments::open_assigner;
use contentkit_engine::ContentConfig;
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct AssignArgs {
    /// JSON file with the test definition
    #[arg(long)]
    pub test: PathBuf,

    /// Preview for this user id instead of the stored visitor identity
    #[arg(long)]
    pub user: Option<String>,
}

pub fn execute(args: AssignArgs, config: &ContentConfig) -> CommandResult {
    let bytes = std::fs::read(&args.test)
        .map_err(|e| format!("cannot read {}: {}", args.test.display(), e))?;
    let test = AbTest::from_json_slice(&bytes).map_err(contentkit_core::ExError::from)?;

    let assigner = open_assigner(config, args.user.as_deref())?;
    let variant = assigner.get_variant(&test).map_err(contentkit_core::ExError::from)?;

    let output = json!({
        "testId": test.id,
        "variantId": variant.as_ref().map(|v| v.id.clone()),
        "content": variant.map(|v| v.content),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
