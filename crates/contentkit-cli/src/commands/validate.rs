//! Validate command
//!
//! Usage: contentkit validate <IDS>... [--source <SOURCE>]

use crate::commands::CommandResult;
use clap::Args;
use contentkit_core::ContentSource;
use contentkit_engine::{AdapterRegistry, ContentConfig};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Content ids to check
    #[arg(required = true)]
    pub ids: Vec<String>,

    #[arg(long, default_value = "local")]
    pub source: ContentSource,
}

pub async fn execute(args: ValidateArgs, config: &ContentConfig) -> CommandResult {
    let registry = AdapterRegistry::from_config(config)?;
    let adapter = registry.get(args.source)?;

    let mut invalid = 0usize;
    for id in &args.ids {
        match adapter.load(id).await {
            Ok(doc) => println!(
                "ok {} (version {}, updated {})",
                id,
                doc.version(),
                doc.last_updated().as_str()
            ),
            Err(e) => {
                invalid += 1;
                println!("invalid {}: {}", id, e);
            }
        }
    }

    if invalid == 0 {
        Ok(())
    } else {
        Err(format!("{} of {} document(s) invalid", invalid, args.ids.len()).into())
    }
}
