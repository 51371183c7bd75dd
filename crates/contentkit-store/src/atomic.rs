//! Atomic write primitives
//!
//! Uses temp->rename so readers never see a partially written document

use crate::errors::{io_error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

fn temp_path_for(target_path: &Path) -> PathBuf {
    let file_name = target_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target_path.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4().simple()))
}

/// Atomically write bytes to a file, creating parent directories
pub async fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error("create_content_dir", e))?;
    }

    let temp_path = temp_path_for(target_path);
    fs::write(&temp_path, content)
        .await
        .map_err(|e| io_error("write_content_temp", e))?;

    if let Err(e) = fs::rename(&temp_path, target_path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(io_error("rename_content_temp", e));
    }
    Ok(())
}
