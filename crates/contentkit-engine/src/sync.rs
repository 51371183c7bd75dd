//! Batch content synchronization between two sources
//!
//! For each content id, in order:
//! 1. load from the source adapter
//! 2. load from the target adapter (`NotFound` means the target is absent)
//! 3. compare (document or field mode)
//! 4. unless `dry_run`, save the source document to the target when they differ
//!
//! A failure for one id is recorded and the batch moves on. Only setup errors
//! (unknown adapter, source equal to target) fail the whole call.

use crate::registry::AdapterRegistry;
use contentkit_core::diff::compare_with;
use contentkit_core::errors::{ExError, ExErrorKind};
use contentkit_core::{
    log_op_end, log_op_error, log_op_start, ChangeOperation, ContentChange, ContentSource,
    DiffMode,
};
use contentkit_core_types::RequestId;
use contentkit_store::{ContentAdapter, Result, WritePrecondition};
use serde::Serialize;

/// Options for [`SyncManager::sync_content`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub source: ContentSource,
    pub target: ContentSource,
    /// Compare only; never write to the target
    pub dry_run: bool,
    /// Overwrite the target even if it changed since it was read
    pub force: bool,
    pub diff_mode: DiffMode,
}

impl SyncOptions {
    pub fn new(source: ContentSource, target: ContentSource) -> Self {
        Self {
            source,
            target,
            dry_run: false,
            force: false,
            diff_mode: DiffMode::Document,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn diff_mode(mut self, diff_mode: DiffMode) -> Self {
        self.diff_mode = diff_mode;
        self
    }
}

/// A change tagged with the content id it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncChange {
    pub content_id: String,
    #[serde(flatten)]
    pub change: ContentChange,
}

/// Why one content id could not be synced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailure {
    pub content_id: String,
    /// Stable error code, e.g. `ERR_NOT_FOUND`
    pub code: String,
    pub message: String,
}

impl SyncFailure {
    fn from_error(content_id: &str, err: &ExError) -> Self {
        Self {
            content_id: content_id.to_string(),
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Per-id outcome counts; every id lands in exactly one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl SyncSummary {
    pub fn total(&self) -> usize {
        self.added + self.updated + self.deleted + self.unchanged + self.failed
    }

    fn record(&mut self, changes: &[ContentChange]) {
        let has = |op: ChangeOperation| changes.iter().any(|c| c.operation == op);
        if changes.is_empty() {
            self.unchanged += 1;
        } else if has(ChangeOperation::Add) {
            self.added += 1;
        } else if has(ChangeOperation::Delete) {
            self.deleted += 1;
        } else {
            self.updated += 1;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    /// True when no id failed
    pub success: bool,
    pub dry_run: bool,
    pub changes: Vec<SyncChange>,
    pub errors: Vec<SyncFailure>,
    pub summary: SyncSummary,
    pub request_id: RequestId,
}

pub struct SyncManager {
    registry: AdapterRegistry,
}

impl SyncManager {
    pub fn new(registry: AdapterRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Synchronize `content_ids` from `options.source` to `options.target`
    ///
    /// # Errors
    ///
    /// `InvalidInput` when source and target are the same or either has no
    /// adapter. Per-id failures are reported in [`SyncResult::errors`].
    pub async fn sync_content<S>(&self, content_ids: &[S], options: SyncOptions) -> Result<SyncResult>
    where
        S: AsRef<str> + Sync,
    {
        let request_id = RequestId::new();
        log_op_start!(
            "sync_content",
            request_id = request_id.as_str(),
            source = options.source.as_str(),
            target = options.target.as_str(),
            dry_run = options.dry_run,
            force = options.force
        );
        let start = std::time::Instant::now();

        let result = self
            .sync_content_impl(content_ids, options, request_id.clone())
            .await
            .map_err(|e| {
                let e = e.with_request_id(request_id.clone());
                log_op_error!(
                    "sync_content",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                e
            })?;

        log_op_end!(
            "sync_content",
            duration_ms = start.elapsed().as_millis() as u64,
            change_count = result.changes.len(),
            error_count = result.errors.len()
        );
        Ok(result)
    }

    async fn sync_content_impl<S>(
        &self,
        content_ids: &[S],
        options: SyncOptions,
        request_id: RequestId,
    ) -> Result<SyncResult>
    where
        S: AsRef<str> + Sync,
    {
        if options.source == options.target {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("sync_content")
                .with_message(format!(
                    "source and target are both '{}'",
                    options.source
                )));
        }
        let source = self.registry.get(options.source)?;
        let target = self.registry.get(options.target)?;

        let mut changes = Vec::new();
        let mut errors = Vec::new();
        let mut summary = SyncSummary::default();

        for content_id in content_ids {
            let content_id = content_id.as_ref();
            match sync_one(content_id, source.as_ref(), target.as_ref(), &options).await {
                Ok(id_changes) => {
                    summary.record(&id_changes);
                    changes.extend(id_changes.into_iter().map(|change| SyncChange {
                        content_id: content_id.to_string(),
                        change,
                    }));
                }
                Err(err) => {
                    let err = err
                        .with_content_id(content_id)
                        .with_request_id(request_id.clone());
                    tracing::warn!(
                        content_id,
                        request_id = request_id.as_str(),
                        err.code = err.code(),
                        message = %err,
                        "content id failed to sync"
                    );
                    summary.failed += 1;
                    errors.push(SyncFailure::from_error(content_id, &err));
                }
            }
        }

        Ok(SyncResult {
            success: errors.is_empty(),
            dry_run: options.dry_run,
            changes,
            errors,
            summary,
            request_id,
        })
    }
}

async fn sync_one(
    content_id: &str,
    source: &dyn ContentAdapter,
    target: &dyn ContentAdapter,
    options: &SyncOptions,
) -> Result<Vec<ContentChange>> {
    let source_doc = source.load(content_id).await?;
    let target_doc = match target.load(content_id).await {
        Ok(doc) => Some(doc),
        Err(err) if err.is_not_found() => None,
        Err(err) => return Err(err),
    };

    let changes = compare_with(options.diff_mode, &source_doc, target_doc.as_ref());
    if changes.is_empty() || options.dry_run {
        tracing::debug!(
            content_id,
            change_count = changes.len(),
            dry_run = options.dry_run,
            "no write needed"
        );
        return Ok(changes);
    }

    let precondition = match (&target_doc, options.force) {
        (_, true) => WritePrecondition::None,
        (None, false) => WritePrecondition::Absent,
        (Some(doc), false) => WritePrecondition::Version(*doc.version()),
    };
    target.save(content_id, &source_doc, precondition).await?;
    tracing::debug!(content_id, change_count = changes.len(), %precondition, "target updated");

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_uses_strongest_operation() {
        let mut summary = SyncSummary::default();
        summary.record(&[]);
        summary.record(&[ContentChange::add("content", json!({}))]);
        summary.record(&[
            ContentChange::update("version", json!("1.0.0"), json!("1.1.0")),
            ContentChange::update("content", json!({}), json!({"a": 1})),
        ]);
        summary.record(&[
            ContentChange::update("title", json!("a"), json!("b")),
            ContentChange::delete("draft", json!(true)),
        ]);
        assert_eq!(
            summary,
            SyncSummary {
                added: 1,
                updated: 1,
                deleted: 1,
                unchanged: 1,
                failed: 0
            }
        );
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_sync_change_serializes_flat() {
        let change = SyncChange {
            content_id: "site".into(),
            change: ContentChange::update("version", json!("1.0.0"), json!("1.1.0")),
        };
        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(value["contentId"], "site");
        assert_eq!(value["path"], "version");
        assert_eq!(value["operation"], "update");
    }
}
