use crate::errors::{ContentError, Result};
use crate::migration::script::MigrationScript;
use crate::model::{ContentChange, ContentDocument, Timestamp, Version};
use serde::Serialize;
use std::fmt;

/// Direction a migration step was run in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationDirection {
    Up,
    Down,
}

impl fmt::Display for MigrationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationDirection::Up => f.write_str("up"),
            MigrationDirection::Down => f.write_str("down"),
        }
    }
}

/// Record of one step that ran
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedMigration {
    pub version: Version,
    pub description: String,
    pub direction: MigrationDirection,
}

/// Result of [`MigrationManager::migrate_content`]
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    /// The migrated document, stamped with the target version
    pub content: ContentDocument,
    /// One change per step that altered the document
    pub changes: Vec<ContentChange>,
    /// Every step that ran, in execution order
    pub applied: Vec<AppliedMigration>,
}

/// Ordered registry of migration scripts
#[derive(Debug, Clone, Default)]
pub struct MigrationManager {
    migrations: Vec<MigrationScript>,
}

impl MigrationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script, keeping the list sorted by version
    ///
    /// # Errors
    ///
    /// `DuplicateMigration` if a script for the same version exists.
    pub fn register_migration(&mut self, script: MigrationScript) -> Result<()> {
        let position = self
            .migrations
            .partition_point(|m| m.version() < script.version());

        if self
            .migrations
            .get(position)
            .is_some_and(|m| m.version() == script.version())
        {
            return Err(ContentError::DuplicateMigration {
                version: script.version().to_string(),
            });
        }

        tracing::debug!(
            version = %script.version(),
            description = script.description(),
            "registered migration"
        );
        self.migrations.insert(position, script);
        Ok(())
    }

    /// Registered versions in ascending order
    pub fn versions(&self) -> Vec<Version> {
        self.migrations.iter().map(|m| *m.version()).collect()
    }

    pub fn latest_version(&self) -> Option<&Version> {
        self.migrations.last().map(|m| m.version())
    }

    pub fn is_registered(&self, version: &Version) -> bool {
        self.index_of(version).is_some()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// True when `document` is at a different version than `target`
    pub fn needs_migration(&self, document: &ContentDocument, target: &Version) -> bool {
        document.version() != target
    }

    /// Migrate `content` from `from` to `to`, stamping `lastUpdated` with now
    ///
    /// # Errors
    ///
    /// - `MigrationPathNotFound` if either version is not registered
    /// - `MigrationFailed` if a step's function fails
    pub fn migrate_content(
        &self,
        content: ContentDocument,
        from: &Version,
        to: &Version,
    ) -> Result<MigrationOutcome> {
        self.migrate_content_at(content, from, to, Timestamp::now())
    }

    /// Migrate a document from its own declared version to `to`
    pub fn migrate_to(&self, content: ContentDocument, to: &Version) -> Result<MigrationOutcome> {
        let from = *content.version();
        self.migrate_content(content, &from, to)
    }

    /// As [`migrate_content`](Self::migrate_content) with an explicit timestamp
    pub fn migrate_content_at(
        &self,
        content: ContentDocument,
        from: &Version,
        to: &Version,
        stamped_at: Timestamp,
    ) -> Result<MigrationOutcome> {
        let not_found = |missing: &Version| ContentError::MigrationPathNotFound {
            from: from.to_string(),
            to: to.to_string(),
            missing: missing.to_string(),
        };
        let from_index = self.index_of(from).ok_or_else(|| not_found(from))?;
        let to_index = self.index_of(to).ok_or_else(|| not_found(to))?;

        let mut document = content;
        let mut changes = Vec::new();
        let mut applied = Vec::new();

        if to_index > from_index {
            for script in &self.migrations[from_index + 1..=to_index] {
                document = run_step(
                    script,
                    MigrationDirection::Up,
                    document,
                    &mut changes,
                    &mut applied,
                )?;
            }
        } else if to_index < from_index {
            for script in self.migrations[to_index + 1..=from_index].iter().rev() {
                document = run_step(
                    script,
                    MigrationDirection::Down,
                    document,
                    &mut changes,
                    &mut applied,
                )?;
            }
        }

        document.set_version(*to);
        document.set_last_updated(stamped_at);

        Ok(MigrationOutcome {
            content: document,
            changes,
            applied,
        })
    }

    fn index_of(&self, version: &Version) -> Option<usize> {
        self.migrations
            .binary_search_by(|m| m.version().cmp(version))
            .ok()
    }
}

fn run_step(
    script: &MigrationScript,
    direction: MigrationDirection,
    document: ContentDocument,
    changes: &mut Vec<ContentChange>,
    applied: &mut Vec<AppliedMigration>,
) -> Result<ContentDocument> {
    let before = document.to_canonical_json();
    let before_value = document.to_value();

    let result = match direction {
        MigrationDirection::Up => script.up(document),
        MigrationDirection::Down => script.down(document),
    };
    let migrated = result.map_err(|e| ContentError::MigrationFailed {
        version: script.version().to_string(),
        direction: direction.to_string(),
        reason: e.to_string(),
    })?;

    if migrated.to_canonical_json() != before {
        changes.push(ContentChange::update(
            format!("migrations/{}", script.version()),
            before_value,
            migrated.to_value(),
        ));
    }

    tracing::debug!(
        version = %script.version(),
        direction = %direction,
        "applied migration step"
    );
    applied.push(AppliedMigration {
        version: *script.version(),
        description: script.description().to_string(),
        direction,
    });

    Ok(migrated)
}
