use crate::errors::Result;
use crate::model::{ContentDocument, Version};
use std::fmt;
use std::sync::Arc;

/// A document transformation used as the `up` or `down` half of a migration
pub type MigrationFn = Arc<dyn Fn(ContentDocument) -> Result<ContentDocument> + Send + Sync>;

/// One versioned transformation step
///
/// `version` is the schema version the document has after `up`. `down` must
/// be the inverse of `up` for everything except `version`/`lastUpdated`, which
/// the manager stamps itself.
#[derive(Clone)]
pub struct MigrationScript {
    version: Version,
    description: String,
    up: MigrationFn,
    down: MigrationFn,
}

impl MigrationScript {
    pub fn new<U, D>(version: Version, description: impl Into<String>, up: U, down: D) -> Self
    where
        U: Fn(ContentDocument) -> Result<ContentDocument> + Send + Sync + 'static,
        D: Fn(ContentDocument) -> Result<ContentDocument> + Send + Sync + 'static,
    {
        Self {
            version,
            description: description.into(),
            up: Arc::new(up),
            down: Arc::new(down),
        }
    }

    /// A script that marks a baseline version and changes nothing
    pub fn baseline(version: Version, description: impl Into<String>) -> Self {
        Self::new(version, description, |doc| Ok(doc), |doc| Ok(doc))
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn up(&self, document: ContentDocument) -> Result<ContentDocument> {
        (self.up)(document)
    }

    pub fn down(&self, document: ContentDocument) -> Result<ContentDocument> {
        (self.down)(document)
    }
}

impl fmt::Debug for MigrationScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationScript")
            .field("version", &self.version)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
