//! Content store adapters
//!
//! One adapter per [`ContentSource`]. All adapters speak the same contract so
//! sync and loading code never branch on where a document lives.

mod cdn;
mod local;
mod memory;
mod remote;

pub use cdn::CdnAdapter;
pub use local::LocalAdapter;
pub use memory::MemoryAdapter;
pub use remote::RemoteAdapter;

use crate::errors::Result;
use async_trait::async_trait;
use contentkit_core::errors::{ExError, ExErrorKind};
use contentkit_core::{ContentDocument, ContentSource, Version};
use reqwest::Url;
use std::fmt;

/// Parse an HTTP adapter's base URL
fn parse_base_url(adapter: &str, base_url: &str) -> Result<Url> {
    let config_error = |reason: String| {
        ExError::new(ExErrorKind::Config)
            .with_op("parse_base_url")
            .with_adapter(adapter)
            .with_message(reason)
    };
    let url = Url::parse(base_url).map_err(|e| config_error(format!("invalid base url '{}': {}", base_url, e)))?;
    if url.cannot_be_a_base() {
        return Err(config_error(format!("'{}' cannot be used as a base url", base_url)));
    }
    Ok(url)
}

/// Append path segments to `base`, percent-encoding each one
///
/// `#`, `?` and `%` inside a segment stay part of the path.
fn join_segments<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Condition the target must satisfy for a save to proceed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePrecondition {
    /// Overwrite unconditionally
    #[default]
    None,
    /// Nothing may be stored under the id yet
    Absent,
    /// The stored document must be at exactly this version
    Version(Version),
}

impl fmt::Display for WritePrecondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritePrecondition::None => f.write_str("none"),
            WritePrecondition::Absent => f.write_str("absent"),
            WritePrecondition::Version(v) => write!(f, "version={}", v),
        }
    }
}

impl WritePrecondition {
    /// Check against the currently stored version (`None` when absent)
    ///
    /// Returns a human-readable reason when the precondition fails.
    pub fn check(&self, current: Option<&Version>) -> std::result::Result<(), String> {
        match (self, current) {
            (WritePrecondition::None, _) => Ok(()),
            (WritePrecondition::Absent, None) => Ok(()),
            (WritePrecondition::Absent, Some(found)) => Err(format!(
                "expected no stored document, found version {}",
                found
            )),
            (WritePrecondition::Version(expected), Some(found)) if expected == found => Ok(()),
            (WritePrecondition::Version(expected), Some(found)) => Err(format!(
                "expected stored version {}, found {}",
                expected, found
            )),
            (WritePrecondition::Version(expected), None) => Err(format!(
                "expected stored version {}, found nothing",
                expected
            )),
        }
    }
}

/// Load and save content documents at one source
#[async_trait]
pub trait ContentAdapter: Send + Sync {
    fn source(&self) -> ContentSource;

    /// Load the document stored under `content_id`
    ///
    /// # Errors
    ///
    /// `NotFound` when nothing is stored, `ValidationError` when the stored
    /// document is malformed, plus adapter-specific I/O kinds.
    async fn load(&self, content_id: &str) -> Result<ContentDocument>;

    /// Store `document` under `content_id`
    ///
    /// # Errors
    ///
    /// `Conflict` when `precondition` fails, `WriteError` on I/O or
    /// authorization failure, `UnsupportedOperation` for read-only sources.
    async fn save(
        &self,
        content_id: &str,
        document: &ContentDocument,
        precondition: WritePrecondition,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_are_percent_encoded() {
        let base = parse_base_url("remote", "http://api.example.test/v1/").unwrap();
        let url = join_segments(&base, ["content", "faq#v2"]);
        assert_eq!(url.as_str(), "http://api.example.test/v1/content/faq%23v2");
        assert_eq!(url.fragment(), None);

        let url = join_segments(&base, ["content", "pricing?draft=1"]);
        assert_eq!(url.as_str(), "http://api.example.test/v1/content/pricing%3Fdraft=1");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_base_url_must_be_hierarchical() {
        let err = parse_base_url("cdn", "mailto:ops@example.test").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Config);
        assert!(parse_base_url("cdn", "not a url").is_err());
    }

    #[test]
    fn test_precondition_check() {
        let v1 = Version::new(1, 0, 0);
        let v2 = Version::new(2, 0, 0);
        assert!(WritePrecondition::None.check(Some(&v1)).is_ok());
        assert!(WritePrecondition::Absent.check(None).is_ok());
        assert!(WritePrecondition::Absent.check(Some(&v1)).is_err());
        assert!(WritePrecondition::Version(v1).check(Some(&v1)).is_ok());
        assert!(WritePrecondition::Version(v1).check(Some(&v2)).is_err());
        assert!(WritePrecondition::Version(v1).check(None).is_err());
    }
}
