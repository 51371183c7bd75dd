//! Content id to file layout mapping
//!
//! ```text
//! site          -> /content/config/site.json
//! page-<name>   -> /content/pages/<name>.json
//! <anything>    -> /content/data/<id>.json
//! ```

use crate::errors::Result;
use contentkit_core::errors::{ExError, ExErrorKind};

pub const SITE_CONFIG_ID: &str = "site";
pub const PAGE_PREFIX: &str = "page-";

/// Build a content id for a page name
pub fn page_id(name: &str) -> String {
    format!("{}{}", PAGE_PREFIX, name)
}

/// Reject ids that cannot be used as a single path segment
///
/// # Errors
///
/// `InvalidInput` for an empty id, a path separator, `..`, or control
/// characters.
pub fn validate_content_id(content_id: &str) -> Result<()> {
    let reason = if content_id.trim().is_empty() {
        Some("content id must not be empty")
    } else if content_id.contains('/') || content_id.contains('\\') {
        Some("content id must not contain path separators")
    } else if content_id.contains("..") {
        Some("content id must not contain '..'")
    } else if content_id.chars().any(char::is_control) {
        Some("content id must not contain control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("content_path")
            .with_content_id(content_id)
            .with_message(reason)),
        None => Ok(()),
    }
}

/// Absolute layout path of a content id
///
/// # Errors
///
/// See [`validate_content_id`]. `page-` with an empty name is also rejected.
pub fn content_path(content_id: &str) -> Result<String> {
    validate_content_id(content_id)?;

    if content_id == SITE_CONFIG_ID {
        return Ok("/content/config/site.json".to_string());
    }
    if let Some(name) = content_id.strip_prefix(PAGE_PREFIX) {
        if name.is_empty() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("content_path")
                .with_content_id(content_id)
                .with_message("page id has no name"));
        }
        return Ok(format!("/content/pages/{}.json", name));
    }
    Ok(format!("/content/data/{}.json", content_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        assert_eq!(content_path("site").unwrap(), "/content/config/site.json");
        assert_eq!(content_path("page-home").unwrap(), "/content/pages/home.json");
        assert_eq!(content_path(&page_id("about")).unwrap(), "/content/pages/about.json");
        assert_eq!(content_path("pricing").unwrap(), "/content/data/pricing.json");
        assert_eq!(content_path("site-footer").unwrap(), "/content/data/site-footer.json");
    }

    #[test]
    fn test_rejects_traversal() {
        for bad in ["", "  ", "../etc", "a/b", "a\\b", "x..y", "page-"] {
            let err = content_path(bad).unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::InvalidInput, "{bad:?}");
        }
    }
}
