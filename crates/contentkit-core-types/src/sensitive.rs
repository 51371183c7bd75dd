//! Redacting wrapper for secrets
//!
//! The remote content API token travels through configuration structs that
//! derive `Debug`; wrapping it in `Sensitive` keeps it out of logs.

use std::fmt;

/// A value that prints as `***REDACTED***` under both `Debug` and `Display`
///
/// ```
/// use contentkit_core_types::Sensitive;
///
/// let token = Sensitive::new("bearer-abc".to_string());
/// assert_eq!(format!("{:?}", token), "***REDACTED***");
/// assert_eq!(token.expose(), "bearer-abc");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the secret; only call this at the point of use (e.g. building a header)
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: PartialEq> PartialEq for Sensitive<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_display_hide_the_token() {
        let token = Sensitive::new("api-token-12345".to_string());
        assert_eq!(format!("{:?}", token), "***REDACTED***");
        assert_eq!(format!("{}", token), "***REDACTED***");
    }

    #[test]
    fn test_redaction_inside_config_struct() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct RemoteSettings {
            api_url: String,
            api_token: Sensitive<String>,
        }

        let settings = RemoteSettings {
            api_url: "https://cms.example.com".to_string(),
            api_token: Sensitive::new("s3cret".to_string()),
        };

        let rendered = format!("{:?}", settings);
        assert!(rendered.contains("cms.example.com"));
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn test_expose_and_into_inner() {
        let token = Sensitive::new(String::from("t"));
        assert_eq!(token.expose(), "t");
        assert_eq!(token.clone().into_inner(), "t");
    }
}
