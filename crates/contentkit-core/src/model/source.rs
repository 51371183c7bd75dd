use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named content store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// Content files checked into the site repository
    Local,
    /// The content API
    Remote,
    /// Deployed, read-only copies served from the CDN
    Cdn,
}

impl ContentSource {
    pub const ALL: [ContentSource; 3] = [ContentSource::Local, ContentSource::Remote, ContentSource::Cdn];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentSource::Local => "local",
            ContentSource::Remote => "remote",
            ContentSource::Cdn => "cdn",
        }
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(ContentSource::Local),
            "remote" => Ok(ContentSource::Remote),
            "cdn" => Ok(ContentSource::Cdn),
            other => Err(format!(
                "unknown content source '{}' (expected local, remote or cdn)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_str() {
        for source in ContentSource::ALL {
            assert_eq!(source.as_str().parse::<ContentSource>(), Ok(source));
        }
        assert!("s3".parse::<ContentSource>().is_err());
    }
}
