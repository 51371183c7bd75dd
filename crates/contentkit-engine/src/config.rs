//! Runtime configuration
//!
//! Layered, lowest precedence first:
//! 1. built-in defaults
//! 2. `contentkit.toml` in the working directory (optional) or an explicit file
//! 3. `CONTENTKIT_*` environment variables, after `.env` has been loaded

use contentkit_core::errors::{ExError, ExErrorKind};
use contentkit_core::logging_facility::Profile;
use contentkit_core_types::Sensitive;
use contentkit_store::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "CONTENTKIT";
const DEFAULT_FILE: &str = "contentkit";

#[derive(Debug, Deserialize)]
struct RawConfig {
    api_url: Option<String>,
    api_token: Option<String>,
    cdn_url: Option<String>,
    content_root: PathBuf,
    storage_path: PathBuf,
    request_timeout_secs: u64,
    log_profile: String,
}

#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// Base URL of the content API; the remote adapter is disabled without it
    pub api_url: Option<String>,
    pub api_token: Option<Sensitive<String>>,
    /// Base URL of the CDN; the cdn adapter is disabled without it
    pub cdn_url: Option<String>,
    /// Directory holding the `content/` tree
    pub content_root: PathBuf,
    /// SQLite file for durable client state
    pub storage_path: PathBuf,
    pub request_timeout: Duration,
    pub log_profile: Profile,
}

fn config_error(err: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("load_config")
        .with_message(err.to_string())
}

impl ContentConfig {
    /// Load from `.env`, `contentkit.toml` and the process environment
    ///
    /// # Errors
    ///
    /// `Config` when a source cannot be read or a value is invalid.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// As [`load`](Self::load) with an explicit config file in place of
    /// `contentkit.toml`
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::load_with(file, None)
    }

    /// Load with an explicit config file and/or environment map
    ///
    /// `env` replaces the process environment when given, which keeps tests
    /// independent of each other.
    pub fn load_with(file: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_FILE).required(false),
        };

        let raw: RawConfig = config::Config::builder()
            .set_default("content_root", ".")
            .and_then(|b| b.set_default("storage_path", ".contentkit/state.db"))
            .and_then(|b| b.set_default("request_timeout_secs", 30))
            .and_then(|b| b.set_default("log_profile", "development"))
            .map_err(config_error)?
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(config_error)?
            .try_deserialize()
            .map_err(config_error)?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        if raw.request_timeout_secs == 0 {
            return Err(config_error("request_timeout_secs must be greater than zero"));
        }
        let log_profile = raw.log_profile.parse::<Profile>().map_err(config_error)?;

        Ok(Self {
            api_url: raw.api_url.filter(|u| !u.trim().is_empty()),
            api_token: raw
                .api_token
                .filter(|t| !t.is_empty())
                .map(Sensitive::new),
            cdn_url: raw.cdn_url.filter(|u| !u.trim().is_empty()),
            content_root: raw.content_root,
            storage_path: raw.storage_path,
            request_timeout: Duration::from_secs(raw.request_timeout_secs),
            log_profile,
        })
    }

    /// Defaults rooted at `content_root`, no remote or CDN
    pub fn local(content_root: impl Into<PathBuf>) -> Self {
        let content_root = content_root.into();
        Self {
            api_url: None,
            api_token: None,
            cdn_url: None,
            storage_path: content_root.join(".contentkit/state.db"),
            content_root,
            request_timeout: Duration::from_secs(30),
            log_profile: Profile::Development,
        }
    }
}
