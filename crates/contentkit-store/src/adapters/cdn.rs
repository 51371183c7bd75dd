use crate::adapters::{join_segments, parse_base_url, ContentAdapter, WritePrecondition};
use crate::errors::{external_service, invalid_document, not_found, unsupported, Result};
use crate::layout::content_path;
use async_trait::async_trait;
use contentkit_core::errors::{ExError, ExErrorKind};
use contentkit_core::{ContentDocument, ContentSource};
use reqwest::{StatusCode, Url};
use std::time::Duration;

const ADAPTER: &str = "cdn";

/// Read-only adapter over published content on a CDN
///
/// Fetches `{base}{content_path(id)}`, so the CDN mirrors the local layout.
pub struct CdnAdapter {
    client: reqwest::Client,
    base_url: Url,
}

impl CdnAdapter {
    /// # Errors
    ///
    /// `Config` when the base URL is invalid or the HTTP client cannot be
    /// built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url: String = base_url.into();
        let base_url = parse_base_url(ADAPTER, &base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ExError::new(ExErrorKind::Config)
                    .with_op("cdn_adapter_new")
                    .with_adapter(ADAPTER)
                    .with_message(e.to_string())
            })?;
        Ok(Self {
            client,
            base_url,
        })
    }
}

#[async_trait]
impl ContentAdapter for CdnAdapter {
    fn source(&self) -> ContentSource {
        ContentSource::Cdn
    }

    async fn load(&self, content_id: &str) -> Result<ContentDocument> {
        let path = content_path(content_id)?;
        let url = join_segments(&self.base_url, path.split('/').filter(|s| !s.is_empty()));
        tracing::debug!(content_id, %url, "loading cdn content");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| external_service(ADAPTER, content_id, e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(not_found(ADAPTER, content_id)),
            status if status.is_success() => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| external_service(ADAPTER, content_id, e.to_string()))?;
                ContentDocument::from_json_slice(&bytes)
                    .map_err(|e| invalid_document(ADAPTER, content_id, e))
            }
            status => Err(external_service(
                ADAPTER,
                content_id,
                format!("GET {} returned {}", url, status),
            )),
        }
    }

    async fn save(
        &self,
        content_id: &str,
        _document: &ContentDocument,
        _precondition: WritePrecondition,
    ) -> Result<()> {
        Err(unsupported(ADAPTER, "save", content_id))
    }
}
