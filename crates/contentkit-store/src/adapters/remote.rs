use crate::adapters::{join_segments, parse_base_url, ContentAdapter, WritePrecondition};
use crate::errors::{conflict, external_service, invalid_document, not_found, write_error, Result};
use crate::layout::validate_content_id;
use async_trait::async_trait;
use contentkit_core::errors::{ExError, ExErrorKind};
use contentkit_core::{ContentDocument, ContentSource};
use contentkit_core_types::Sensitive;
use reqwest::header::{HeaderValue, IF_MATCH, IF_NONE_MATCH};
use reqwest::{StatusCode, Url};
use std::time::Duration;

const ADAPTER: &str = "remote";

/// Content API adapter
///
/// `GET {base}/content/{id}` and `PUT {base}/content/{id}` with a bearer
/// token. Write preconditions travel as `If-None-Match: *` (absent) or
/// `If-Match: "<version>"`.
pub struct RemoteAdapter {
    client: reqwest::Client,
    base_url: Url,
    token: Option<Sensitive<String>>,
}

impl RemoteAdapter {
    /// # Errors
    ///
    /// `Config` when the base URL is invalid or the HTTP client cannot be
    /// built.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<Sensitive<String>>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url: String = base_url.into();
        let base_url = parse_base_url(ADAPTER, &base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ExError::new(ExErrorKind::Config)
                    .with_op("remote_adapter_new")
                    .with_adapter(ADAPTER)
                    .with_message(e.to_string())
            })?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `{base}/content/{id}` with the id as a single encoded segment
    fn url_for(&self, content_id: &str) -> Url {
        join_segments(&self.base_url, ["content", content_id])
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }
}

fn etag_for(precondition: &WritePrecondition) -> Option<(reqwest::header::HeaderName, HeaderValue)> {
    match precondition {
        WritePrecondition::None => None,
        WritePrecondition::Absent => Some((IF_NONE_MATCH, HeaderValue::from_static("*"))),
        WritePrecondition::Version(version) => HeaderValue::from_str(&format!("\"{}\"", version))
            .ok()
            .map(|value| (IF_MATCH, value)),
    }
}

#[async_trait]
impl ContentAdapter for RemoteAdapter {
    fn source(&self) -> ContentSource {
        ContentSource::Remote
    }

    async fn load(&self, content_id: &str) -> Result<ContentDocument> {
        validate_content_id(content_id)?;
        let url = self.url_for(content_id);
        tracing::debug!(content_id, %url, "loading remote content");

        let response = self
            .authorize(self.client.get(url.clone()))
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
        document: &ContentDocument,
        precondition: WritePrecondition,
    ) -> Result<()> {
        validate_content_id(content_id)?;
        let url = self.url_for(content_id);

        let mut request = self.authorize(self.client.put(url.clone())).json(&document.to_value());
        if let Some((name, value)) = etag_for(&precondition) {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| write_error(ADAPTER, content_id, e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                tracing::debug!(content_id, %precondition, "saved remote content");
                Ok(())
            }
            StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => Err(conflict(
                ADAPTER,
                content_id,
                format!("remote rejected precondition {}", precondition),
            )),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(write_error(
                ADAPTER,
                content_id,
                format!("not authorized to write ({})", response.status()),
            )),
            status => Err(write_error(
                ADAPTER,
                content_id,
                format!("PUT {} returned {}", url, status),
            )),
        }
    }
}
