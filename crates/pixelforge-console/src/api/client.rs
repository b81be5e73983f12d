//! Thin REST client over `reqwest`.
//!
//! Every collection endpoint answers with the same envelope
//! (`{ success, data, message?, total? }`). Transport failures become
//! [`CoreError::Network`], non-2xx statuses [`CoreError::Http`] and
//! undecodable bodies [`CoreError::Decode`].

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use pixelforge_core::{CoreError, CoreResult, PageRequest, PageResult};

/// Response envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> Envelope<Vec<T>> {
    /// Converts a list envelope into a page. A missing `total` falls back
    /// to the number of rows returned.
    pub fn into_page(self) -> PageResult<T> {
        let total = self.total.unwrap_or(self.data.len() as u64);
        PageResult::new(self.data, total)
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, token: Option<String>) -> CoreResult<Self> {
        let base = normalize_base(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pixelforge-console/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CoreError::Network(e.to_string()))?;
        Ok(Self { http, base, token })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolves `path` (no leading slash) against the base URL.
    pub fn url(&self, path: &str) -> CoreResult<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| CoreError::InvalidFilter(format!("bad path {path:?}: {e}")))
    }

    /// URL of one page of the collection at `path`.
    pub fn page_url(&self, path: &str, request: &PageRequest) -> CoreResult<Url> {
        let mut url = self.url(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("skip", &request.skip.to_string());
            pairs.append_pair("limit", &request.limit.to_string());
            for (key, value) in &request.filters {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Fetches one page of the collection at `path`.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        request: &PageRequest,
    ) -> CoreResult<PageResult<T>> {
        let url = self.page_url(path, request)?;
        debug!(%url, "GET page");
        let (status, body) = self.execute(self.http.get(url)).await?;
        decode_page(status, &body)
    }

    /// Sends a mutation and discards the response body.
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> CoreResult<()> {
        debug!(%method, %url, "mutation");
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(builder).await.map(|_| ())
    }

    async fn execute(&self, builder: RequestBuilder) -> CoreResult<(StatusCode, String)> {
        let builder = match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            let message = error_message(status, &body);
            warn!(status = status.as_u16(), %message, "request rejected");
            return Err(CoreError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok((status, body))
    }
}

fn normalize_base(base_url: &str) -> CoreResult<Url> {
    let trimmed = base_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash)
        .map_err(|e| CoreError::ConfigParse(format!("invalid base url {base_url:?}: {e}")))
}

fn transport_error(err: reqwest::Error) -> CoreError {
    if err.is_decode() {
        CoreError::Decode(err.to_string())
    } else {
        CoreError::Network(err.to_string())
    }
}

/// Decodes a list envelope. `success: false` is reported as an HTTP error
/// with the response status.
pub(crate) fn decode_page<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> CoreResult<PageResult<T>> {
    let envelope: Envelope<Vec<T>> =
        serde_json::from_str(body).map_err(|e| CoreError::Decode(e.to_string()))?;
    if !envelope.success {
        return Err(CoreError::Http {
            status: status.as_u16(),
            message: envelope
                .message
                .unwrap_or_else(|| "request was not successful".to_string()),
        });
    }
    Ok(envelope.into_page())
}

/// Picks a readable message out of an error body.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "detail"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        });
    from_json.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    })
}
