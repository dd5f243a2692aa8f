//! reqwest-based backend client.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use vocab_core::WordProgress;

use super::{ApiError, BackendApi};

/// Response envelope used by every progress endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

struct HttpBackendInner {
    client: Client,
    base_url: String,
    token: Option<String>,
}

/// Backend API over HTTP.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct HttpBackend {
    inner: Arc<HttpBackendInner>,
}

impl HttpBackend {
    /// Create a client for `base_url`, optionally authenticating with a
    /// bearer token.
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            inner: Arc::new(HttpBackendInner {
                client: Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                token,
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.inner.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let resp = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn fetch_all_progress(&self) -> Result<Vec<WordProgress>, ApiError> {
        let request = self.inner.client.get(self.url("/api/progress/learned"));
        self.send(request).await
    }

    async fn fetch_due_progress(&self) -> Result<Vec<WordProgress>, ApiError> {
        let request = self.inner.client.get(self.url("/api/progress/due"));
        self.send(request).await
    }

    async fn persist_progress(&self, progress: &WordProgress) -> Result<WordProgress, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("/api/progress"))
            .json(progress);
        self.send(request).await
    }
}
