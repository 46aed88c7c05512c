//! HTTP backend for the engine's REST API.
//!
//! Two endpoints are used:
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | `GET`  | `/_cat/indices?v` | — (plain-text table back) |
//! | `POST` | `/<index>/_search` or `/_all/_search` | JSON query (JSON back) |
//!
//! Any non-2xx status is surfaced as [`EngineError::Status`] with the body
//! the engine sent, so error payloads end up in the log.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{header, Method, Request, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::error::EngineError;

const CAT_INDICES_PATH: &str = "/_cat/indices?v";

/// The two engine calls the search client needs.
///
/// Implemented by [`HttpBackend`] in production; tests substitute in-memory
/// doubles.
pub trait Backend: Send + Sync {
    /// Raw text of the index listing.
    fn cat_indices(&self) -> impl Future<Output = Result<String, EngineError>> + Send;

    /// POST `body` to `path` and return the raw response bytes.
    fn search(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<Bytes, EngineError>> + Send;
}

/// Plain-HTTP client for a single engine base URL.
#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    timeout: Option<Duration>,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpBackend {
    /// `base_url` is scheme + host + port, e.g. `http://localhost:9200`.
    /// A trailing slash is ignored. `timeout` of `None` waits forever.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, EngineError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        base_url
            .parse::<Uri>()
            .map_err(|source| EngineError::InvalidUrl {
                url: base_url.clone(),
                source,
            })?;

        let client = Client::builder(TokioExecutor::new()).build_http();
        Ok(Self {
            base_url,
            timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn uri(&self, path: &str) -> Result<Uri, EngineError> {
        let url = format!("{}{}", self.base_url, path);
        url.parse::<Uri>()
            .map_err(|source| EngineError::InvalidUrl { url, source })
    }

    async fn send(&self, req: Request<Full<Bytes>>) -> Result<Bytes, EngineError> {
        let method = req.method().clone();
        let uri = req.uri().clone();

        let exchange = async {
            let resp = self.client.request(req).await?;
            let status = resp.status();
            let body = resp.into_body().collect().await?.to_bytes();
            if !status.is_success() {
                return Err(EngineError::Status {
                    status,
                    body: String::from_utf8_lossy(&body).into_owned(),
                });
            }
            Ok(body)
        };

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| EngineError::Timeout(limit))?,
            None => exchange.await,
        };

        match &result {
            Ok(body) => tracing::debug!(%method, %uri, bytes = body.len(), "engine: response"),
            Err(err) => tracing::debug!(%method, %uri, error = %err, "engine: request failed"),
        }
        result
    }
}

impl Backend for HttpBackend {
    async fn cat_indices(&self) -> Result<String, EngineError> {
        let req = Request::builder()
            .method(Method::GET)
            .uri(self.uri(CAT_INDICES_PATH)?)
            .body(Full::new(Bytes::new()))?;
        let body = self.send(req).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn search(&self, path: &str, body: &serde_json::Value) -> Result<Bytes, EngineError> {
        let payload = serde_json::to_vec(body)?;
        let req = Request::builder()
            .method(Method::POST)
            .uri(self.uri(path)?)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(payload)))?;
        self.send(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let b = HttpBackend::new("http://localhost:9200/", None).unwrap();
        assert_eq!(b.base_url(), "http://localhost:9200");
        assert_eq!(
            b.uri("/_all/_search").unwrap().to_string(),
            "http://localhost:9200/_all/_search"
        );
    }

    #[test]
    fn garbage_url_is_rejected() {
        assert!(matches!(
            HttpBackend::new("http://exa mple:9200", None),
            Err(EngineError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_engine_is_a_connect_error() {
        // port 9 (discard) is almost never listening on loopback
        let b = HttpBackend::new("http://127.0.0.1:9", Some(Duration::from_secs(5))).unwrap();
        let err = b.cat_indices().await.unwrap_err();
        assert!(
            matches!(err, EngineError::Connect(_) | EngineError::Timeout(_)),
            "unexpected error: {err}"
        );
    }
}
