//! HTTP client for the vessel search API.

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio_util::sync::CancellationToken;
use url::Url;

use trawl_core::config::RemoteConfig;
use trawl_core::{LookupError, RemoteEntry, RemoteLookup};

use crate::wire::decode_entries;

/// Why a base URL cannot be used for lookups.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("invalid base url: {0}")]
    Parse(#[from] url::ParseError),
    #[error("unsupported url scheme {0:?} (only http is supported)")]
    UnsupportedScheme(String),
    #[error("base url cannot carry a path")]
    CannotBeABase,
}

/// Vessel lookup over plain HTTP/1.1.
pub struct HttpLookup {
    client: Client<HttpConnector, Empty<Bytes>>,
    /// `{base_url}/datasets/{dataset}/vessels`, without query.
    endpoint: Url,
}

impl HttpLookup {
    pub fn new(base_url: &str, dataset: &str) -> Result<Self, EndpointError> {
        let mut endpoint = Url::parse(base_url)?;
        if endpoint.scheme() != "http" {
            return Err(EndpointError::UnsupportedScheme(endpoint.scheme().to_string()));
        }
        endpoint
            .path_segments_mut()
            .map_err(|_| EndpointError::CannotBeABase)?
            .pop_if_empty()
            .extend(["datasets", dataset, "vessels"]);
        endpoint.set_query(None);

        let client = Client::builder(TokioExecutor::new()).build_http();
        tracing::debug!(endpoint = %endpoint, "vessel lookup configured");
        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self, EndpointError> {
        Self::new(&config.base_url, &config.dataset)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for one page of results.
    pub fn request_url(&self, query: &str, offset: usize) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("offset", &offset.to_string());
        url
    }

    async fn fetch(&self, url: Url) -> Result<Vec<RemoteEntry>, LookupError> {
        let uri: hyper::Uri = url
            .as_str()
            .parse()
            .map_err(|e| LookupError::Transport(format!("invalid request uri: {e}")))?;
        let request = hyper::Request::get(uri)
            .header(hyper::header::ACCEPT, "application/json")
            .body(Empty::<Bytes>::new())
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Unavailable {
                status: status.as_u16(),
            });
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?
            .to_bytes();
        decode_entries(&body)
    }
}

impl std::fmt::Debug for HttpLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpLookup")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl RemoteLookup for HttpLookup {
    async fn lookup(
        &self,
        query: &str,
        offset: usize,
        cancel: CancellationToken,
    ) -> Result<Vec<RemoteEntry>, LookupError> {
        let url = self.request_url(query, offset);
        tracing::debug!(%url, "vessel lookup");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LookupError::Cancelled),
            result = self.fetch(url) => {
                match &result {
                    Ok(entries) => tracing::debug!(query, entries = entries.len(), "vessel lookup done"),
                    Err(err) => tracing::debug!(query, error = %err, "vessel lookup failed"),
                }
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_url_carries_query_and_offset() {
        let lookup = HttpLookup::new("http://127.0.0.1:8080", "indonesia").unwrap();
        assert_eq!(
            lookup.request_url("Sea Breeze", 0).as_str(),
            "http://127.0.0.1:8080/datasets/indonesia/vessels?query=Sea+Breeze&offset=0"
        );
    }

    #[test]
    fn base_path_and_trailing_slash_are_kept() {
        let lookup = HttpLookup::new("http://example.test/api/", "global").unwrap();
        assert_eq!(
            lookup.endpoint().as_str(),
            "http://example.test/api/datasets/global/vessels"
        );
    }

    #[test]
    fn comma_joined_queries_are_encoded() {
        let lookup = HttpLookup::new("http://example.test", "indonesia").unwrap();
        assert_eq!(
            lookup.request_url("Sea,Star", 20).query(),
            Some("query=Sea%2CStar&offset=20")
        );
    }

    #[test]
    fn https_is_rejected() {
        let err = HttpLookup::new("https://example.test", "indonesia").unwrap_err();
        assert!(matches!(err, EndpointError::UnsupportedScheme(s) if s == "https"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            HttpLookup::new("not a url", "indonesia"),
            Err(EndpointError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn cancelled_before_connect() {
        let lookup = HttpLookup::new("http://127.0.0.1:9", "indonesia").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = lookup.lookup("Sea", 0, cancel).await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
