use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{TmdbError, TmdbResult};

pub const TMDB_BASE: &str = "https://api.themoviedb.org/3";

/// Status and raw body of one GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The single outbound operation the client needs. Swap it for a canned transport in tests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let user_agent = format!("cinebrowse/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let res = self.client.get(url).send().await.context("request failed")?;
        let status = res.status().as_u16();
        let body = res.text().await.context("reading body failed")?;
        Ok(HttpResponse { status, body })
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TmdbClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::new(config.tmdb_timeout)?;
        Ok(Self::new(
            Arc::new(transport),
            config.tmdb_base_url.clone(),
            config.tmdb_api_key.clone(),
        ))
    }

    /// Full URL for `endpoint` with the api key first and each param stringified and encoded.
    pub fn build_url(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}/{}?api_key={}",
            self.base_url,
            endpoint.trim_start_matches('/'),
            urlencoding::encode(&self.api_key)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// GET `endpoint` and return the body as untyped JSON.
    pub async fn request(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> TmdbResult<serde_json::Value> {
        let url = self.build_url(endpoint, params);
        debug!(endpoint = %endpoint, "TMDB request");

        let res = match self.transport.get(&url).await {
            Ok(res) => res,
            Err(e) => {
                warn!("TMDB fetch error for {}: {:#}", endpoint, e);
                return Err(TmdbError::Network(format!("{e:#}")));
            }
        };

        if !(200..300).contains(&res.status) {
            let message = upstream_message(&res.body);
            warn!(
                "TMDB API error for {}: {} {}",
                endpoint,
                res.status,
                message.as_deref().unwrap_or("")
            );
            return Err(TmdbError::Upstream {
                status: res.status,
                message,
            });
        }

        serde_json::from_str(&res.body).map_err(|e| {
            warn!("TMDB returned invalid JSON for {}: {}", endpoint, e);
            TmdbError::mapping(format!("{endpoint}: {e}"))
        })
    }

    /// GET `endpoint` and validate the body against `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> TmdbResult<T> {
        let value = self.request(endpoint, params).await?;
        parse(endpoint, value)
    }
}

pub(crate) fn parse<T: DeserializeOwned>(what: &str, value: serde_json::Value) -> TmdbResult<T> {
    serde_json::from_value(value).map_err(|e| {
        warn!("TMDB payload for {} did not match: {}", what, e);
        TmdbError::mapping(format!("{what}: {e}"))
    })
}

fn upstream_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        status_message: Option<String>,
    }
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.status_message)
        .filter(|m| !m.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPage {
    pub results: Vec<RawListItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawListItem {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGenreList {
    pub genres: Vec<crate::models::Genre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVideos {
    #[serde(default)]
    pub results: Vec<RawVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CannedTransport {
        response: std::result::Result<HttpResponse, String>,
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HttpTransport for CannedTransport {
        async fn get(&self, url: &str) -> Result<HttpResponse> {
            self.urls.lock().unwrap().push(url.to_string());
            self.response.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    fn client(
        response: std::result::Result<HttpResponse, String>,
    ) -> (TmdbClient, Arc<CannedTransport>) {
        let transport = Arc::new(CannedTransport {
            response,
            urls: Mutex::new(Vec::new()),
        });
        (
            TmdbClient::new(transport.clone(), "https://tmdb.test/3/", "k3y"),
            transport,
        )
    }

    #[test]
    fn build_url_puts_key_first_and_encodes_values() {
        let (tmdb, _) = client(Err("unused".into()));
        let url = tmdb.build_url(
            "search/movie",
            &[("query", "star wars".to_string()), ("page", 2.to_string())],
        );
        assert_eq!(
            url,
            "https://tmdb.test/3/search/movie?api_key=k3y&query=star%20wars&page=2"
        );
    }

    #[tokio::test]
    async fn non_success_status_carries_upstream_message() {
        let (tmdb, _) = client(Ok(HttpResponse {
            status: 401,
            body: r#"{"status_code":7,"status_message":"Invalid API key"}"#.to_string(),
        }));
        let err = tmdb.request("movie/popular", &[]).await.unwrap_err();
        assert_eq!(
            err,
            TmdbError::Upstream {
                status: 401,
                message: Some("Invalid API key".to_string())
            }
        );
        assert_eq!(err.public_message(), Some("Invalid API key"));
    }

    #[tokio::test]
    async fn transport_fault_becomes_network_error() {
        let (tmdb, transport) = client(Err("connection refused".into()));
        let err = tmdb.request("movie/popular", &[]).await.unwrap_err();
        assert!(matches!(err, TmdbError::Network(ref m) if m.contains("connection refused")));
        assert_eq!(transport.urls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_json_is_a_mapping_error() {
        let (tmdb, _) = client(Ok(HttpResponse {
            status: 200,
            body: "<html>oops</html>".to_string(),
        }));
        let err = tmdb.request("configuration", &[]).await.unwrap_err();
        assert!(matches!(err, TmdbError::Mapping(_)));
    }

    #[tokio::test]
    async fn typed_get_rejects_wrong_shape() {
        let (tmdb, _) = client(Ok(HttpResponse {
            status: 200,
            body: r#"{"results": [{"title": "no id"}]}"#.to_string(),
        }));
        let err = tmdb.get::<RawPage>("movie/popular", &[]).await.unwrap_err();
        assert!(matches!(err, TmdbError::Mapping(_)));
    }
}
