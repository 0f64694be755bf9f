//! HTTP campaign source
//!
//! Fetches the roster as JSON from `GET {base_url}/campaigns`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use super::{CampaignRoster, CampaignSource};
use crate::config::Config;
use crate::error::{RefreshError, Result};

/// Campaign provider reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCampaignSource {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpCampaignSource {
    /// Creates a client for the provider at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Provider root, with or without trailing slash
    /// * `api_key` - Optional bearer token
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    /// `InvalidSourceUrl` when `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let endpoint = campaigns_endpoint(base_url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Creates a client from the service configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.source_url,
            config.source_api_key.clone(),
            Duration::from_secs(config.source_timeout),
        )
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

fn campaigns_endpoint(base_url: &str) -> Result<Url> {
    let raw = format!("{}/campaigns", base_url.trim().trim_end_matches('/'));
    let url = Url::parse(&raw)
        .map_err(|err| RefreshError::InvalidSourceUrl(format!("{}: {}", base_url, err)))?;

    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(RefreshError::InvalidSourceUrl(format!(
            "{}: expected an http(s) URL with a host",
            base_url
        ))),
    }
}

#[async_trait]
impl CampaignSource for HttpCampaignSource {
    async fn fetch_roster(&self) -> Result<CampaignRoster> {
        let mut request = self.client.get(self.endpoint.clone());
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RefreshError::SourceUnavailable(format!(
                "{} responded with {}",
                self.endpoint, status
            )));
        }

        let body = response.bytes().await?;
        debug!("Campaign source returned {} bytes", body.len());

        let roster = serde_json::from_slice(&body)?;
        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::get, Router};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn source_for(base_url: &str, api_key: Option<&str>) -> HttpCampaignSource {
        HttpCampaignSource::new(
            base_url,
            api_key.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let source = source_for("http://provider.local/", None);
        assert_eq!(source.endpoint(), "http://provider.local/campaigns");
    }

    #[test]
    fn test_rejects_malformed_base_url() {
        for base_url in ["not a url", "", "ftp://provider.local", "localhost:4000"] {
            let err = HttpCampaignSource::new(base_url, None, Duration::from_secs(5)).unwrap_err();
            assert!(
                matches!(err, RefreshError::InvalidSourceUrl(_)),
                "{base_url:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_from_config_rejects_malformed_url() {
        let config = Config {
            source_url: "http//missing-colon".to_string(),
            ..Config::default()
        };
        assert!(HttpCampaignSource::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_fetch_roster_success() {
        let app = Router::new().route(
            "/campaigns",
            get(|| async { r#"[{"campaign":"A","projects":["X","x","Y"]},{"campaign":"B","projects":[]}]"# }),
        );
        let base_url = serve(app).await;

        let roster = source_for(&base_url, None).fetch_roster().await.unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].projects, vec!["X", "x", "Y"]);
    }

    #[tokio::test]
    async fn test_fetch_roster_sends_bearer_token() {
        let app = Router::new().route(
            "/campaigns",
            get(|headers: HeaderMap| async move {
                match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                    Some("Bearer secret") => (StatusCode::OK, "[]"),
                    _ => (StatusCode::UNAUTHORIZED, ""),
                }
            }),
        );
        let base_url = serve(app).await;

        assert!(source_for(&base_url, Some("secret")).fetch_roster().await.is_ok());
        let err = source_for(&base_url, None).fetch_roster().await.unwrap_err();
        assert!(matches!(err, RefreshError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_roster_non_success_status() {
        let app = Router::new().route(
            "/campaigns",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let base_url = serve(app).await;

        let err = source_for(&base_url, None).fetch_roster().await.unwrap_err();
        assert!(matches!(err, RefreshError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_roster_malformed_body() {
        let app = Router::new().route("/campaigns", get(|| async { r#"{"campaigns": 3}"# }));
        let base_url = serve(app).await;

        let err = source_for(&base_url, None).fetch_roster().await.unwrap_err();
        assert!(matches!(err, RefreshError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_fetch_roster_unreachable() {
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = source_for(&format!("http://{}", addr), None)
            .fetch_roster()
            .await
            .unwrap_err();
        assert!(matches!(err, RefreshError::SourceUnavailable(_)));
    }
}
