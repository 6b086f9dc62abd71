//! Console backend HTTP client

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::api::ApiClient;
use crate::error::ApiError;

/// HTTP client configuration
#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    /// Base URL of the console backend, e.g. `https://console.example.com`
    pub base_url: String,
    /// Per-request timeout in seconds (0 disables the timeout)
    pub timeout_secs: u64,
    /// Skip TLS certificate verification
    pub skip_tls_verify: bool,
    /// User-Agent header value
    pub user_agent: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            skip_tls_verify: false,
            user_agent: None,
        }
    }
}

/// reqwest-backed `ApiClient`
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: HttpClientConfig) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(&config.base_url)?;

        let mut builder = Client::builder().user_agent(
            config
                .user_agent
                .clone()
                .unwrap_or_else(|| format!("gatekeeper/{}", env!("CARGO_PKG_VERSION"))),
        );

        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        if config.skip_tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build()?;

        info!("Created API client for {}", base_url);

        Ok(Self { base_url, client })
    }

    /// Base URL requests are resolved against (no trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Attach the token and send, mapping the response to a JSON body
    async fn send(&self, request: RequestBuilder, token: Option<&str>) -> Result<Value, ApiError> {
        let request = match token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(Value::Null);
        }

        match serde_json::from_slice(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                debug!("Ignoring non-JSON response body: {}", e);
                Ok(Value::Null)
            }
        }
    }
}

#[async_trait]
impl ApiClient for HttpClient {
    async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!("POST {}", url);
        self.send(self.client.post(&url).form(fields), token).await
    }

    async fn get(&self, path: &str, token: Option<&str>) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!("GET {}", url);
        self.send(self.client.get(&url), token).await
    }

    async fn delete(&self, path: &str, token: Option<&str>) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!("DELETE {}", url);
        self.send(self.client.delete(&url), token).await
    }
}

/// Validate a base URL and strip any trailing slash
fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let parsed = Url::parse(raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl(format!(
            "{}: unsupported scheme {}",
            raw,
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none() {
        return Err(ApiError::InvalidUrl(format!("{}: missing host", raw)));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://console.example.com/").unwrap(),
            "https://console.example.com"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8000/admin").unwrap(),
            "http://localhost:8000/admin"
        );
    }

    #[test]
    fn test_normalize_base_url_rejects_invalid() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            normalize_base_url("ftp://example.com"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_url_joins_paths() {
        let client = HttpClient::new(HttpClientConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(client.url("/api/me"), "http://localhost:8000/api/me");
        assert_eq!(client.url("api/me"), "http://localhost:8000/api/me");
    }
}
