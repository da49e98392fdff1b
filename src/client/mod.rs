mod builder;

use crate::error::{ClientError, Result};
use crate::config::HttpConfig;
use crate::log_debug;
pub use builder::ClientBuilder;
use builder::parse_header;
use http::header::HeaderMap;
use reqwest::Client as ReqwestClient;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

#[derive(Debug)]
pub struct ClientResponse {
    pub status: u16,
    pub content: String,
}

pub struct Client {
    inner: ReqwestClient,
}

/// Anything that can turn a URL into page text.
pub trait Fetch {
    async fn fetch(&self, url: &str, headers: &BTreeMap<String, String>) -> Result<String>;
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Client with the `[http]` default headers and timeout.
    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        Self::builder()
            .header("user-agent", &config.user_agent)?
            .header("accept-language", &config.accept_language)?
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
    }

    /// GET with per-request header overrides on top of the client defaults.
    pub async fn get(&self, url: &str, overrides: &BTreeMap<String, String>) -> Result<ClientResponse> {
        let url = validate_url(url)?;
        let headers = header_map(overrides)?;

        let response = self
            .inner
            .get(url.as_str())
            .headers(headers)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        Self::read(response).await
    }

    pub async fn post(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: Vec<u8>,
    ) -> Result<ClientResponse> {
        let url = validate_url(url)?;
        let headers = header_map(headers)?;

        let response = self
            .inner
            .post(url.as_str())
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> Result<ClientResponse> {
        let status = response.status().as_u16();
        let is_success = response.status().is_success();
        let content = response.text().await.map_err(|e| {
            ClientError::RequestFailed(format!("Failed to get response text: {}", e))
        })?;

        if !is_success {
            return Err(ClientError::ResponseError {
                status_code: status,
                message: truncate(&content, 200),
            }
            .into());
        }

        Ok(ClientResponse { status, content })
    }
}

impl Fetch for Client {
    async fn fetch(&self, url: &str, headers: &BTreeMap<String, String>) -> Result<String> {
        let response = self.get(url, headers).await?;
        log_debug!(
            "[client] {} -> {} ({} bytes)",
            url,
            response.status,
            response.content.len()
        );
        Ok(response.content)
    }
}

fn validate_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", url, e)).into())
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let (name, value) = parse_header(key, value)?;
        map.insert(name, value);
    }
    Ok(map)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn rejects_relative_urls() {
        let err = validate_url("/daily-breads").unwrap_err();
        assert!(err.to_string().contains("Invalid URL"));
        assert!(validate_url("https://www.ubf.org/daily-breads").is_ok());
    }

    #[test]
    fn builds_override_headers() {
        let overrides = BTreeMap::from([("user-agent".to_string(), "Mozilla/5.0".to_string())]);
        let map = header_map(&overrides).unwrap();
        assert_eq!(map.get("user-agent").unwrap(), "Mozilla/5.0");
    }

    fn response(status: u16, body: String) -> reqwest::Response {
        reqwest::Response::from(http::Response::builder().status(status).body(body).unwrap())
    }

    #[tokio::test]
    async fn success_status_returns_the_body() {
        let response = Client::read(response(200, "<h3>Title</h3>".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.content, "<h3>Title</h3>");
    }

    #[tokio::test]
    async fn error_status_becomes_response_error() {
        let err = Client::read(response(503, "x".repeat(300))).await.unwrap_err();
        match err {
            AppError::Client(ClientError::ResponseError {
                status_code,
                message,
            }) => {
                assert_eq!(status_code, 503);
                assert_eq!(message.chars().count(), 200);
            }
            other => panic!("unexpected error: {}", other),
        }

        let err = Client::read(response(404, String::new())).await.unwrap_err();
        assert!(err.to_string().contains("Response error 404"));
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate("말씀말씀", 2), "말씀");
        assert_eq!(truncate("ok", 10), "ok");
    }
}
