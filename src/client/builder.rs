use super::Client;
use crate::error::{ClientError, Result};
use http::{
    header::{HeaderMap, HeaderName},
    HeaderValue,
};
use reqwest::Client as ReqwestClient;
use std::str::FromStr;
use std::time::Duration;

#[derive(Default)]
pub struct ClientBuilder {
    timeout: Option<Duration>,
    headers: HeaderMap,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
            ..Default::default()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn header<K, V>(mut self, key: K, value: V) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let (name, value) = parse_header(key.as_ref(), value.as_ref())?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn build(self) -> Result<Client> {
        let mut client_builder = ReqwestClient::builder().default_headers(self.headers);

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let inner = client_builder
            .build()
            .map_err(|e| ClientError::BuildError(format!("Failed to build client: {}", e)))?;

        Ok(Client { inner })
    }
}

pub(crate) fn parse_header(key: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::from_str(key)
        .map_err(|e| ClientError::BuildError(format!("Invalid header name: {}", e)))?;

    let value = HeaderValue::from_str(value)
        .map_err(|e| ClientError::BuildError(format!("Invalid header value: {}", e)))?;

    Ok((name, value))
}
