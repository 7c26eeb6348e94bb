//! HTTP transport for the AnyList API.
//!
//! Entities talk to the server through the [`Transport`] trait so they never
//! depend on a concrete HTTP stack. [`Client`] is the reqwest-backed
//! implementation used in production.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::config::AnyListConfig;
use crate::error::{AnyListError, AnyListResult};

/// Submits encoded payloads to the server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `payload` as the single multipart field `field` to `path`
    /// (relative to the API root).
    ///
    /// Resolves once the server has answered with a success status.
    async fn post_form(&self, path: &str, field: &str, payload: Vec<u8>) -> AnyListResult<()>;
}

/// reqwest-backed AnyList client.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        Client {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            access_token: None,
        }
    }

    /// Build a client from the on-disk config. A zero `timeout_secs` is
    /// rejected, since reqwest would fail every request immediately.
    pub fn from_config(config: &AnyListConfig) -> AnyListResult<Self> {
        if config.timeout_secs == 0 {
            return Err(AnyListError::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Client {
            http,
            base_url: config.base_url.clone(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for Client {
    async fn post_form(&self, path: &str, field: &str, payload: Vec<u8>) -> AnyListResult<()> {
        let url = self.url(path);
        let part = Part::bytes(payload).mime_str("application/octet-stream")?;
        let form = Form::new().part(field.to_string(), part);

        let mut request = self.http.post(&url).multipart(form);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(%url, error = %e, "could not read error response body");
                    String::new()
                }
            };
            tracing::warn!(%url, status = status.as_u16(), "request rejected");
            return Err(AnyListError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
