//! HTTP transport to the AutoFocus API
//!
//! Every request is a POST whose JSON body carries the `apiKey` credential.
//! Responses are classified by status: 4xx becomes [`Error::Client`], 5xx
//! becomes [`Error::Server`], anything else is handed back as an
//! [`ApiResponse`]. Nothing is retried here.

use crate::config::ClientConfig;
use crate::error::{ApiFailure, Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// JSON object sent as a request body
pub type Body = Map<String, Value>;

/// Successful (non 4xx/5xx) answer from the service
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Serialize `value` into a request body; it must serialize to a JSON object.
pub fn body_from<T: Serialize>(value: &T) -> Result<Body> {
    match serde_json::to_value(value)? {
        Value::Object(body) => Ok(body),
        other => Err(Error::UnexpectedResponse(format!(
            "request body must be a JSON object, got {other}"
        ))),
    }
}

/// Turn a status and body into a response or the matching error kind.
pub fn classify(status: u16, body: String) -> Result<ApiResponse> {
    match status {
        400..=499 => Err(Error::Client(ApiFailure::from_body(status, body))),
        500..=599 => Err(Error::Server(ApiFailure::from_body(status, body))),
        _ => Ok(ApiResponse { status, body }),
    }
}

/// Signed request channel to the service
#[async_trait]
pub trait Transport: fmt::Debug + Send + Sync {
    /// Fail with [`Error::Config`] when no credential is configured.
    fn ensure_credential(&self) -> Result<()>;

    /// POST `body` (plus the credential) to `path`, relative to the API base.
    async fn post(
        &self,
        path: &str,
        body: Option<Body>,
        params: &[(String, String)],
    ) -> Result<ApiResponse>;
}

/// reqwest backed [`Transport`]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize_base(base_url.into()),
            api_key,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base(config.base_url.clone()),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(Error::Config(
                "API key is not set. Library requires an API key to be set".to_string(),
            )),
        }
    }
}

fn normalize_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn ensure_credential(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    async fn post(
        &self,
        path: &str,
        body: Option<Body>,
        params: &[(String, String)],
    ) -> Result<ApiResponse> {
        let api_key = self.api_key()?;

        let mut body = body.unwrap_or_default();
        body.insert("apiKey".to_string(), Value::String(api_key.to_string()));

        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let mut request = self.client.post(&url).json(&body);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!("POST {} -> {}", url, status);

        classify(status, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(200)]
    #[case(204)]
    #[case(302)]
    fn test_classify_success(#[case] status: u16) {
        let resp = classify(status, "{}".to_string()).unwrap();
        assert_eq!(resp.status, status);
    }

    #[rstest]
    #[case(400)]
    #[case(404)]
    #[case(499)]
    fn test_classify_client_error(#[case] status: u16) {
        match classify(status, "bad".to_string()) {
            Err(Error::Client(failure)) => {
                assert_eq!(failure.status, status);
                assert_eq!(failure.body, "bad");
            }
            other => panic!("expected client error, got {other:?}"),
        }
    }

    #[rstest]
    #[case(500)]
    #[case(503)]
    #[case(599)]
    fn test_classify_server_error(#[case] status: u16) {
        assert!(matches!(
            classify(status, "boom".to_string()),
            Err(Error::Server(f)) if f.status == status
        ));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        // Nothing listens on port 1; a network attempt would yield Error::Http
        let transport = HttpTransport::new("http://127.0.0.1:1", None);
        assert!(matches!(transport.ensure_credential(), Err(Error::Config(_))));

        let err = transport.post("/samples/search", None, &[]).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let transport = HttpTransport::new("http://127.0.0.1:1", Some(String::new()));
        assert!(matches!(transport.ensure_credential(), Err(Error::Config(_))));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let transport = HttpTransport::new("http://localhost:9090/api/v0.9/", Some("k".into()));
        assert_eq!(transport.base_url(), "http://localhost:9090/api/v0.9");
    }

    #[test]
    fn test_debug_hides_key() {
        let transport = HttpTransport::new("http://localhost", Some("secret-key".to_string()));
        let debug_output = format!("{:?}", transport);
        assert!(debug_output.contains("has_api_key: true"));
        assert!(!debug_output.contains("secret-key"));
    }
}
