//! Error types for the AutoFocus client

use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Machine-readable code the service may attach to a lost cookie.
const COOKIE_NOT_FOUND_CODE: &str = "AF_COOKIE_NOT_FOUND";

/// Text the service puts in the error message when a cookie vanished.
///
/// Matching on message text is fragile and only exists because the service
/// does not reliably send a code for this condition.
const COOKIE_NOT_FOUND_MESSAGE: &str = "AF Cookie Not Found";

/// A 4xx or 5xx answer from the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    /// HTTP status code
    pub status: u16,
    /// Human readable message (`message` field of a JSON body, or the raw body)
    pub message: String,
    /// Stable error code, when the service supplies one
    pub code: Option<String>,
    /// Raw response body
    pub body: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(alias = "errorCode")]
    code: Option<String>,
}

impl ApiFailure {
    pub fn from_body(status: u16, body: String) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(&body).ok();
        let (message, code) = match parsed {
            Some(ErrorBody { message, code }) => {
                (message.unwrap_or_else(|| body.clone()), code)
            }
            None => (body.clone(), None),
        };

        Self {
            status,
            message,
            code,
            body,
        }
    }

    /// Whether the service reported that the search cookie no longer exists.
    pub fn is_cookie_not_found(&self) -> bool {
        if let Some(code) = &self.code {
            return code.eq_ignore_ascii_case(COOKIE_NOT_FOUND_CODE);
        }
        // Compatibility shim for responses without a code.
        self.message.contains(COOKIE_NOT_FOUND_MESSAGE) || self.body.contains(COOKIE_NOT_FOUND_MESSAGE)
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "status {} [{}]: {}", self.status, code, self.message),
            None => write!(f, "status {}: {}", self.status, self.message),
        }
    }
}

impl std::error::Error for ApiFailure {}

fn percent(value: &Option<f64>) -> String {
    match value {
        Some(p) => format!("{p}%"),
        None => "unknown".to_string(),
    }
}

/// Errors from AutoFocus operations
#[derive(Debug, Error)]
pub enum Error {
    /// Missing credential or unusable configuration. Raised before any request.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The service rejected the request (4xx)
    #[error("AutoFocus client error, {0}")]
    Client(ApiFailure),

    /// The service failed to handle the request (5xx)
    #[error("AutoFocus server error, {0}")]
    Server(ApiFailure),

    /// A search clause is missing `field` or `value`
    #[error("Malformed search clause, missing `{missing}`: {clause}")]
    MalformedClause { missing: &'static str, clause: String },

    #[error("Raw query is not valid JSON: {0}")]
    InvalidQueryJson(#[source] serde_json::Error),

    /// The search cookie disappeared while its results were being polled
    #[error(
        "AutoFocus cookie has gone away after {attempts} polls taking {:.3} seconds, last reported completion was {}",
        .elapsed.as_secs_f64(),
        percent(.last_percentage)
    )]
    CursorLost {
        attempts: u32,
        elapsed: Duration,
        last_percentage: Option<f64>,
        #[source]
        source: ApiFailure,
    },

    /// The poll policy gave up before the page was ready
    #[error(
        "Search did not complete after {attempts} polls taking {:.3} seconds, last reported completion was {}",
        .elapsed.as_secs_f64(),
        percent(.last_percentage)
    )]
    PollExhausted {
        attempts: u32,
        elapsed: Duration,
        last_percentage: Option<f64>,
    },

    #[error("Argument must be a valid md5, sha1, or sha256 hash: {0}")]
    InvalidHash(String),

    #[error("No such hash found in AutoFocus: {0}")]
    NotFound(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Network or HTTP error talking to the service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    ConfigFile(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
