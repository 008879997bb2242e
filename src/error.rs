//! Error handling for the catalog client

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Unified error type for the catalog client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or transport failures from the HTTP stack
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Local file errors (upload sources, token files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Non-2xx response from the backend
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Rejected locally before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend issued a credential the client cannot use
    #[error("Authentication error: {0}")]
    Auth(String),

    /// `fetch_all` hit its page bound without seeing a short page
    #[error("pagination stopped after {pages} full pages ({fetched} records) without reaching the end")]
    PaginationLimit { pages: usize, fetched: usize },
}

impl Error {
    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// A structured error returned by the backend for any non-2xx response.
///
/// The display message follows a fixed precedence: the body's `detail`, then its
/// `message`, then `API Error: <status> <status text>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase for the status
    pub status_text: String,
    /// Parsed error body, `None` when the body was not a JSON object
    pub body: Option<ApiErrorBody>,
}

impl ApiError {
    pub fn new(status: u16, status_text: impl Into<String>, body: Option<ApiErrorBody>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body,
        }
    }

    /// Message shown to users for this error
    pub fn message(&self) -> String {
        let body = self.body.as_ref();
        body.and_then(|b| b.detail.as_ref())
            .and_then(ErrorDetail::message)
            .or_else(|| {
                body.and_then(|b| b.message.clone())
                    .filter(|m| !m.is_empty())
            })
            .unwrap_or_else(|| format!("API Error: {} {}", self.status, self.status_text))
    }

    /// Field-level validation errors, if the backend sent any
    pub fn field_errors(&self) -> Option<&HashMap<String, Vec<String>>> {
        self.body.as_ref().and_then(|b| b.errors.as_ref())
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ApiError {}

/// The recognized fields of an error body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub detail: Option<ErrorDetail>,
    pub errors: Option<HashMap<String, Vec<String>>>,
}

/// The `detail` field is a string for most errors, but request validation
/// failures carry a list of objects instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    Text(String),
    Structured(Value),
}

impl ErrorDetail {
    /// Message for this detail; empty strings count as absent
    pub fn message(&self) -> Option<String> {
        match self {
            ErrorDetail::Text(text) if text.is_empty() => None,
            ErrorDetail::Text(text) => Some(text.clone()),
            ErrorDetail::Structured(Value::Array(items)) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if msgs.is_empty() {
                    Some(Value::Array(items.clone()).to_string())
                } else {
                    Some(msgs.join("; "))
                }
            }
            ErrorDetail::Structured(other) => Some(other.to_string()),
        }
    }
}

impl ApiErrorBody {
    /// Pick the recognized fields out of a raw error body.
    ///
    /// Returns `None` unless the body is a JSON object. Fields of an unexpected
    /// type are dropped individually rather than failing the whole body.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let value: Value = serde_json::from_slice(bytes).ok()?;
        let object = value.as_object()?;

        let message = object
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);

        let detail = match object.get("detail") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(ErrorDetail::Text(text.clone())),
            Some(other) => Some(ErrorDetail::Structured(other.clone())),
        };

        let errors = object
            .get("errors")
            .cloned()
            .and_then(|v| HashMap::<String, FieldMessages>::deserialize(v).ok())
            .map(|map| map.into_iter().map(|(k, v)| (k, v.0)).collect());

        Some(Self {
            message,
            detail,
            errors,
        })
    }
}

/// Accepts either a single message or a list of them for one field
struct FieldMessages(Vec<String>);

impl<'de> Deserialize<'de> for FieldMessages {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::One(msg) => FieldMessages(vec![msg]),
            Raw::Many(msgs) => FieldMessages(msgs),
        })
    }
}
