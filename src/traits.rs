//! Core traits for testability and abstraction.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Base URL of the ClickUp v2 API.
pub const API_V2_BASE: &str = "https://api.clickup.com/api/v2";

/// Base URL of the ClickUp v3 API (chat and documents).
pub const API_V3_BASE: &str = "https://api.clickup.com/api/v3";

/// HTTP verbs the ClickUp API is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl Method {
    /// The verb as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(Error::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Which API generation a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    /// The v2 API, used for most operations.
    #[default]
    V2,
    /// The v3 API, used for chat and documents.
    V3,
}

impl ApiVersion {
    /// The base URL for this version.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::V2 => API_V2_BASE,
            Self::V3 => API_V3_BASE,
        }
    }
}

/// A single call against the ClickUp API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// The HTTP verb.
    pub method: Method,
    /// The API generation.
    pub version: ApiVersion,
    /// Path below the versioned base URL, starting with `/`.
    pub path: String,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request with no query and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, version: ApiVersion::V2, path: path.into(), query: Vec::new(), body: None }
    }

    /// Shorthand for a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Shorthand for a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Shorthand for a `PUT` request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// Shorthand for a `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Target the v3 API.
    #[must_use]
    pub const fn v3(mut self) -> Self {
        self.version = ApiVersion::V3;
        self
    }

    /// Append query parameters.
    #[must_use]
    pub fn query(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(params);
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// The absolute URL, without query string.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}{}", self.version.base_url(), self.path)
    }
}

/// Trait for executing ClickUp API calls.
///
/// This trait abstracts the HTTP layer for testability. The production
/// implementation is [`crate::http::HttpTransport`]; tests use
/// [`crate::testing::MockTransport`].
pub trait Transport: Send + Sync {
    /// Execute one request and return the decoded JSON body.
    ///
    /// Successful responses with an empty or non-JSON body decode to an
    /// empty object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] when no response was received and
    /// [`Error::Api`] for non-success statuses.
    fn send(&self, request: &ApiRequest) -> Result<Value>;
}
