//! Real HTTP transport implementation.

use crate::error::{Error, Result};
use crate::traits::{ApiRequest, ApiVersion, Method, Transport, API_V2_BASE, API_V3_BASE};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Map, Value};
use std::time::Duration;

/// Timeout applied to every API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the connection probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport that talks to ClickUp over HTTPS.
///
/// Every call carries the raw token in `Authorization`, a JSON content type,
/// and the same timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    token: String,
    v2_base: String,
    v3_base: String,
}

impl HttpTransport {
    /// Create a transport with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(token: &str) -> Result<Self> {
        Self::with_timeout(token, DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn with_timeout(token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            token: token.to_string(),
            v2_base: API_V2_BASE.to_string(),
            v3_base: API_V3_BASE.to_string(),
        })
    }

    /// Point the transport at different base URLs (e.g. a local proxy).
    #[must_use]
    pub fn with_base_urls(mut self, v2: &str, v3: &str) -> Self {
        self.v2_base = v2.trim_end_matches('/').to_string();
        self.v3_base = v3.trim_end_matches('/').to_string();
        self
    }

    fn url_for(&self, request: &ApiRequest) -> String {
        let base = match request.version {
            ApiVersion::V2 => &self.v2_base,
            ApiVersion::V3 => &self.v3_base,
        };
        format!("{base}{}", request.path)
    }
}

const fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<Value> {
        let url = self.url_for(request);
        tracing::debug!(method = %request.method, %url, "ClickUp request");

        let mut builder = self
            .client
            .request(to_reqwest(request.method), &url)
            .header(AUTHORIZATION, &self.token)
            .header(CONTENT_TYPE, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|e| {
            tracing::error!(method = %request.method, %url, error = %e, "ClickUp API connection error");
            Error::Connection(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| {
            tracing::error!(method = %request.method, %url, error = %e, "ClickUp API read error");
            Error::Connection(e.to_string())
        })?;

        interpret_response(status, &body).inspect_err(|e| {
            if let Error::Api { status, message, code } = e {
                tracing::error!(
                    status,
                    method = %request.method,
                    %url,
                    err = %message,
                    ecode = code.as_deref().unwrap_or(""),
                    "ClickUp API error"
                );
            }
        })
    }
}

/// Turn a raw status and body into the decoded result or an API error.
///
/// # Errors
///
/// Returns [`Error::Api`] for any status outside 200-299.
pub fn interpret_response(status: u16, body: &str) -> Result<Value> {
    let decoded: Option<Value> = serde_json::from_str(body).ok();

    if (200..300).contains(&status) {
        return Ok(decoded.unwrap_or_else(|| Value::Object(Map::new())));
    }

    let field = |key: &str| decoded.as_ref().and_then(|v| v.get(key)).filter(|v| !v.is_null());
    let message = match field("err").or_else(|| field("error")) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => body.to_string(),
    };
    let code = field("ECODE").map(|c| match c {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });

    Err(Error::Api { status, message, code })
}
