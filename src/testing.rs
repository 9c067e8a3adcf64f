//! Testing utilities and mock implementations.
//!
//! These types are provided for use in tests. They may appear unused in
//! the library itself but are consumed by unit and integration tests.

#![allow(dead_code)]

use crate::client::{ClickUpClient, Credentials};
use crate::error::{Error, Result};
use crate::traits::{ApiRequest, Transport};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// A mock transport for testing.
///
/// Queued responses are handed out in order; every request is recorded so
/// tests can assert on method, path, query, and body. When the queue is
/// empty the mock answers `{}`.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Value>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    /// Create a new mock transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn respond(&self, value: Value) -> &Self {
        self.push(Ok(value));
        self
    }

    /// Queue an API error with the given status and message.
    pub fn fail(&self, status: u16, message: &str) -> &Self {
        self.push(Err(Error::Api { status, message: message.to_string(), code: None }));
        self
    }

    /// Queue an arbitrary error.
    pub fn fail_with(&self, error: Error) -> &Self {
        self.push(Err(error));
        self
    }

    fn push(&self, response: Result<Value>) {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner).push_back(response);
    }

    /// All requests made so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The most recent request.
    ///
    /// # Panics
    ///
    /// Panics if no request was made.
    #[must_use]
    pub fn last_request(&self) -> ApiRequest {
        self.requests().pop().expect("no request was made")
    }

    /// Number of requests made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &ApiRequest) -> Result<Value> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request.clone());
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})))
    }
}

/// A configured client over a fresh mock transport, with workspace `"999"`.
#[must_use]
pub fn mock_client() -> (ClickUpClient, Arc<MockTransport>) {
    mock_client_with(Credentials::new("pk_test", Some("999")))
}

/// A client over a fresh mock transport with the given credentials.
#[must_use]
pub fn mock_client_with(credentials: Credentials) -> (ClickUpClient, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let client = ClickUpClient::with_transport(credentials, transport.clone());
    (client, transport)
}
