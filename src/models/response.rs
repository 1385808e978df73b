//! Response descriptor for recording test-step outcomes.
//!
//! A trimmed view of the HTTP response a test step just received: the
//! status code and the raw body. Success is judged by the status family
//! alone, and the parsed body is only reachable on success so a failed call
//! can never leak a half-usable payload into the store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Errors raised when reading a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// The response was not successful, so the body may not be read.
    NotSuccessful {
        /// The status code the server returned
        status_code: u16,
    },

    /// The body could not be parsed as JSON.
    InvalidBody(String),
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseError::NotSuccessful { status_code } => {
                write!(
                    f,
                    "Cannot read the body of a failed response (status {})",
                    status_code
                )
            }
            ResponseError::InvalidBody(msg) => {
                write!(f, "Response body is not valid JSON: {}", msg)
            }
        }
    }
}

impl std::error::Error for ResponseError {}

/// The outcome of a test step's network call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseDescriptor {
    /// HTTP status code (e.g., 200, 404, 500).
    pub status_code: u16,

    /// Raw response body text.
    pub body: String,
}

impl ResponseDescriptor {
    /// Creates a descriptor from a status code and raw body.
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    /// Checks whether the status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Checks whether the status indicates failure (anything but 2xx).
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Parses the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::NotSuccessful`] when called on a failed
    /// response and [`ResponseError::InvalidBody`] when the body does not
    /// parse.
    pub fn json(&self) -> Result<Value, ResponseError> {
        if self.is_failure() {
            return Err(ResponseError::NotSuccessful {
                status_code: self.status_code,
            });
        }
        serde_json::from_str(&self.body)
            .map_err(|err| ResponseError::InvalidBody(err.to_string()))
    }

    /// Runs a closure only when the response is successful.
    pub fn on_success<F: FnOnce(&Self)>(&self, func: F) {
        if self.is_success() {
            func(self);
        }
    }
}
