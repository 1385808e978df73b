//! Request descriptor and scope id derivation.
//!
//! The scoped store keys its entries by a *scope id*: a string identifying
//! the logical endpoint a value was recorded against, stable across repeated
//! calls to the same endpoint and distinct across different endpoints. The
//! descriptor derives it from the request's URL path: the named segment
//! together with the segment before it, e.g. a request named `create` under
//! `/api/users/create/confirm` gets the scope id `users/create`.
//!
//! Bodies are allowed to carry `//` and `/* */` comments, which JSON proper
//! forbids; [`strip_json_comments`] removes them without touching string
//! literals so annotated request bodies still parse.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Matches string literals (kept) or comments (dropped, capture group 1).
/// Matching the literal first is what protects `"http://..."` from being
/// read as a comment start.
static COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\\"|"(?:\\"|[^"])*"|(//.*|/\*[\s\S]*?\*/)"#)
        .expect("Failed to compile comment-stripping regex")
});

/// Errors raised while interrogating a request descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The request's name does not match a usable position in the URL path,
    /// so no scope id can be derived.
    UnknownEndpoint {
        /// The request name that was searched for
        name: String,
    },

    /// The URL path has no segment after the named one.
    MissingTailSegment {
        /// The request name whose following segment was requested
        name: String,
    },

    /// The request has no body, or the body does not parse as JSON once
    /// comments are stripped.
    InvalidBody(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::UnknownEndpoint { name } => {
                write!(
                    f,
                    "Cannot derive a scope id: request name '{}' does not match a path segment with a parent",
                    name
                )
            }
            RequestError::MissingTailSegment { name } => {
                write!(f, "No path segment follows the '{}' segment", name)
            }
            RequestError::InvalidBody(msg) => {
                write!(f, "Request body is not valid JSON: {}", msg)
            }
        }
    }
}

impl std::error::Error for RequestError {}

/// The request a test step is about to perform (or just performed).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestDescriptor {
    /// Logical request name; must match one of the URL path segments.
    pub name: String,

    /// URL path segments, in order, without slashes.
    pub path: Vec<String>,

    /// Raw request body, possibly containing comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestDescriptor {
    /// Creates a descriptor without a body.
    pub fn new(name: impl Into<String>, path: Vec<String>) -> Self {
        Self {
            name: name.into(),
            path,
            body: None,
        }
    }

    /// Creates a descriptor with a raw body.
    pub fn with_body(name: impl Into<String>, path: Vec<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path,
            body: Some(body.into()),
        }
    }

    /// Derives the scope id for this request.
    ///
    /// The scope id is `"<parent segment>/<named segment>"`, which stays
    /// stable across repeated calls to the same endpoint and differs across
    /// endpoints even when they share a trailing name.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::UnknownEndpoint`] if the name is not a path
    /// segment or is the leading segment (no parent to qualify it). Callers
    /// writing to the store must propagate this, not swallow it.
    pub fn scope_id(&self) -> Result<String, RequestError> {
        let index = self.name_index()?;
        if index == 0 {
            return Err(RequestError::UnknownEndpoint {
                name: self.name.clone(),
            });
        }
        Ok(format!("{}/{}", self.path[index - 1], self.path[index]))
    }

    /// Returns the path segment after the named one.
    ///
    /// Useful for endpoints that put an identifier behind the action
    /// segment, e.g. `/users/get/42`.
    pub fn uri_tail(&self) -> Result<String, RequestError> {
        let index = self.name_index()?;
        self.path.get(index + 1).cloned().ok_or_else(|| {
            RequestError::MissingTailSegment {
                name: self.name.clone(),
            }
        })
    }

    /// Parses the request body as JSON, tolerating comments.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidBody`] if there is no body or the
    /// stripped text does not parse.
    pub fn body_json(&self) -> Result<Value, RequestError> {
        let raw = self
            .body
            .as_deref()
            .ok_or_else(|| RequestError::InvalidBody("request has no body".to_string()))?;
        let stripped = strip_json_comments(raw);
        serde_json::from_str(&stripped)
            .map_err(|err| RequestError::InvalidBody(err.to_string()))
    }

    fn name_index(&self) -> Result<usize, RequestError> {
        self.path
            .iter()
            .position(|segment| *segment == self.name)
            .ok_or_else(|| RequestError::UnknownEndpoint {
                name: self.name.clone(),
            })
    }
}

/// Removes `//` and `/* */` comments from JSON text.
///
/// String literals are matched first and kept verbatim, so comment markers
/// inside them survive.
pub fn strip_json_comments(raw: &str) -> String {
    COMMENT_REGEX
        .replace_all(raw, |caps: &Captures| {
            if caps.get(1).is_some() {
                String::new()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}
