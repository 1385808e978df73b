//! Response capture into the scoped store.
//!
//! A thin consumer on top of [`ScopedStore`]: after a test step's network
//! call, the recorder takes the response body, optionally merges extra
//! fields into it, and persists it under a record key and the current
//! request's scope id. Failed responses are never recorded.

use crate::models::{ResponseDescriptor, ResponseError};
use crate::store::{ScopedStore, StoreError, VariableStore};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::fmt;

/// Errors raised while recording a response.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    /// Reading the response body failed.
    Response(ResponseError),

    /// Writing to the scoped store failed.
    Store(StoreError),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Response(err) => write!(f, "Failed to read response: {}", err),
            RecordError::Store(err) => write!(f, "Failed to store response: {}", err),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordError::Response(err) => Some(err),
            RecordError::Store(err) => Some(err),
        }
    }
}

impl From<ResponseError> for RecordError {
    fn from(err: ResponseError) -> Self {
        RecordError::Response(err)
    }
}

impl From<StoreError> for RecordError {
    fn from(err: StoreError) -> Self {
        RecordError::Store(err)
    }
}

/// Extra fields to merge into a recorded response body.
///
/// Merging is shallow: each field is inserted at the top level of the body,
/// overwriting an existing key of the same name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordOptions {
    /// Fields added to the body before it is stored.
    pub add_fields: Option<Map<String, Value>>,
}

impl RecordOptions {
    /// Options that store the body as-is.
    pub fn none() -> Self {
        Self::default()
    }

    /// Options that merge the given fields into the body.
    pub fn with_fields(fields: Map<String, Value>) -> Self {
        Self {
            add_fields: Some(fields),
        }
    }
}

/// Captures response bodies into the scoped store for later steps.
///
/// Constructed per step from the step's response and the scope id derived
/// from its request.
#[derive(Debug)]
pub struct ResponseRecorder<'a, S: VariableStore> {
    scoped: &'a mut ScopedStore<S>,
    response: &'a ResponseDescriptor,
    scope_id: String,
}

impl<'a, S: VariableStore> ResponseRecorder<'a, S> {
    /// Creates a recorder for one step.
    pub fn new(
        scoped: &'a mut ScopedStore<S>,
        response: &'a ResponseDescriptor,
        scope_id: impl Into<String>,
    ) -> Self {
        Self {
            scoped,
            response,
            scope_id: scope_id.into(),
        }
    }

    /// Records the response body under a record key.
    ///
    /// No-op (returns `false`) when the response indicates failure. On
    /// success the body is parsed, extra fields are merged in, and the
    /// result is written via [`ScopedStore::set`] under the step's scope id.
    pub fn set(&mut self, record_key: &str, options: &RecordOptions) -> Result<bool, RecordError> {
        let Some(body) = self.prepared_body(record_key, options)? else {
            return Ok(false);
        };
        self.scoped.set(record_key, body, &self.scope_id)?;
        Ok(true)
    }

    /// Appends the response body to the sequence under a record key.
    ///
    /// Same failure handling and field merging as [`set`](Self::set), but
    /// forwarded to [`ScopedStore::push`].
    pub fn push(&mut self, record_key: &str, options: &RecordOptions) -> Result<bool, RecordError> {
        let Some(body) = self.prepared_body(record_key, options)? else {
            return Ok(false);
        };
        self.scoped.push(record_key, body, &self.scope_id)?;
        Ok(true)
    }

    fn prepared_body(
        &self,
        record_key: &str,
        options: &RecordOptions,
    ) -> Result<Option<Value>, RecordError> {
        if self.response.is_failure() {
            debug!(
                "response failed with status {}, not recording '{}'",
                self.response.status_code, record_key
            );
            return Ok(None);
        }

        let mut body = self.response.json()?;
        if let Some(fields) = &options.add_fields {
            merge_fields(&mut body, fields);
        }
        Ok(Some(body))
    }
}

fn merge_fields(body: &mut Value, fields: &Map<String, Value>) {
    match body {
        Value::Object(map) => {
            for (name, value) in fields {
                map.insert(name.clone(), value.clone());
            }
        }
        other => {
            warn!(
                "cannot merge fields into a non-object response body ({})",
                other
            );
        }
    }
}
