//! Toolkit for scripted API test flows.
//!
//! Supports the three phases of a scripted test step: staging values before
//! a request, harvesting values from the response, and persisting them for
//! later steps in the run.
//!
//! # Architecture
//!
//! - **store**: the persistence core. A [`VariableStore`] trait describes
//!   the host's flat string-only variable store; [`ScopedStore`] multiplexes
//!   many logical entries under one physical key, one entry per endpoint
//!   scope id, tracking recency by insertion order.
//! - **projector**: flattens structured values into flat dotted-path
//!   variables (`user.firstName`) so a templating layer can reference
//!   object fields in request bodies.
//! - **recorder**: captures successful response bodies into the scoped
//!   store under the current request's scope id.
//! - **models**: request and response descriptors, including scope id
//!   derivation from the URL path and comment-tolerant body parsing.
//! - **random**: stateless generators for staging test data (names, emails,
//!   identities, identifiers).
//!
//! # A typical step
//!
//! ```
//! use rest_testkit::models::{RequestDescriptor, ResponseDescriptor};
//! use rest_testkit::recorder::{RecordOptions, ResponseRecorder};
//! use rest_testkit::store::{InMemoryStore, ScopedStore};
//! use rest_testkit::projector::VariableProjector;
//! use serde_json::json;
//!
//! let mut store = InMemoryStore::new();
//!
//! // Stage inputs for the templating layer
//! VariableProjector::new(&mut store).set("user", &json!({"name": "Ada"}));
//!
//! // ... perform the network call outside this crate ...
//! let request = RequestDescriptor::new(
//!     "create",
//!     vec!["api".into(), "users".into(), "create".into()],
//! );
//! let response = ResponseDescriptor::new(201, r#"{"id": 7}"#);
//!
//! // Persist the outcome for later steps
//! let scope_id = request.scope_id().unwrap();
//! let mut scoped = ScopedStore::new(&mut store);
//! ResponseRecorder::new(&mut scoped, &response, scope_id)
//!     .set("user", &RecordOptions::none())
//!     .unwrap();
//!
//! assert_eq!(scoped.get("user", None).unwrap(), Some(json!({"id": 7})));
//! ```
//!
//! # Execution model
//!
//! Single-threaded and synchronous by design: the surrounding test runner
//! executes steps strictly in sequence, and the store layer's
//! read-modify-write cycles depend on that guarantee. See the
//! [`store::scoped`] module docs before hosting this crate anywhere
//! concurrent.

pub mod models;
pub mod projector;
pub mod random;
pub mod recorder;
pub mod store;
pub mod value;

pub use models::{RequestDescriptor, RequestError, ResponseDescriptor, ResponseError};
pub use projector::{stage_recorded, VariableProjector};
pub use recorder::{RecordError, RecordOptions, ResponseRecorder};
pub use store::{EntryMap, InMemoryStore, ScopedStore, StoreError, VariableStore};
