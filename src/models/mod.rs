//! Request and response descriptors for test steps.

pub mod request;
pub mod response;

pub use request::{strip_json_comments, RequestDescriptor, RequestError};
pub use response::{ResponseDescriptor, ResponseError};
