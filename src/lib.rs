//! Request stubbing for tests.
//!
//! Outgoing calls captured by an HTTP interception layer are answered by
//! stubs declared per method + URL. A stub responds immediately
//! (`and_return`) or holds its response until the test triggers it
//! (`and_wait`, then `respond`/`respond_with`).
//!
//! # Features
//!
//! - **Stub Registry**: stubs keyed by method + URL, last declaration wins
//! - **Query-Set Matching**: query parameters compare as an unordered set
//! - **Immediate Responses**: `and_return` delivers in the same tick
//! - **Deferred Responses**: `and_wait` captures now, delivers on demand
//! - **Loud Failures**: resolving a stub nobody called is an error
//!
//! # Example
//!
//! ```
//! use request_stub::{RecordedCall, ResponseDescriptor, StubSession};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), request_stub::RequestNotFoundError> {
//! let session = StubSession::new();
//!
//! // The interception layer records what the code under test sent.
//! let call = RecordedCall::new("GET", "/api/users?page=2&active=true");
//! session.record_call(call.clone());
//!
//! // Query order does not matter when resolving the stub.
//! let stub = session.stub_request("GET", "/api/users?active=true&page=2");
//! stub.and_return(ResponseDescriptor::json(json!({"users": []})))?;
//!
//! assert!(stub.responded());
//! assert_eq!(call.last_response().unwrap().status, 200);
//! assert_eq!(call.last_response().unwrap().response_text, r#"{"users":[]}"#);
//! # Ok(())
//! # }
//! ```

pub mod call;
pub mod error;
pub mod matcher;
pub mod response;
pub mod session;

mod registry;

pub use call::{CallRef, InterceptedCall, RecordedCall};
pub use error::RequestNotFoundError;
pub use response::{ResponseBody, ResponseDescriptor, StubResponse};
pub use session::{DeferredHandle, HasBeenRequested, RequestLookup, StubHandle, StubSession};
