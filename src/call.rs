//! Captured outgoing calls.
//!
//! The HTTP interception layer records every call the code under test makes
//! and hands each one to the session as an [`InterceptedCall`]. The session
//! never owns the caller's completion handlers; it delivers a response through
//! `respond` and the interception layer routes it from there.

use crate::response::StubResponse;
use std::cell::RefCell;
use std::rc::Rc;

/// An outgoing call captured by the HTTP interception layer.
///
/// `respond` delivers a response into the caller's success/error/complete
/// handlers synchronously, in the same tick as the delivery attempt.
pub trait InterceptedCall {
    /// HTTP method of the captured call.
    fn method(&self) -> &str;

    /// URL of the captured call, including any query string.
    fn url(&self) -> &str;

    /// Deliver a response to the caller's completion path.
    fn respond(&self, response: &StubResponse);
}

impl std::fmt::Debug for dyn InterceptedCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptedCall")
            .field("method", &self.method())
            .field("url", &self.url())
            .finish()
    }
}

/// Shared handle to a captured call.
pub type CallRef = Rc<dyn InterceptedCall>;

/// A captured call that records every response delivered to it.
///
/// Stands in for the interception layer's call record when wiring tests (this
/// crate's own included): register it with the session, resolve a stub, then
/// inspect what arrived.
pub struct RecordedCall {
    method: String,
    url: String,
    delivered: RefCell<Vec<StubResponse>>,
}

impl RecordedCall {
    /// Create a recorded call for the given method and URL.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            method: method.into(),
            url: url.into(),
            delivered: RefCell::new(Vec::new()),
        })
    }

    /// All responses delivered so far, in delivery order.
    pub fn responses(&self) -> Vec<StubResponse> {
        self.delivered.borrow().clone()
    }

    /// The most recently delivered response, if any.
    pub fn last_response(&self) -> Option<StubResponse> {
        self.delivered.borrow().last().cloned()
    }

    /// Whether any response has been delivered.
    pub fn was_answered(&self) -> bool {
        !self.delivered.borrow().is_empty()
    }
}

impl InterceptedCall for RecordedCall {
    fn method(&self) -> &str {
        &self.method
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn respond(&self, response: &StubResponse) {
        self.delivered.borrow_mut().push(response.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_call_starts_unanswered() {
        let call = RecordedCall::new("GET", "/api");
        assert!(!call.was_answered());
        assert_eq!(call.last_response(), None);
    }

    #[test]
    fn test_recorded_call_keeps_delivery_order() {
        let call = RecordedCall::new("GET", "/api");

        call.respond(&StubResponse {
            status: 200,
            response_text: "first".to_string(),
        });
        call.respond(&StubResponse {
            status: 500,
            response_text: "second".to_string(),
        });

        let responses = call.responses();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].response_text, "first");
        assert_eq!(call.last_response().unwrap().status, 500);
    }
}
