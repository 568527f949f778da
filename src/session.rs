//! Per-test stubbing session.
//!
//! A [`StubSession`] owns the stub registry and the captured-call list for one
//! test case. The interception layer feeds captured calls in through
//! [`StubSession::record_call`]; the test author declares stubs with
//! [`StubSession::stub_request`] and resolves them through the returned
//! handles. The test harness resets the session at the start of each case.

use crate::call::CallRef;
use crate::error::RequestNotFoundError;
use crate::registry::{self, StubRef, StubRegistry};
use crate::response::{ResponseDescriptor, StubResponse};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct SessionState {
    registry: StubRegistry,
    calls: Vec<CallRef>,
}

/// Stubbing context for a single test case.
///
/// Cheap to clone; clones share the same registry and captured-call list, so
/// the interception layer and the test body can each hold one.
#[derive(Debug, Clone, Default)]
pub struct StubSession {
    state: Rc<RefCell<SessionState>>,
}

impl StubSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stubs and captured calls. Called by the test-lifecycle hook
    /// at the start of each test case.
    pub fn reset(&self) {
        let mut state = self.state.borrow_mut();
        state.registry.clear();
        state.calls.clear();
    }

    /// Record an outgoing call captured by the interception layer.
    pub fn record_call(&self, call: CallRef) {
        debug!(method = call.method(), url = call.url(), "captured outgoing call");
        self.state.borrow_mut().calls.push(call);
    }

    /// Number of calls captured so far.
    pub fn captured_calls(&self) -> usize {
        self.state.borrow().calls.len()
    }

    /// Declare a stub for the given method and URL.
    ///
    /// The URL is the contract: when it carries a query string, a captured
    /// call matches only with exactly that parameter set (in any order); when
    /// it carries none, only bare requests to the same base path match.
    /// Re-declaring the same method and URL replaces the previous stub.
    pub fn stub_request(&self, method: &str, url: &str) -> StubHandle {
        debug!(method, url, "stub registered");
        let stub = self.state.borrow_mut().registry.register(method, url);
        StubHandle {
            stub,
            state: Rc::clone(&self.state),
        }
    }

    /// Exact-key lookup of a declared stub. No URL matching is applied, so the
    /// query string must be written exactly as it was declared.
    pub fn get_mock(&self, method: &str, url: &str) -> Option<StubHandle> {
        self.state
            .borrow()
            .registry
            .find(method, url)
            .map(|stub| StubHandle {
                stub,
                state: Rc::clone(&self.state),
            })
    }

    /// Matching-aware lookup over the captured calls.
    ///
    /// Unlike [`get_mock`](Self::get_mock) this consults what the code under
    /// test actually sent: `requested` is true iff some captured call of the
    /// given method matches the URL (query order irrelevant).
    pub fn get_request(&self, method: &str, url: &str) -> RequestLookup {
        let state = self.state.borrow();
        let request = registry::find_matching_call(method, url, &state.calls);
        RequestLookup {
            requested: request.is_some(),
            request,
        }
    }
}

/// Result of a matching-aware captured-call lookup.
#[derive(Debug, Clone)]
pub struct RequestLookup {
    /// The first matching captured call, if any.
    pub request: Option<CallRef>,
    /// Whether a matching call was captured.
    pub requested: bool,
}

/// Handle to a declared stub, returned by [`StubSession::stub_request`].
#[derive(Debug, Clone)]
pub struct StubHandle {
    stub: StubRef,
    state: Rc<RefCell<SessionState>>,
}

impl StubHandle {
    /// HTTP method the stub was declared for.
    pub fn method(&self) -> String {
        self.stub.borrow().method.clone()
    }

    /// Declared URL, query string included.
    pub fn url(&self) -> String {
        self.stub.borrow().url.clone()
    }

    /// Whether a response has been delivered through this stub.
    pub fn responded(&self) -> bool {
        self.stub.borrow().responded
    }

    /// The captured call this stub resolved, once delivered.
    pub fn matched_request(&self) -> Option<CallRef> {
        self.stub.borrow().matched.clone()
    }

    /// Build a response from the descriptor and deliver it now.
    ///
    /// Fails with [`RequestNotFoundError`] when no captured call matches the
    /// stub's method and URL; the stub stays unresolved in that case. Calling
    /// again on an already-resolved stub repeats the match and delivers again.
    pub fn and_return(
        &self,
        descriptor: ResponseDescriptor,
    ) -> Result<(), RequestNotFoundError> {
        let response = StubResponse::build(&descriptor);
        deliver(&self.stub, &response, &self.state)
    }

    /// Capture a response now but deliver nothing yet.
    ///
    /// The returned handle triggers delivery later, within the same test. The
    /// stub stays unresolved (`responded() == false`) until then.
    pub fn and_wait(&self, descriptor: ResponseDescriptor) -> DeferredHandle {
        DeferredHandle {
            stub: Rc::clone(&self.stub),
            state: Rc::clone(&self.state),
            stored: StubResponse::build(&descriptor),
        }
    }
}

/// Deferred delivery handle, returned by [`StubHandle::and_wait`].
#[derive(Debug, Clone)]
pub struct DeferredHandle {
    stub: StubRef,
    state: Rc<RefCell<SessionState>>,
    stored: StubResponse,
}

impl DeferredHandle {
    /// Deliver the response captured at `and_wait` time.
    ///
    /// Same match-then-respond sequence as [`StubHandle::and_return`],
    /// including the [`RequestNotFoundError`] failure mode.
    pub fn respond(&self) -> Result<(), RequestNotFoundError> {
        deliver(&self.stub, &self.stored, &self.state)
    }

    /// Deliver a response built fresh from the given descriptor, ignoring
    /// whatever was passed to `and_wait`.
    pub fn respond_with(
        &self,
        descriptor: ResponseDescriptor,
    ) -> Result<(), RequestNotFoundError> {
        let response = StubResponse::build(&descriptor);
        deliver(&self.stub, &response, &self.state)
    }
}

/// Match-then-respond bridge shared by the immediate and deferred paths.
///
/// On no-match the stub state is left untouched. On match the stub is marked
/// resolved before `respond` runs, and no session borrow is held across the
/// `respond` invocation: the caller's completion handler may re-enter the
/// session, for instance when the code under test issues a follow-up request.
fn deliver(
    stub: &StubRef,
    response: &StubResponse,
    state: &Rc<RefCell<SessionState>>,
) -> Result<(), RequestNotFoundError> {
    let (method, url) = {
        let stub = stub.borrow();
        (stub.method.clone(), stub.url.clone())
    };

    let call = {
        let state = state.borrow();
        registry::find_matching_call(&method, &url, &state.calls)
    };

    let Some(call) = call else {
        warn!(%method, %url, "no captured call matched stub");
        return Err(RequestNotFoundError { method, url });
    };

    {
        let mut stub = stub.borrow_mut();
        stub.responded = true;
        stub.matched = Some(Rc::clone(&call));
    }

    debug!(%method, %url, status = response.status, "delivering stubbed response");
    call.respond(response);
    Ok(())
}

/// The `toHaveBeenRequested` assertion predicate.
///
/// True when the underlying object has seen its request: a resolved stub
/// handle, a lookup that found a matching captured call.
pub trait HasBeenRequested {
    /// Whether the expected request occurred.
    fn has_been_requested(&self) -> bool;
}

impl HasBeenRequested for StubHandle {
    fn has_been_requested(&self) -> bool {
        self.responded()
    }
}

impl HasBeenRequested for RequestLookup {
    fn has_been_requested(&self) -> bool {
        self.requested
    }
}

impl<T: HasBeenRequested> HasBeenRequested for Option<T> {
    fn has_been_requested(&self) -> bool {
        self.as_ref().is_some_and(HasBeenRequested::has_been_requested)
    }
}
