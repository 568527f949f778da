//! Stub registry.
//!
//! Stores stubs keyed by method + URL and binds them to captured calls.

use crate::call::CallRef;
use crate::matcher::urls_match;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Mutable state of one declared stub.
#[derive(Debug)]
pub(crate) struct StubState {
    /// HTTP method the stub was declared for.
    pub method: String,
    /// Declared URL, query string included.
    pub url: String,
    /// Whether a response has been delivered through this stub.
    pub responded: bool,
    /// The captured call the stub resolved, once delivered.
    pub matched: Option<CallRef>,
}

/// Shared handle to a stub's state.
pub(crate) type StubRef = Rc<RefCell<StubState>>;

/// Registry of declared stubs, keyed by raw `method + "_" + url`.
#[derive(Debug, Default)]
pub(crate) struct StubRegistry {
    stubs: HashMap<String, StubRef>,
}

impl StubRegistry {
    fn key(method: &str, url: &str) -> String {
        format!("{method}_{url}")
    }

    /// Create a stub and store it. A stub already registered under the same
    /// key is overwritten; last registration wins.
    pub fn register(&mut self, method: &str, url: &str) -> StubRef {
        let stub = Rc::new(RefCell::new(StubState {
            method: method.to_string(),
            url: url.to_string(),
            responded: false,
            matched: None,
        }));
        self.stubs.insert(Self::key(method, url), Rc::clone(&stub));
        stub
    }

    /// Exact raw-key lookup. No URL matching is applied.
    pub fn find(&self, method: &str, url: &str) -> Option<StubRef> {
        self.stubs.get(&Self::key(method, url)).cloned()
    }

    /// Drop all stubs (start of a new test case).
    pub fn clear(&mut self) {
        self.stubs.clear();
    }
}

/// Find the first captured call of the given method whose URL satisfies the
/// stub's declared URL. This is the binding step between what the test
/// declared and what the code under test actually sent.
pub(crate) fn find_matching_call(method: &str, url: &str, calls: &[CallRef]) -> Option<CallRef> {
    calls
        .iter()
        .find(|call| call.method() == method && urls_match(url, call.url()))
        .cloned()
}
