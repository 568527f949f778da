//! Response construction.
//!
//! Normalizes test-author response descriptors into the canonical response
//! shape delivered to a captured call.

use serde::{Deserialize, Serialize};

/// Test-author description of a stub response.
///
/// Every field is optional; an empty descriptor yields a `200` with an empty
/// body. Deserializes from JSON fixtures, so stub responses can be declared in
/// config files as well as code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseDescriptor {
    /// HTTP status code (defaults to 200)
    #[serde(default)]
    pub status: Option<u16>,

    /// Response body
    #[serde(default)]
    pub body: Option<ResponseBody>,
}

impl ResponseDescriptor {
    /// Descriptor with only a status code.
    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            body: None,
        }
    }

    /// Descriptor with a plain text body.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: None,
            body: Some(ResponseBody::Text(body.into())),
        }
    }

    /// Descriptor with a JSON body.
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: None,
            body: Some(ResponseBody::Json(body)),
        }
    }

    /// Set the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: ResponseBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// Response body given by the test author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// Plain string body, delivered unchanged
    Text(String),
    /// Structured body, serialized to its JSON text form
    Json(serde_json::Value),
}

/// Canonical response delivered to a captured call's completion path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubResponse {
    /// HTTP status code
    pub status: u16,
    /// Serialized response body
    pub response_text: String,
}

impl StubResponse {
    /// Build the canonical response for a descriptor.
    ///
    /// Always succeeds: a missing or zero status becomes 200, a missing or
    /// null body becomes the empty string, and a structured body is rendered
    /// as compact JSON.
    pub fn build(descriptor: &ResponseDescriptor) -> Self {
        let status = match descriptor.status {
            Some(status) if status != 0 => status,
            _ => 200,
        };

        let response_text = match &descriptor.body {
            Some(ResponseBody::Text(text)) => text.clone(),
            Some(ResponseBody::Json(serde_json::Value::Null)) => String::new(),
            Some(ResponseBody::Json(value)) => value.to_string(),
            None => String::new(),
        };

        Self {
            status,
            response_text,
        }
    }
}

impl Default for StubResponse {
    fn default() -> Self {
        Self::build(&ResponseDescriptor::default())
    }
}
