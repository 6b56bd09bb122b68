//! Request descriptors and raw response envelopes.

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ApiError;

/// Payload of an outbound request.
///
/// A request with no logical body sends no body bytes at all; `Empty` is a
/// distinct case, not an encoded empty object.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
}

impl RequestBody {
    /// Serializes a payload into a JSON body. Serialization happens here so
    /// a bad payload fails before anything is sent.
    pub fn json<T: Serialize>(payload: &T) -> Result<Self, ApiError> {
        Ok(Self::Json(serde_json::to_value(payload)?))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Describes one logical API call.
///
/// Immutable once built; the executor sends it once, plus at most one retry
/// with a refreshed credential.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: RequestBody,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a query parameter; order is preserved on the wire.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Attaches a JSON body.
    pub fn json<T: Serialize>(mut self, payload: &T) -> Result<Self, ApiError> {
        self.body = RequestBody::json(payload)?;
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Raw result of one physical HTTP exchange, prior to typed decoding.
///
/// Header lookup through [`HeaderMap`] is case-insensitive.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decodes the body as JSON into the caller's expected shape.
    pub fn decode<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as text, for error reporting.
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
