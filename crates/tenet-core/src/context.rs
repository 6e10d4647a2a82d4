//! Request context types.
//!
//! The [`Context`] carries the decoded request through the middleware chain,
//! collects the response the handler produces, and is turned back into an
//! HTTP response once the chain finishes. It is owned by exactly one request.

use crate::file::UploadedFile;
use crate::TenetError;
use http::{HeaderMap, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps request logs sortable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-request state shared by every middleware of a route.
///
/// The request side is split into the same buckets parameters are declared
/// in: path `params`, `query`, `body` and uploaded `files`. Validation
/// middleware replaces these buckets with their validated values, so a
/// handler only ever sees coerced and defaulted input.
///
/// The response side starts as `404 Not Found` with no body. Writing a body
/// without setting a status answers `200 OK`.
///
/// # Example
///
/// ```
/// use tenet_core::Context;
/// use http::{Method, StatusCode};
/// use serde_json::json;
///
/// let mut ctx = Context::new(Method::POST, "/users")
///     .with_body(json!({ "name": "ada" }));
///
/// assert_eq!(ctx.status(), StatusCode::NOT_FOUND);
/// ctx.set_response_body(json!({ "id": 1 }));
/// assert_eq!(ctx.status(), StatusCode::OK);
/// ```
pub struct Context {
    request_id: RequestId,
    method: Method,
    path: String,
    headers: HeaderMap,
    params: Map<String, Value>,
    query: Map<String, Value>,
    body: Value,
    files: Vec<UploadedFile>,
    status: StatusCode,
    status_set: bool,
    response_body: Option<Value>,
    response_headers: HeaderMap,
    started_at: Instant,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Context {
    /// Creates a context for a request with no parameters or body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            params: Map::new(),
            query: Map::new(),
            body: Value::Null,
            files: Vec::new(),
            status: StatusCode::NOT_FOUND,
            status_set: false,
            response_body: None,
            response_headers: HeaderMap::new(),
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Sets the request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the path parameters.
    #[must_use]
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    /// Sets the decoded query string.
    #[must_use]
    pub fn with_query(mut self, query: Map<String, Value>) -> Self {
        self.query = query;
        self
    }

    /// Sets the decoded request body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Sets the uploaded files.
    #[must_use]
    pub fn with_files(mut self, files: Vec<UploadedFile>) -> Self {
        self.files = files;
        self
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path (without query string).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the parsed request content type.
    #[must_use]
    pub fn content_type(&self) -> Option<mime::Mime> {
        self.headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
    }

    /// Returns `true` for `multipart/*` requests.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.content_type()
            .is_some_and(|content_type| content_type.type_() == mime::MULTIPART)
    }

    /// Path parameters.
    #[must_use]
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Mutable path parameters.
    pub fn params_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.params
    }

    /// Replaces the path parameters.
    pub fn set_params(&mut self, params: Map<String, Value>) {
        self.params = params;
    }

    /// Query string values.
    #[must_use]
    pub fn query(&self) -> &Map<String, Value> {
        &self.query
    }

    /// Mutable query string values.
    pub fn query_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.query
    }

    /// Replaces the query values.
    pub fn set_query(&mut self, query: Map<String, Value>) {
        self.query = query;
    }

    /// Request body. `Value::Null` when the request had none.
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Replaces the request body.
    pub fn set_body(&mut self, body: Value) {
        self.body = body;
    }

    /// Uploaded files, in the order they were received.
    #[must_use]
    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    /// First uploaded file sent under `field`.
    #[must_use]
    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|file| file.field() == field)
    }

    /// Response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the response status.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
        self.status_set = true;
    }

    /// Response body, if any was written.
    #[must_use]
    pub fn response_body(&self) -> Option<&Value> {
        self.response_body.as_ref()
    }

    /// Writes the response body.
    ///
    /// Answers `200 OK` unless a status was set explicitly.
    pub fn set_response_body(&mut self, body: Value) {
        if !self.status_set {
            self.status = StatusCode::OK;
        }
        self.response_body = Some(body);
    }

    /// Removes and returns the response body.
    pub fn take_response_body(&mut self) -> Option<Value> {
        self.response_body.take()
    }

    /// Sets status and body in one go.
    pub fn respond(&mut self, status: StatusCode, body: Value) {
        self.set_status(status);
        self.response_body = Some(body);
    }

    /// Serializes `body` into a plain JSON value and responds with it.
    pub fn respond_json<T: Serialize>(
        &mut self,
        status: StatusCode,
        body: &T,
    ) -> Result<(), TenetError> {
        let value = serde_json::to_value(body)
            .map_err(|e| TenetError::internal_with_source("response serialization failed", e))?;
        self.respond(status, value);
        Ok(())
    }

    /// Response headers.
    #[must_use]
    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    /// Mutable response headers.
    pub fn response_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.response_headers
    }

    /// Time since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Inserts a typed extension, replacing any previous value of that type.
    pub fn insert_extension<T: Any + Send + Sync>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Returns a typed extension.
    #[must_use]
    pub fn extension<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("request_id", &self.request_id)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("files", &self.files.len())
            .field("status", &self.status)
            .field("response_body", &self.response_body)
            .finish_non_exhaustive()
    }
}
