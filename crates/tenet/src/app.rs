//! Serving compiled routes.

use crate::sink::RouteTable;
use bytes::Bytes;
use http::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use serde_json::Value;
use std::sync::Arc;
use tenet_core::{Context, RequestId, TenetError};
use tenet_docs::ApiDocument;
use tenet_extract::{decode_request, ExtractConfig};
use tenet_router::Lookup;

/// A compiled API, ready to answer requests.
///
/// Everything an `App` holds is frozen, so clones can serve requests from
/// any number of tasks at once.
#[derive(Debug, Clone)]
pub struct App {
    routes: Arc<RouteTable>,
    document: Arc<ApiDocument>,
    extract: ExtractConfig,
}

impl App {
    /// Wraps a route table and the document compiled alongside it.
    #[must_use]
    pub fn new(routes: RouteTable, document: Arc<ApiDocument>) -> Self {
        Self {
            routes: Arc::new(routes),
            document,
            extract: ExtractConfig::default(),
        }
    }

    /// Body size limits for decoding requests.
    #[must_use]
    pub fn with_extract_config(mut self, extract: ExtractConfig) -> Self {
        self.extract = extract;
        self
    }

    /// The compiled document.
    #[must_use]
    pub fn document(&self) -> &ApiDocument {
        &self.document
    }

    /// The mounted routes.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Answers one request.
    ///
    /// Never fails: decoding, routing and handler errors all become error
    /// responses carrying an [`ErrorEnvelope`](tenet_core::ErrorEnvelope).
    pub async fn handle(&self, request: Request<Full<Bytes>>) -> Response<Full<Bytes>> {
        let mut ctx = match decode_request(request, &self.extract).await {
            Ok(ctx) => ctx,
            Err(e) => {
                let error = TenetError::from(e);
                tracing::debug!(error = %error, "request could not be decoded");
                return error_response(&error, RequestId::new());
            }
        };

        let result = self.dispatch(&mut ctx).await;
        let response = match result {
            Ok(()) => render(&mut ctx),
            Err(error) => {
                if error.status_code().is_server_error() {
                    tracing::error!(
                        request_id = %ctx.request_id(),
                        error = %error,
                        "request failed"
                    );
                }
                error_response(&error, ctx.request_id())
            }
        };

        tracing::debug!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            status = response.status().as_u16(),
            duration_ms = ctx.elapsed().as_secs_f64() * 1000.0,
            "request completed"
        );

        response
    }

    async fn dispatch(&self, ctx: &mut Context) -> Result<(), TenetError> {
        let method = ctx.method().clone();
        let path = ctx.path().to_string();

        match self.routes.lookup(&method, &path) {
            Lookup::Found(matched) => {
                for (name, value) in matched.params {
                    ctx.params_mut().insert(name, Value::String(value));
                }
                matched.value.run(ctx).await
            }
            Lookup::MethodNotAllowed { allowed } => Err(TenetError::method_not_allowed(
                format!("{method} is not allowed on {path}"),
                allowed.iter().map(ToString::to_string).collect(),
            )),
            Lookup::NotFound => Err(TenetError::not_found(format!("no route for {method} {path}"))),
        }
    }
}

fn render(ctx: &mut Context) -> Response<Full<Bytes>> {
    let status = ctx.status();
    let (content_type, body) = match ctx.take_response_body() {
        None => (None, Bytes::new()),
        Some(Value::String(text)) => (Some("text/plain; charset=utf-8"), Bytes::from(text)),
        Some(value) => (
            Some("application/json"),
            Bytes::from(serde_json::to_vec(&value).unwrap_or_default()),
        ),
    };

    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.extend(ctx.response_headers().clone());
    if let Some(content_type) = content_type {
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
    }
    response
}

fn error_response(error: &TenetError, request_id: RequestId) -> Response<Full<Bytes>> {
    let envelope = error.to_envelope(Some(&request_id.to_string()));
    let body = serde_json::to_vec(&envelope).unwrap_or_default();

    let mut builder = Response::builder()
        .status(error.status_code())
        .header(CONTENT_TYPE, "application/json");
    if let TenetError::MethodNotAllowed { allowed, .. } = error {
        builder = builder.header(ALLOW, allowed.join(", "));
    }

    builder
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}
