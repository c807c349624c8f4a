//! Dispatcher core module - hot path for request dispatch.

use crate::ids::{RequestId, X_REQUEST_ID};
use crate::router::{DispatchOutcome, RouteTable};
use crate::server::{parse_request, write_handler_response};
use http::{Method, StatusCode};
use may_minihttp::{HttpService, Request, Response};
use smallvec::SmallVec;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage (lower-cased names)
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request data handed to a [`Handler`](crate::handler::Handler).
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Raw request target as received, including any query string
    pub target: String,
    /// HTTP headers
    pub headers: HeaderVec,
    /// Raw request body
    pub body: Vec<u8>,
}

impl HandlerRequest {
    /// Build a request for `target` (path plus optional `?query`)
    #[must_use]
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        let target = target.into();
        let path = target
            .split_once('?')
            .map_or(target.as_str(), |(p, _)| p)
            .to_string();
        Self {
            request_id: RequestId::new(),
            method,
            path,
            target,
            headers: HeaderVec::new(),
            body: Vec::new(),
        }
    }

    /// Shorthand for a `GET` request
    #[must_use]
    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::GET, target)
    }

    /// Add a header; the name is stored lower-cased.
    /// An `X-Request-ID` header also sets [`request_id`](Self::request_id) when it parses.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        if name == X_REQUEST_ID {
            self.request_id = RequestId::from_header_or_new(Some(&value));
        }
        self.headers.push((Arc::from(name), value));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Raw query string, without the leading `?`
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.target.split_once('?').map(|(_, q)| q)
    }
}

/// Response written by a handler.
///
/// Starts out as `200 OK` with no content type and an empty body. Implements
/// [`io::Write`], so handlers can use `write!` to append to the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// Value for the `Content-Type` header, if any
    pub content_type: Option<&'static str>,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl Default for HandlerResponse {
    fn default() -> Self {
        Self::new(200)
    }
}

impl HandlerResponse {
    /// Empty response with the given status
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: Vec::new(),
        }
    }

    /// Plain-text response
    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Some("text/plain"),
            body: body.into().into_bytes(),
        }
    }

    /// The not-found outcome: 404 with an empty body
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(404)
    }

    /// Returned when a handler panics: 500 with an empty body
    #[must_use]
    pub fn internal_error() -> Self {
        Self::new(500)
    }

    pub fn set_status(&mut self, status: u16) -> &mut Self {
        self.status = status;
        self
    }

    pub fn set_content_type(&mut self, content_type: &'static str) -> &mut Self {
        self.content_type = Some(content_type);
        self
    }

    /// Canonical reason phrase for the status code
    #[must_use]
    pub fn reason(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
    }

    /// Body as UTF-8, if it is valid UTF-8
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

impl io::Write for HandlerResponse {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Dispatches requests through one [`RouteTable`].
///
/// Cheap to clone: the table is shared behind an `Arc` and never mutated
/// after the dispatcher is built, so clones can serve concurrently.
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
}

impl Dispatcher {
    /// Freeze `table` and build a dispatcher over it
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        Self::from_shared(Arc::new(table))
    }

    #[must_use]
    pub fn from_shared(table: Arc<RouteTable>) -> Self {
        info!(
            prefix = %table.prefix(),
            routes_count = table.len(),
            "Route table mounted"
        );
        Self { table }
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        self.table.prefix()
    }

    /// Select a handler for `req` and run it.
    ///
    /// No match yields [`HandlerResponse::not_found`]. A panicking handler
    /// yields [`HandlerResponse::internal_error`]; the panic does not escape.
    #[must_use]
    pub fn dispatch(&self, req: &HandlerRequest) -> HandlerResponse {
        debug!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            prefix = %self.table.prefix(),
            "Route match attempt"
        );

        let match_start = Instant::now();
        let (entry, params) = match self.table.dispatch(&req.path) {
            DispatchOutcome::Matched { entry, params } => (entry, params),
            DispatchOutcome::NoMatch => {
                warn!(
                    request_id = %req.request_id,
                    method = %req.method,
                    path = %req.path,
                    prefix = %self.table.prefix(),
                    duration_us = match_start.elapsed().as_micros(),
                    "No route matched"
                );
                return HandlerResponse::not_found();
            }
        };

        info!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            pattern = %entry.pattern(),
            path_params = %params,
            duration_us = match_start.elapsed().as_micros(),
            "Route matched"
        );

        let handler = entry.handler();
        let mut res = HandlerResponse::default();
        let execution_start = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| handler.serve(req, &mut res, &params)));

        if let Err(panic) = outcome {
            error!(
                request_id = %req.request_id,
                path = %req.path,
                pattern = %entry.pattern(),
                panic = %panic_message(&*panic),
                "Handler panicked"
            );
            return HandlerResponse::internal_error();
        }

        debug!(
            request_id = %req.request_id,
            status = res.status,
            body_len = res.body.len(),
            duration_us = execution_start.elapsed().as_micros(),
            "Handler execution complete"
        );
        res
    }

    /// Serve one transport request: parse, dispatch, write the response.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from reading the request body.
    pub fn handle(&self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req)?;
        let out = self.dispatch(&parsed);
        write_handler_response(res, out);
        Ok(())
    }
}

impl HttpService for Dispatcher {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        self.handle(req, res)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("table", &self.table)
            .finish()
    }
}

pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
