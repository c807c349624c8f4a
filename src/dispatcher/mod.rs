//! # Dispatcher Module
//!
//! The dispatcher turns an inbound request into a handler call. It owns a
//! frozen [`RouteTable`](crate::router::RouteTable) and, for each request:
//!
//! 1. Takes the request path (query string removed)
//! 2. Asks the route table for the first matching pattern, newest first
//! 3. On a match, calls the handler with the request, a fresh response and
//!    the extracted path parameters
//! 4. On no match, produces `404 Not Found` with an empty body
//!
//! ## Logging
//!
//! Every attempt is logged with its path and request id. A match logs the
//! pattern and extracted parameters at `info`; a miss logs the path at
//! `warn`; a handler panic logs at `error` and becomes a `500` response.
//!
//! ## Concurrency
//!
//! `Dispatcher` is `Clone` and shares its table through an `Arc`. The
//! transport clones it per connection; handlers receive parameters as an
//! explicit argument, so nothing per-request is stored in shared state.

mod core;

pub use core::{Dispatcher, HandlerRequest, HandlerResponse, HeaderVec, MAX_INLINE_HEADERS};
