//! # rexroute
//!
//! **rexroute** dispatches HTTP requests to handlers by matching the request
//! path against regular expressions and handing the handler the values of
//! the pattern's named capture groups.
//!
//! ## Overview
//!
//! A [`RouteTable`] is scoped to one path prefix and holds an ordered list of
//! `(pattern, handler)` pairs. For each request the prefix is stripped and
//! the patterns are tried newest first; the first match wins and its named
//! groups become the handler's [`PathParams`]. When nothing matches the
//! request is answered with an empty `404 Not Found`.
//!
//! ## Architecture
//!
//! - **[`router`]** - Pattern compilation, route tables and parameter extraction
//! - **[`handler`]** - The handler capability and its function/per-request adapters
//! - **[`dispatcher`]** - Turns a request into a response through one route table
//! - **[`server`]** - Prefix mounts and the `may_minihttp` HTTP server
//! - **[`config`]** - TOML route configuration for the `rexroute` binary
//! - **[`logging`]** / **[`runtime_config`]** - Environment-driven setup
//!
//! ### Request Flow
//!
//! ```text
//! TCP -> may_minihttp -> AppService (longest mounted prefix)
//!     -> Dispatcher -> RouteTable::dispatch (strip prefix, newest pattern first)
//!     -> Handler::serve(request, response, params) | 404
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rexroute::dispatcher::{HandlerRequest, HandlerResponse};
//! use rexroute::router::PathParams;
//! use rexroute::server::{AppService, HttpServer};
//! use rexroute::register_route_fn;
//! use std::io::Write;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut table = register_route_fn(
//!         "/",
//!         r"users/(?P<userid>[^/]+)/?",
//!         |_req: &HandlerRequest, res: &mut HandlerResponse, p: &PathParams| {
//!             let _ = write!(res, "Hello, {}!", p.get("userid").unwrap_or_default());
//!         },
//!     )?;
//!     table.add_pattern(
//!         r"sites/(?P<sitename>[^/]+)/?",
//!         rexroute::handler::handler_fn(|_req: &HandlerRequest, res: &mut HandlerResponse, p: &PathParams| {
//!             let _ = write!(res, "Welcome to {}!", p.get("sitename").unwrap_or_default());
//!         }),
//!     )?;
//!
//!     let mut service = AppService::new();
//!     service.mount_table(table);
//!     HttpServer(service).start("127.0.0.1:8080")?.join().ok();
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! Registration happens before serving. Once a table is mounted it is frozen
//! behind an `Arc` and shared read-only by every connection coroutine;
//! registering routes on a live server is not supported.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod ids;
pub mod logging;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod template;

pub use dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
pub use error::RouteError;
pub use handler::{handler_fn, per_request, Handler, HandlerFn, PerRequest, StatefulHandler};
pub use router::{DispatchOutcome, PathParams, RouteTable};

/// Create a route table under `prefix` holding a single pattern
///
/// Further sibling patterns are added with [`RouteTable::add_pattern`].
///
/// # Errors
///
/// Returns [`RouteError::InvalidPattern`] if `pattern` is not a valid regex.
pub fn register_route<H>(prefix: &str, pattern: &str, handler: H) -> Result<RouteTable, RouteError>
where
    H: Handler + 'static,
{
    let mut table = RouteTable::new(prefix);
    table.add_pattern(pattern, handler)?;
    Ok(table)
}

/// Like [`register_route`], wrapping a plain function as the handler
///
/// # Errors
///
/// Returns [`RouteError::InvalidPattern`] if `pattern` is not a valid regex.
pub fn register_route_fn<F>(prefix: &str, pattern: &str, func: F) -> Result<RouteTable, RouteError>
where
    F: Fn(&HandlerRequest, &mut HandlerResponse, &PathParams) + Send + Sync + 'static,
{
    register_route(prefix, pattern, handler_fn(func))
}
