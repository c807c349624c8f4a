//! # Router Module
//!
//! Pattern matching and route resolution for rexroute. Every route is a
//! regular expression whose named capture groups become path parameters.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling route patterns at registration time
//! - Keeping sibling patterns of one prefix in precedence order
//! - Matching a request path against those patterns
//! - Extracting named groups as path parameters
//!
//! ## Architecture
//!
//! 1. **Registration**: `RouteTable::add_pattern` compiles the pattern and
//!    inserts it ahead of all existing entries. An invalid pattern is an
//!    error at this point, never at request time.
//!
//! 2. **Matching**: `RouteTable::dispatch` strips the table prefix from the
//!    path and tries each entry in order, newest first, returning the first
//!    handler whose pattern matches along with its parameters.
//!
//! ## Example
//!
//! ```rust
//! use rexroute::handler::handler_fn;
//! use rexroute::router::RouteTable;
//!
//! # fn main() -> Result<(), rexroute::RouteError> {
//! let noop = || handler_fn(|_, _, _| {});
//! let mut table = RouteTable::new("/");
//! table
//!     .add_pattern(r"users/(?P<userid>[^/]+)/?", noop())?
//!     .add_pattern(r"sites/(?P<sitename>[^/]+)/?", noop())?;
//!
//! let outcome = table.dispatch("/users/John");
//! assert_eq!(outcome.params().and_then(|p| p.get("userid")), Some("John"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Performance
//!
//! Matching is a linear scan over compiled regexes. Tables are expected to
//! hold a handful of sibling patterns, so an index would buy nothing and
//! would obscure the last-registered-wins precedence rule.

mod core;
mod params;
mod pattern;

pub use core::{DispatchOutcome, PatternEntry, RouteTable};
pub use params::{ParamVec, PathParams, MAX_INLINE_PARAMS};
pub use pattern::{PatternMatch, PatternMatcher};
