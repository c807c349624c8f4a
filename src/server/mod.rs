//! # Server Module
//!
//! Glue between `may_minihttp` and the dispatcher: request parsing, response
//! writing, the prefix-mounting [`AppService`], and a small [`HttpServer`]
//! wrapper with a handle for readiness checks and shutdown.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::parse_request;
pub use response::{intern_content_type, write_handler_response};
pub use service::AppService;
