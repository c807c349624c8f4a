//! # Handler Module
//!
//! Handlers receive a request together with the path parameters extracted by
//! the route table and write a response.
//!
//! ## Handler shapes
//!
//! - [`Handler`]: parameters are passed as an explicit argument on every
//!   call. Safe to share one instance across concurrently dispatched requests.
//! - [`HandlerFn`]: adapts a plain function or closure into a [`Handler`]
//!   so simple routes need no named type.
//! - [`StatefulHandler`] + [`PerRequest`]: for handlers that want the
//!   parameters stored on `self` before serving. A factory builds a fresh
//!   instance for every dispatch; an instance is never shared between two
//!   in-flight requests, so one request can never observe another's
//!   parameters.
//!
//! ## Example
//!
//! ```rust
//! use rexroute::handler::{handler_fn, Handler};
//! use rexroute::dispatcher::{HandlerRequest, HandlerResponse};
//! use rexroute::router::PathParams;
//! use std::io::Write;
//!
//! let greet = handler_fn(|_req: &HandlerRequest, res: &mut HandlerResponse, params: &PathParams| {
//!     let _ = write!(res, "Hello, {}!", params.get("userid").unwrap_or("stranger"));
//! });
//! # let _ = greet;
//! ```

use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::router::PathParams;
use std::sync::Arc;

/// Capability implemented by route targets.
///
/// `serve` is called once per matched request with the parameters of the
/// pattern that matched. The response starts out as `200 OK` with an empty
/// body; handlers set the status and write the body.
pub trait Handler: Send + Sync {
    fn serve(&self, req: &HandlerRequest, res: &mut HandlerResponse, params: &PathParams);
}

/// Shared handler reference stored in route tables
pub type SharedHandler = Arc<dyn Handler>;

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn serve(&self, req: &HandlerRequest, res: &mut HandlerResponse, params: &PathParams) {
        (**self).serve(req, res, params)
    }
}

/// Adapter turning a function of `(request, response, params)` into a [`Handler`].
///
/// Holds nothing but the wrapped function.
#[derive(Clone)]
pub struct HandlerFn<F> {
    func: F,
}

impl<F> HandlerFn<F>
where
    F: Fn(&HandlerRequest, &mut HandlerResponse, &PathParams) + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&HandlerRequest, &mut HandlerResponse, &PathParams) + Send + Sync,
{
    fn serve(&self, req: &HandlerRequest, res: &mut HandlerResponse, params: &PathParams) {
        (self.func)(req, res, params)
    }
}

/// Wrap a function or closure as a [`Handler`]
pub fn handler_fn<F>(func: F) -> HandlerFn<F>
where
    F: Fn(&HandlerRequest, &mut HandlerResponse, &PathParams) + Send + Sync,
{
    HandlerFn::new(func)
}

/// Handler that takes its path parameters through a setter before serving.
///
/// Only usable through [`PerRequest`], which guarantees each instance sees
/// exactly one request.
pub trait StatefulHandler {
    fn set_path_params(&mut self, params: PathParams);
    fn serve(&mut self, req: &HandlerRequest, res: &mut HandlerResponse);
}

/// Builds a fresh [`StatefulHandler`] for every dispatch.
#[derive(Clone)]
pub struct PerRequest<F> {
    factory: F,
}

impl<F, H> Handler for PerRequest<F>
where
    F: Fn() -> H + Send + Sync,
    H: StatefulHandler,
{
    fn serve(&self, req: &HandlerRequest, res: &mut HandlerResponse, params: &PathParams) {
        let mut handler = (self.factory)();
        handler.set_path_params(params.clone());
        handler.serve(req, res);
    }
}

/// Wrap a factory of [`StatefulHandler`] instances as a [`Handler`]
pub fn per_request<F, H>(factory: F) -> PerRequest<F>
where
    F: Fn() -> H + Send + Sync,
    H: StatefulHandler,
{
    PerRequest { factory }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::HandlerRequest;
    use std::io::Write;

    #[test]
    fn test_handler_fn_receives_params() {
        let h = handler_fn(|_req: &HandlerRequest, res: &mut HandlerResponse, p: &PathParams| {
            let _ = write!(res, "{}", p.len());
        });
        let req = HandlerRequest::get("/x");
        let mut res = HandlerResponse::default();
        h.serve(&req, &mut res, &PathParams::new());
        assert_eq!(res.body_str(), Some("0"));
    }

    struct Counter {
        params: Option<PathParams>,
        serves: usize,
    }

    impl StatefulHandler for Counter {
        fn set_path_params(&mut self, params: PathParams) {
            self.params = Some(params);
        }

        fn serve(&mut self, _req: &HandlerRequest, res: &mut HandlerResponse) {
            self.serves += 1;
            let _ = write!(
                res,
                "{}:{}",
                self.serves,
                self.params.as_ref().map(PathParams::len).unwrap_or(99)
            );
        }
    }

    #[test]
    fn test_per_request_builds_fresh_instance() {
        let h = per_request(|| Counter {
            params: None,
            serves: 0,
        });
        let req = HandlerRequest::get("/x");
        for _ in 0..3 {
            let mut res = HandlerResponse::default();
            h.serve(&req, &mut res, &PathParams::new());
            assert_eq!(res.body_str(), Some("1:0"));
        }
    }
}
