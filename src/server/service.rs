use super::request::parse_request;
use super::response::write_handler_response;
use crate::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
use crate::router::RouteTable;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use tracing::{info, warn};

/// Serving surface that associates path prefixes with dispatchers.
///
/// For each request the mount with the longest prefix that is a true prefix
/// of the path handles it. Requests outside every mount get `404 Not Found`
/// with an empty body.
///
/// Mounts are fixed once the service is handed to [`HttpServer`](super::HttpServer);
/// each connection works on its own clone.
#[derive(Clone, Debug, Default)]
pub struct AppService {
    /// Kept sorted by prefix length, longest first
    mounts: Vec<Dispatcher>,
}

impl AppService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a dispatcher under its table's prefix.
    ///
    /// A dispatcher mounted under a prefix that is already taken replaces
    /// the earlier one.
    pub fn mount(&mut self, dispatcher: Dispatcher) -> &mut Self {
        if let Some(pos) = self
            .mounts
            .iter()
            .position(|d| d.prefix() == dispatcher.prefix())
        {
            warn!(
                prefix = %dispatcher.prefix(),
                "Replacing route table already mounted under this prefix"
            );
            self.mounts.remove(pos);
        }
        let pos = self
            .mounts
            .iter()
            .position(|d| d.prefix().len() < dispatcher.prefix().len())
            .unwrap_or(self.mounts.len());
        info!(
            prefix = %dispatcher.prefix(),
            routes_count = dispatcher.table().len(),
            mounts_count = self.mounts.len() + 1,
            "Prefix mounted"
        );
        self.mounts.insert(pos, dispatcher);
        self
    }

    /// Freeze `table` and mount it
    pub fn mount_table(&mut self, table: RouteTable) -> &mut Self {
        self.mount(Dispatcher::new(table))
    }

    /// Mounted dispatchers, longest prefix first
    #[must_use]
    pub fn mounts(&self) -> &[Dispatcher] {
        &self.mounts
    }

    /// The dispatcher responsible for `path`, if any
    #[must_use]
    pub fn select(&self, path: &str) -> Option<&Dispatcher> {
        self.mounts.iter().find(|d| path.starts_with(d.prefix()))
    }

    /// Route `req` to the responsible dispatcher
    #[must_use]
    pub fn dispatch(&self, req: &HandlerRequest) -> HandlerResponse {
        match self.select(&req.path) {
            Some(dispatcher) => dispatcher.dispatch(req),
            None => {
                warn!(
                    request_id = %req.request_id,
                    method = %req.method,
                    path = %req.path,
                    "No mounted prefix for path"
                );
                HandlerResponse::not_found()
            }
        }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req)?;
        let out = self.dispatch(&parsed);
        write_handler_response(res, out);
        Ok(())
    }
}
