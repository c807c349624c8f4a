use crate::dispatcher::{HandlerRequest, HeaderVec};
use crate::ids::{RequestId, X_REQUEST_ID};
use http::Method;
use may_minihttp::Request;
use std::io::{self, Read};
use std::sync::Arc;
use tracing::debug;

/// Extract a [`HandlerRequest`] from a `may_minihttp::Request`.
///
/// Header names are lower-cased. The request id comes from a valid
/// `X-Request-ID` header, otherwise a new ULID is generated.
///
/// # Errors
///
/// Returns `InvalidData` for a method that is not a valid token, and any
/// I/O error raised while reading the body.
pub fn parse_request(req: Request) -> io::Result<HandlerRequest> {
    let method = Method::from_bytes(req.method().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let target = req.path().to_string();

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase()),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let request_id = RequestId::from_header_or_new(
        headers
            .iter()
            .find(|(k, _)| k.as_ref() == X_REQUEST_ID)
            .map(|(_, v)| v.as_str()),
    );

    let mut body = Vec::new();
    req.body().read_to_end(&mut body)?;

    debug!(
        request_id = %request_id,
        method = %method,
        target = %target,
        header_count = headers.len(),
        body_size_bytes = body.len(),
        "Request parsed"
    );

    let mut parsed = HandlerRequest::new(method, target);
    parsed.request_id = request_id;
    parsed.headers = headers;
    parsed.body = body;
    Ok(parsed)
}
