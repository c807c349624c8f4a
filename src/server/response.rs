use crate::dispatcher::HandlerResponse;
use may_minihttp::Response;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Write a [`HandlerResponse`] onto the transport response.
///
/// The reason phrase is the canonical one for the status code. No
/// `Content-Type` header is sent for responses without one, e.g. the
/// empty-bodied not-found outcome.
pub fn write_handler_response(res: &mut Response, out: HandlerResponse) {
    res.status_code(usize::from(out.status), out.reason());
    if let Some(content_type) = out.content_type {
        res.header(content_type_header(content_type));
    }
    res.body_vec(out.body);
}

fn content_type_header(content_type: &'static str) -> &'static str {
    match content_type {
        "text/plain" => "Content-Type: text/plain",
        "text/html" => "Content-Type: text/html",
        "application/json" => "Content-Type: application/json",
        "text/plain; charset=utf-8" => "Content-Type: text/plain; charset=utf-8",
        "text/html; charset=utf-8" => "Content-Type: text/html; charset=utf-8",
        other => interned(other).header,
    }
}

/// A content type and its header line, both leaked once per distinct value
#[derive(Clone, Copy)]
struct InternedContentType {
    value: &'static str,
    header: &'static str,
}

/// `may_minihttp` only accepts `&'static str` headers, so every content
/// type outside the common set goes through this cache.
fn interned(content_type: &str) -> InternedContentType {
    static CONTENT_TYPES: OnceLock<Mutex<HashMap<&'static str, InternedContentType>>> =
        OnceLock::new();
    let mut types = match CONTENT_TYPES.get_or_init(Default::default).lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(existing) = types.get(content_type) {
        return *existing;
    }
    let value: &'static str = Box::leak(content_type.to_string().into_boxed_str());
    let header: &'static str = Box::leak(format!("Content-Type: {value}").into_boxed_str());
    let entry = InternedContentType { value, header };
    types.insert(value, entry);
    entry
}

/// Static copy of `content_type` for [`HandlerResponse::set_content_type`].
///
/// Meant for values known at startup, such as configured routes; each
/// distinct value is leaked once.
#[must_use]
pub fn intern_content_type(content_type: &str) -> &'static str {
    interned(content_type).value
}
