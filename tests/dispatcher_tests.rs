use rexroute::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
use rexroute::handler::{handler_fn, per_request, StatefulHandler};
use rexroute::router::{PathParams, RouteTable};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

mod common;
use common::handlers::greeting_table;
use common::log_capture::TestLogs;

#[test]
fn test_greeting_scenario() {
    let dispatcher = Dispatcher::new(greeting_table());

    let res = dispatcher.dispatch(&HandlerRequest::get("/users/John"));
    assert_eq!(res.status, 200);
    assert_eq!(res.body_str(), Some("Hello, John!"));

    let res = dispatcher.dispatch(&HandlerRequest::get("/sites/Taipei"));
    assert_eq!(res.status, 200);
    assert_eq!(res.body_str(), Some("Welcome to Taipei!"));

    let res = dispatcher.dispatch(&HandlerRequest::get("/unknown/x"));
    assert_eq!(res, HandlerResponse::not_found());
}

#[test]
fn test_not_found_has_empty_body() {
    let dispatcher = Dispatcher::new(RouteTable::new("/"));
    let res = dispatcher.dispatch(&HandlerRequest::get("/nothing"));
    assert_eq!(res.status, 404);
    assert!(res.body.is_empty());
    assert_eq!(res.content_type, None);
    assert_eq!(res.reason(), "Not Found");
}

#[test]
fn test_query_string_not_matched() {
    let dispatcher = Dispatcher::new(greeting_table());
    let req = HandlerRequest::get("/users/John?lang=en");
    assert_eq!(req.query(), Some("lang=en"));
    let res = dispatcher.dispatch(&req);
    assert_eq!(res.body_str(), Some("Hello, John!"));
}

#[test]
fn test_handler_sees_request() {
    let mut table = RouteTable::new("/");
    table
        .add_pattern(
            r"echo/(?P<id>\d+)",
            handler_fn(|req: &HandlerRequest, res: &mut HandlerResponse, p: &PathParams| {
                res.set_status(201).set_content_type("text/plain");
                let _ = write!(
                    res,
                    "{} {} {} {}",
                    req.method,
                    p.get("id").unwrap_or_default(),
                    req.get_header("X-Custom").unwrap_or("-"),
                    String::from_utf8_lossy(&req.body)
                );
            }),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(table);

    let req = HandlerRequest::new(http::Method::POST, "/echo/9")
        .with_header("X-Custom", "yes")
        .with_body("payload");
    let res = dispatcher.dispatch(&req);
    assert_eq!(res.status, 201);
    assert_eq!(res.content_type, Some("text/plain"));
    assert_eq!(res.body_str(), Some("POST 9 yes payload"));
}

#[test]
fn test_handler_panic_becomes_500() {
    let mut table = RouteTable::new("/");
    table
        .add_pattern(
            r"boom/?",
            handler_fn(|_req: &HandlerRequest, res: &mut HandlerResponse, _p: &PathParams| {
                let _ = write!(res, "partial");
                panic!("handler failed");
            }),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(table);

    let res = dispatcher.dispatch(&HandlerRequest::get("/boom"));
    assert_eq!(res.status, 500);
    assert!(res.body.is_empty());

    // The dispatcher keeps serving after a panic.
    let res = dispatcher.dispatch(&HandlerRequest::get("/boom/"));
    assert_eq!(res.status, 500);
}

struct SlowEcho {
    userid: Option<String>,
}

impl StatefulHandler for SlowEcho {
    fn set_path_params(&mut self, params: PathParams) {
        self.userid = params.get("userid").map(str::to_string);
    }

    fn serve(&mut self, _req: &HandlerRequest, res: &mut HandlerResponse) {
        // Give other requests a chance to interleave.
        thread::yield_now();
        let _ = write!(res, "{}", self.userid.as_deref().unwrap_or("none"));
    }
}

#[test]
fn test_per_request_handlers_never_share_params() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    let mut table = RouteTable::new("/");
    table
        .add_pattern(
            r"users/(?P<userid>[^/]+)/?",
            per_request(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                SlowEcho { userid: None }
            }),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(table);

    let workers: Vec<_> = (0..8)
        .map(|t| {
            let dispatcher = dispatcher.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    let user = format!("u{t}-{i}");
                    let res = dispatcher.dispatch(&HandlerRequest::get(format!("/users/{user}")));
                    assert_eq!(res.body_str(), Some(user.as_str()));
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }
    assert_eq!(built.load(Ordering::SeqCst), 8 * 50);
}

#[test]
fn test_request_id_from_header() {
    let mut table = RouteTable::new("/");
    table
        .add_pattern(
            "id",
            handler_fn(|req: &HandlerRequest, res: &mut HandlerResponse, _p: &PathParams| {
                let _ = write!(res, "{}", req.request_id);
            }),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(table);
    let id = "01ARZ3NDEKTSV4RRFFQ69G5FAV";
    let res = dispatcher.dispatch(&HandlerRequest::get("/id").with_header("X-Request-ID", id));
    assert_eq!(res.body_str(), Some(id));
}

#[test]
fn test_dispatch_attempts_are_logged() {
    let logs = TestLogs::init();
    let dispatcher = Dispatcher::new(greeting_table());

    let hit = dispatcher.dispatch(&HandlerRequest::get("/users/John"));
    let miss = dispatcher.dispatch(&HandlerRequest::get("/unknown/x"));
    assert_eq!(hit.status, 200);
    assert_eq!(miss.status, 404);

    let matched = logs.buffer.records("Route matched");
    assert_eq!(matched.len(), 1, "{matched:?}");
    assert!(matched[0].contains(r#""level":"INFO""#), "{}", matched[0]);
    assert!(matched[0].contains(r#""path":"/users/John""#), "{}", matched[0]);
    assert!(matched[0].contains(r#""path_params":"userid=John""#), "{}", matched[0]);

    let missed = logs.buffer.records("No route matched");
    assert_eq!(missed.len(), 1, "{missed:?}");
    assert!(missed[0].contains(r#""level":"WARN""#), "{}", missed[0]);
    assert!(missed[0].contains(r#""path":"/unknown/x""#), "{}", missed[0]);

    let attempts = logs.buffer.records("Route match attempt");
    assert_eq!(attempts.len(), 2, "{attempts:?}");
}
