#![allow(dead_code)]

pub mod test_server {
    use rexroute::server::{AppService, HttpServer, ServerHandle};
    use std::net::{SocketAddr, TcpListener};
    use std::sync::Once;

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }

    /// Start `service` on an ephemeral local port and wait until it accepts connections
    pub fn start_service(service: AppService) -> (ServerHandle, SocketAddr) {
        setup_may_runtime();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let handle = HttpServer(service).start(addr).unwrap();
        handle.wait_ready().unwrap();
        (handle, addr)
    }
}

pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    /// Parsed HTTP/1.1 response
    #[derive(Debug)]
    pub struct RawResponse {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        pub body: String,
    }

    impl RawResponse {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    /// Write a raw request and read until the body announced by
    /// `Content-Length` has arrived or the read times out
    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(500)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 1024];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => {
                    buf.extend_from_slice(&tmp[..n]);
                    if is_complete(&buf) {
                        break;
                    }
                }
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {:?}", e),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// `GET path` with no extra headers
    pub fn get(addr: &SocketAddr, path: &str) -> RawResponse {
        parse_response(&send_request(
            addr,
            &format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n"),
        ))
    }

    fn is_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let len = head
            .lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= len
    }

    pub fn parse_response(resp: &str) -> RawResponse {
        let (head, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
        let mut lines = head.lines();
        let status = lines
            .next()
            .and_then(|l| l.split_whitespace().nth(1))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let headers = lines
            .filter_map(|l| l.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();
        RawResponse {
            status,
            headers,
            body: body.to_string(),
        }
    }
}

pub mod handlers {
    use rexroute::dispatcher::{HandlerRequest, HandlerResponse};
    use rexroute::handler::{handler_fn, Handler};
    use rexroute::router::{PathParams, RouteTable};
    use std::io::Write;

    pub fn greet_user() -> impl Handler {
        handler_fn(|_req: &HandlerRequest, res: &mut HandlerResponse, p: &PathParams| {
            let _ = write!(res, "Hello, {}!", p.get("userid").unwrap_or_default());
        })
    }

    pub fn greet_site() -> impl Handler {
        handler_fn(|_req: &HandlerRequest, res: &mut HandlerResponse, p: &PathParams| {
            let _ = write!(res, "Welcome to {}!", p.get("sitename").unwrap_or_default());
        })
    }

    /// Writes `name=value` pairs sorted by name, joined with `&`
    pub fn echo_params() -> impl Handler {
        handler_fn(|_req: &HandlerRequest, res: &mut HandlerResponse, p: &PathParams| {
            let mut pairs: Vec<String> = p.iter().map(|(k, v)| format!("{k}={v}")).collect();
            pairs.sort();
            let _ = write!(res, "{}", pairs.join("&"));
        })
    }

    /// Writes its own label, for precedence checks
    pub fn label(name: &'static str) -> impl Handler {
        handler_fn(move |_req: &HandlerRequest, res: &mut HandlerResponse, _p: &PathParams| {
            let _ = write!(res, "{name}");
        })
    }

    /// The users/sites greeting table under `/`
    pub fn greeting_table() -> RouteTable {
        let mut table = RouteTable::new("/");
        table
            .add_pattern(r"users/(?P<userid>[^/]+)/?", greet_user())
            .unwrap()
            .add_pattern(r"sites/(?P<sitename>[^/]+)/?", greet_site())
            .unwrap();
        table
    }
}

pub mod log_capture {
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// In-memory sink for the JSON formatter
    #[derive(Clone, Default)]
    pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        /// One JSON record per line
        pub fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .map(str::to_string)
                .collect()
        }

        /// Records whose message equals `message`
        pub fn records(&self, message: &str) -> Vec<String> {
            let needle = format!("\"message\":\"{message}\"");
            self.lines()
                .into_iter()
                .filter(|l| l.contains(&needle))
                .collect()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// JSON subscriber installed for the current thread until dropped
    pub struct TestLogs {
        pub buffer: LogBuffer,
        _guard: tracing::subscriber::DefaultGuard,
    }

    impl TestLogs {
        pub fn init() -> Self {
            let buffer = LogBuffer::default();
            let subscriber = tracing_subscriber::fmt()
                .json()
                .with_max_level(tracing::Level::DEBUG)
                .with_writer(buffer.clone())
                .finish();
            let guard = tracing::subscriber::set_default(subscriber);
            Self {
                buffer,
                _guard: guard,
            }
        }
    }
}
