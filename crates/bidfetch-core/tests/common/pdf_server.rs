//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed route table; every response closes the connection.
//! Raw request heads are recorded so tests can inspect the sent headers.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// How long a stalled route holds its socket; longer than any test timeout.
const STALL_FOR: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct Route {
    pub status: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Close the socket without answering (simulates a network failure).
    pub drop_connection: bool,
    /// Keep the socket open without ever answering.
    pub stall: bool,
}

impl Route {
    pub fn pdf(body: Vec<u8>) -> Self {
        Self::with_type("200 OK", "application/pdf", body)
    }

    pub fn with_type(status: &'static str, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body,
            drop_connection: false,
            stall: false,
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            status: "302 Found",
            headers: vec![("Location".to_string(), location.to_string())],
            body: Vec::new(),
            drop_connection: false,
            stall: false,
        }
    }

    pub fn dropped() -> Self {
        Self {
            status: "200 OK",
            headers: Vec::new(),
            body: Vec::new(),
            drop_connection: true,
            stall: false,
        }
    }

    pub fn stall() -> Self {
        Self {
            stall: true,
            ..Self::dropped()
        }
    }
}

pub struct TestServer {
    base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, route)| (path.to_string(), route))
            .collect(),
    );
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let recorded = Arc::clone(&recorded);
            thread::spawn(move || handle(stream, &routes, &recorded));
        }
    });
    TestServer {
        base: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

/// A URL on a port nothing listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/gone.pdf", port)
}

fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8(buf).ok().filter(|s| !s.is_empty())
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, recorded: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(head) = read_head(&mut stream) else {
        return;
    };
    let path = head
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    recorded.lock().unwrap().push(head);

    let route = match routes.get(&path) {
        Some(r) => r.clone(),
        None => Route::with_type("404 Not Found", "text/plain", b"not found".to_vec()),
    };
    if route.stall {
        thread::sleep(STALL_FOR);
        return;
    }
    if route.drop_connection {
        return;
    }

    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        route.body.len()
    );
    for (name, value) in &route.headers {
        response.push_str(&format!("{}: {}\r\n", name, value));
    }
    response.push_str("\r\n");
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&route.body);
}
