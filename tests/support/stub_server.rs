//! Minimal scripted HTTP stub for exercising the archive client.
//!
//! Serves a fixed sequence of responses, one per connection, repeating the
//! final response once the script is exhausted. Request lines are recorded
//! so tests can assert which day the crawler asked for.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// One canned HTTP response.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    /// A 200 response with a JSON body.
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    /// An empty-bodied response with the given status.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

/// A scripted single-connection-at-a-time HTTP server.
pub struct StubServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Bind to an ephemeral local port and start serving the script.
    pub async fn start(script: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let task_hits = hits.clone();
        let task_requests = requests.clone();
        tokio::spawn(async move {
            let mut remaining = script;
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                task_hits.fetch_add(1, Ordering::SeqCst);

                let request = read_request(&mut socket).await;
                if let Some(line) = request.lines().next() {
                    task_requests.lock().unwrap().push(line.to_string());
                }

                let response = if remaining.len() > 1 {
                    remaining.remove(0)
                } else {
                    remaining
                        .first()
                        .cloned()
                        .unwrap_or_else(|| StubResponse::status(500))
                };

                let payload = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.status,
                    reason(response.status),
                    response.body.len(),
                    response.body
                );
                let _ = socket.write_all(payload.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            addr,
            hits,
            requests,
        }
    }

    /// Base URL of the stub, usable as the crawler's `base_url`.
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Number of connections served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Recorded request lines (`GET /?... HTTP/1.1`), in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            Err(_) => break,
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Status",
    }
}
