//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// What the mock backend does with a request.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Status(u16),
    /// Close the connection without answering.
    Drop,
}

/// Requests seen by a mock backend, per path.
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl CallLog {
    pub fn count(&self, path: &str) -> usize {
        self.calls.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn record(&self, path: &str) {
        *self.calls.lock().unwrap().entry(path.to_string()).or_default() += 1;
    }
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "418 I'm a teapot",
    }
}

/// Start a programmable mock Patroni API on an ephemeral port.
///
/// `f` receives the request path and decides the reply.
pub async fn start_programmable_backend<F>(f: F) -> (SocketAddr, CallLog)
where
    F: Fn(&str) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log = CallLog::default();
    let f = Arc::new(f);

    let calls = log.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let calls = calls.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]);
                        let path = request
                            .lines()
                            .next()
                            .and_then(|line| line.split_whitespace().nth(1))
                            .unwrap_or("/")
                            .to_string();
                        calls.record(&path);

                        match f(&path) {
                            Reply::Status(status) => {
                                let body = "{}";
                                let response = format!(
                                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                                    status_line(status),
                                    body.len(),
                                    body
                                );
                                let _ = socket.write_all(response.as_bytes()).await;
                                let _ = socket.shutdown().await;
                            }
                            Reply::Drop => drop(socket),
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

/// Start a mock backend answering each path with a fixed status, 404 otherwise.
#[allow(dead_code)]
pub async fn start_mock_backend(routes: &[(&str, u16)]) -> (SocketAddr, CallLog) {
    let routes: HashMap<String, u16> = routes
        .iter()
        .map(|(path, status)| (path.to_string(), *status))
        .collect();
    start_programmable_backend(move |path| Reply::Status(routes.get(path).copied().unwrap_or(404))).await
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
