//! Minimal HTTP/1.1 stub standing in for the enrichment API.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the stub sends back for a request whose query contains `needle`
#[derive(Clone)]
pub struct Route {
    pub needle: &'static str,
    pub status: u16,
    pub body: &'static str,
    pub delay: Duration,
}

impl Route {
    pub fn json(needle: &'static str, body: &'static str) -> Self {
        Self { needle, status: 200, body, delay: Duration::ZERO }
    }

    pub fn status(needle: &'static str, status: u16) -> Self {
        Self { needle, status, body: "{\"error\":\"nope\"}", delay: Duration::ZERO }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub struct StubServer {
    pub addr: SocketAddr,
    /// Request lines seen so far, e.g. `GET /enrichment?email=...&apikey=... HTTP/1.1`
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let seen = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else { break };
                let routes = routes.clone();
                let seen = seen.clone();
                tokio::spawn(async move {
                    handle(stream, &routes, &seen).await;
                });
            }
        });

        Self { addr, requests }
    }

    pub fn url(&self) -> String {
        format!("http://{}/enrichment", self.addr)
    }

    pub fn request_lines(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(mut stream: TcpStream, routes: &[Route], seen: &Mutex<Vec<String>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let head = String::from_utf8_lossy(&buf).to_string();
    let request_line = head.lines().next().unwrap_or_default().to_string();
    seen.lock().unwrap().push(request_line.clone());

    let route = routes
        .iter()
        .find(|r| request_line.contains(r.needle))
        .cloned()
        .unwrap_or_else(|| Route::status("", 404));
    if !route.delay.is_zero() {
        tokio::time::sleep(route.delay).await;
    }

    let response = format!(
        "HTTP/1.1 {} STUB\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        route.status,
        route.body.len(),
        route.body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// An address nothing is listening on
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
