//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use url_sentry::alert::{AlertDispatcher, DispatchError, Message, SmtpConfig};
use url_sentry::checker::{CheckError, StatusChecker};

/// What a mock backend answers with.
#[derive(Debug, Clone, Default)]
pub struct MockResponse {
    pub status: u16,
    pub location: Option<String>,
    pub delay: Option<Duration>,
}

impl MockResponse {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            status: 301,
            location: Some(location.to_string()),
            delay: None,
        }
    }
}

/// Parsed request line and headers of an incoming request.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub path: String,
    pub head: String,
}

/// Start a programmable mock backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MockResponse> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = Vec::new();
                        let mut chunk = [0u8; 1024];
                        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut chunk).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => buf.extend_from_slice(&chunk[..n]),
                            }
                        }
                        let head = String::from_utf8_lossy(&buf).to_string();
                        let path = head
                            .split_whitespace()
                            .nth(1)
                            .unwrap_or("/")
                            .to_string();

                        let response = f(MockRequest { path, head }).await;
                        if let Some(delay) = response.delay {
                            tokio::time::sleep(delay).await;
                        }

                        let mut response_str = format!(
                            "HTTP/1.1 {} Mock\r\nContent-Length: 0\r\nConnection: close\r\n",
                            response.status
                        );
                        if let Some(location) = &response.location {
                            response_str.push_str(&format!("Location: {}\r\n", location));
                        }
                        response_str.push_str("\r\n");

                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock backend that always answers with `status`.
pub async fn start_mock_backend(status: u16) -> SocketAddr {
    start_programmable_backend(move |_| async move { MockResponse::status(status) }).await
}

/// An address nothing is listening on.
pub fn closed_port() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Checker that replays scripted results, then repeats the last one.
pub struct ScriptedChecker {
    results: Mutex<VecDeque<u16>>,
    last: Mutex<u16>,
    pub calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedChecker {
    pub fn new(results: &[u16]) -> Self {
        Self {
            results: Mutex::new(results.iter().copied().collect()),
            last: Mutex::new(0),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusChecker for ScriptedChecker {
    async fn check(&self, _method: Method, _url: &str, _follow: bool) -> Result<u16, CheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.results.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(status) = next {
            *last = status;
        }
        Ok(*last)
    }
}

/// Checker that answers 200 for every URL but stalls on one of them.
pub struct StallingChecker {
    stalled_url: String,
    stall: Duration,
    calls: Mutex<HashMap<String, usize>>,
}

impl StallingChecker {
    pub fn new(stalled_url: &str, stall: Duration) -> Self {
        Self {
            stalled_url: stalled_url.to_string(),
            stall,
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl StatusChecker for StallingChecker {
    async fn check(&self, _method: Method, url: &str, _follow: bool) -> Result<u16, CheckError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
        if url == self.stalled_url {
            tokio::time::sleep(self.stall).await;
        }
        Ok(200)
    }
}

/// Dispatcher that records every message it is asked to send.
#[derive(Default)]
pub struct RecordingDispatcher {
    pub sent: Mutex<Vec<Message>>,
}

impl RecordingDispatcher {
    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertDispatcher for RecordingDispatcher {
    async fn send(&self, message: &Message, _server: &SmtpConfig) -> Result<(), DispatchError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
