//! Common test utilities: a scripted transport and a counting credential provider.

#![allow(dead_code)]

use assistant_caller::{
    AssistantTransport, CallerConfig, CallerError, CredentialProvider, Credentials,
    InvocationAdapter, OutboundRequest, Result, StaticCredentials, TransportResponse,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the fake transport does when called.
pub enum Reply {
    /// Return this response.
    Respond(TransportResponse),
    /// Return a 200 response whose text field echoes the transmitted query.
    EchoQuery,
    /// Sleep, then return the response.
    Delay(Duration, TransportResponse),
    /// Fail without a response.
    Fail(fn() -> CallerError),
}

/// Transport that records every request it receives.
pub struct FakeTransport {
    reply: Reply,
    calls: AtomicUsize,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl FakeTransport {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Transport answering with `text` in a completed run.
    pub fn answering(text: &str) -> Arc<Self> {
        Self::new(Reply::Respond(TransportResponse::ok(answer_body(text))))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<OutboundRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl AssistantTransport for FakeTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let query = request.payload.query().unwrap_or_default().to_string();
        self.requests.lock().unwrap().push(request);

        match &self.reply {
            Reply::Respond(response) => Ok(response.clone()),
            Reply::EchoQuery => Ok(TransportResponse::ok(answer_body(&query))),
            Reply::Delay(delay, response) => {
                tokio::time::sleep(*delay).await;
                Ok(response.clone())
            }
            Reply::Fail(make_error) => Err(make_error()),
        }
    }
}

/// Provider that counts how often it is asked.
pub struct CountingProvider {
    inner: StaticCredentials,
    calls: AtomicUsize,
}

impl CountingProvider {
    pub fn new(inner: StaticCredentials) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for CountingProvider {
    async fn resolve(&self) -> Result<Credentials> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve().await
    }
}

/// JSON body of a completed run answering `text`.
pub fn answer_body(text: &str) -> String {
    serde_json::json!({"statusEnum": "COMPLETED", "text": text}).to_string()
}

pub fn test_credentials() -> StaticCredentials {
    StaticCredentials::new(Credentials::with_token("asst-test", "tok-test"))
}

/// Adapter wired to `transport` with valid credentials.
pub fn adapter_with(transport: Arc<FakeTransport>) -> InvocationAdapter {
    adapter_with_config(CallerConfig::default(), transport)
}

pub fn adapter_with_config(config: CallerConfig, transport: Arc<FakeTransport>) -> InvocationAdapter {
    InvocationAdapter::new(config, Arc::new(test_credentials()), transport)
}

/// A request as received by [`CannedServer`].
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    /// Request line, e.g. `POST /v1.0/oauth2/accessToken HTTP/1.1`.
    pub request_line: String,
    headers: Vec<(String, String)>,
    pub body: String,
}

impl ReceivedRequest {
    /// Header value, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Loopback HTTP server answering exactly one request with a fixed reply.
pub struct CannedServer {
    pub base_url: String,
    received: tokio::sync::oneshot::Receiver<ReceivedRequest>,
}

impl CannedServer {
    pub async fn start(status: u16, body: &str) -> Self {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, received) = tokio::sync::oneshot::channel();
        let reply = format!(
            "HTTP/1.1 {} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            let request = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if let Some(request) = parse_request(&buf) {
                    break request;
                }
                assert!(n > 0, "connection closed before the request was complete");
            };

            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            let _ = tx.send(request);
        });

        Self { base_url, received }
    }

    /// The request the server answered.
    pub async fn received(self) -> ReceivedRequest {
        self.received.await.unwrap()
    }
}

/// Parse a complete request out of `buf`, or `None` if more bytes are needed.
fn parse_request(buf: &[u8]) -> Option<ReceivedRequest> {
    let head_end = buf.windows(4).position(|w| w == b"\r\n\r\n")?;
    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();

    let length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let body_start = head_end + 4;
    if buf.len() < body_start + length {
        return None;
    }

    Some(ReceivedRequest {
        request_line,
        headers,
        body: String::from_utf8_lossy(&buf[body_start..body_start + length]).to_string(),
    })
}
