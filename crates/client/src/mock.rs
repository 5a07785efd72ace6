//! A minimal mock HTTP server built on tokio that returns canned responses
//! and hands the captured request back to the test.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::{SdkwaClient, SdkwaConfig};

pub(crate) struct MockServer {
    listener: TcpListener,
    pub base_url: String,
}

/// The request the mock server received.
#[derive(Debug)]
pub(crate) struct CapturedRequest {
    pub method: String,
    /// Path including the query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl MockServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{port}");
        Self { listener, base_url }
    }

    pub async fn respond_once(self, status_code: u16, body: impl Into<String>) -> CapturedRequest {
        self.respond_with(status_code, "application/json", body.into().into_bytes())
            .await
    }

    pub async fn respond_with(
        self,
        status_code: u16,
        content_type: &'static str,
        body: Vec<u8>,
    ) -> CapturedRequest {
        serve_one(&self.listener, status_code, content_type, &body).await
    }

    /// Answer consecutive requests with the given JSON responses, in order.
    pub async fn respond_sequence(self, responses: Vec<(u16, &'static str)>) -> Vec<CapturedRequest> {
        let mut captured = Vec::with_capacity(responses.len());
        for (status_code, body) in responses {
            captured.push(
                serve_one(&self.listener, status_code, "application/json", body.as_bytes()).await,
            );
        }
        captured
    }
}

async fn serve_one(
    listener: &TcpListener,
    status_code: u16,
    content_type: &str,
    body: &[u8],
) -> CapturedRequest {
    let (mut stream, _) = listener.accept().await.unwrap();
    let request = read_request(&mut stream).await;

    let head = format!(
        "HTTP/1.1 {status_code} OK\r\n\
         Content-Type: {content_type}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        body.len()
    );
    stream.write_all(head.as_bytes()).await.unwrap();
    stream.write_all(body).await.unwrap();
    stream.shutdown().await.unwrap();

    request
}

/// Read one HTTP/1.1 request: headers, then a `Content-Length` or chunked body.
async fn read_request(stream: &mut tokio::net::TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers were complete");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_owned();
    let path = request_line.next().unwrap_or_default().to_owned();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok());
    let chunked = headers.iter().any(|(k, v)| {
        k.eq_ignore_ascii_case("transfer-encoding") && v.eq_ignore_ascii_case("chunked")
    });

    let mut body = buf[header_end..].to_vec();
    if let Some(len) = content_length {
        while body.len() < len {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before body was complete");
            body.extend_from_slice(&chunk[..n]);
        }
    } else if chunked {
        while !body.ends_with(b"0\r\n\r\n") {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before chunked body was complete");
            body.extend_from_slice(&chunk[..n]);
        }
    }

    CapturedRequest {
        method,
        path,
        headers,
        body,
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// A client pointed at a mock server.
pub(crate) fn test_client(base_url: &str) -> SdkwaClient {
    SdkwaClient::new(SdkwaConfig::new("1101", "token").with_api_host(base_url))
        .expect("test client should build")
}
