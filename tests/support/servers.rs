//! Local HTTP servers standing in for the brokerage and the gateways.

use std::io::Read;
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tiny_http::{Header, Response, Server};

/// What a server saw of one request.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Serve exactly one request with `status` and a JSON `body`.
///
/// Returns the base URL and a handle yielding the recorded request.
pub fn serve_once(status: u16, body: &str) -> (String, JoinHandle<Option<Recorded>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let body = body.to_string();

    let handle = thread::spawn(move || {
        let mut request = server.recv_timeout(Duration::from_secs(10)).ok()??;
        let mut content = String::new();
        let _ = request.as_reader().read_to_string(&mut content);
        let recorded = Recorded {
            method: request.method().to_string(),
            url: request.url().to_string(),
            headers: request
                .headers()
                .iter()
                .map(|h| (h.field.to_string(), h.value.to_string()))
                .collect(),
            body: content,
        };

        let json = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
        let response = Response::from_string(body)
            .with_status_code(status)
            .with_header(json);
        let _ = request.respond(response);
        Some(recorded)
    });

    (format!("http://{addr}"), handle)
}

/// Gateway that accepts one upload and reports `version`.
pub fn accepting_gateway(version: u64) -> (String, JoinHandle<Option<Recorded>>) {
    let (url, handle) = serve_once(200, &format!(r#"{{"success":true,"version":{version}}}"#));
    (format!("{url}/upload"), handle)
}

/// Gateway that rejects one upload with HTTP 500.
pub fn failing_gateway() -> (String, JoinHandle<Option<Recorded>>) {
    let (url, handle) = serve_once(500, r#"{"success":false,"error_message":"node offline"}"#);
    (format!("{url}/upload"), handle)
}

/// Endpoint that accepts connections but never answers.
///
/// Keep the listener alive for as long as the endpoint should hang.
pub fn silent_endpoint() -> (String, TcpListener) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    (format!("http://{addr}/upload"), listener)
}
