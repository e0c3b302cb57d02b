//! Outbound HTTP for the job.
//!
//! [`Transport`] is the seam between the executor and the network: the
//! executor only ever issues a single GET through it.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use tracing::trace;

use crate::error::JobError;

/// Upper bound on an upstream response body.
pub const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Status and body of an upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking HTTP GET.
pub trait Transport {
    /// Issue one GET.
    ///
    /// # Errors
    ///
    /// Returns a reason string on connection failure, timeout or an
    /// oversized body. Non-2xx responses are returned, not errors.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, String>;
}

/// `reqwest`-backed transport with a fixed timeout.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build the client; `timeout` covers the whole request.
    ///
    /// # Errors
    ///
    /// Returns `JobError::Fetch` if the client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self, JobError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .user_agent(concat!("position-oracle/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| JobError::Fetch(format!("http client build failed: {}", e)))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, String> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let mut response = request.send().map_err(|e| {
            if e.is_timeout() {
                "request timed out".to_string()
            } else {
                format!("request failed: {}", e)
            }
        })?;

        let status = response.status().as_u16();
        let body = read_limited(&mut response, MAX_RESPONSE_BYTES)?;
        trace!(status, body_len = body.len(), "upstream responded");

        Ok(HttpResponse { status, body })
    }
}

/// Reads the response body while enforcing a byte limit.
pub(crate) fn read_limited(response: &mut impl Read, max_bytes: usize) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    response
        .take(max_bytes as u64 + 1)
        .read_to_end(&mut buf)
        .map_err(|e| format!("failed to read response: {}", e))?;
    if buf.len() > max_bytes {
        return Err("response exceeds size limit".to_string());
    }
    Ok(buf)
}
