//! Request execution: the job the network runs.
//!
//! One invocation walks `ValidateSecrets → Fetch → ValidateResponse →
//! Encode`, and any stage may fail the job. The secrets are handed in by
//! the caller; nothing here reads ambient state.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Number;
use tracing::{debug, info};

use crate::core::bundle::SecretBundle;
use crate::core::codec;
use crate::core::config::SourceConfig;
use crate::core::transport::{ReqwestTransport, Transport};
use crate::core::types::EncodedResult;
use crate::error::JobError;

/// Stages of one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidateSecrets,
    Fetch,
    ValidateResponse,
    Encode,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ValidateSecrets => "validate-secrets",
            Self::Fetch => "fetch",
            Self::ValidateResponse => "validate-response",
            Self::Encode => "encode",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Expected upstream body: `{ "data": { "market_value": <number> } }`.
#[derive(Debug, Deserialize)]
struct PositionResponse {
    data: PositionData,
}

#[derive(Debug, Deserialize)]
struct PositionData {
    market_value: Number,
}

/// The job's output: a 32-byte result or an error string, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutput {
    Response(EncodedResult),
    Error(String),
}

impl JobOutput {
    /// Encoded result, if the job succeeded.
    pub fn response(&self) -> Option<&EncodedResult> {
        match self {
            Self::Response(bytes) => Some(bytes),
            Self::Error(_) => None,
        }
    }

    /// Error string, if the job failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Response(_) => None,
            Self::Error(reason) => Some(reason),
        }
    }
}

impl From<Result<EncodedResult, JobError>> for JobOutput {
    fn from(result: Result<EncodedResult, JobError>) -> Self {
        match result {
            Ok(bytes) => Self::Response(bytes),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// Serialized as `{"response": "0x…" | null, "error": "…" | null}`.
impl Serialize for JobOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            response: Option<String>,
            error: Option<&'a str>,
        }

        Wire {
            response: self.response().map(codec::to_hex),
            error: self.error(),
        }
        .serialize(serializer)
    }
}

/// Runs the fetch-and-encode job against one upstream.
pub struct RequestExecutor<T = ReqwestTransport> {
    transport: T,
    source: SourceConfig,
}

impl RequestExecutor<ReqwestTransport> {
    /// Executor with a real HTTP transport using the source timeout.
    ///
    /// # Errors
    ///
    /// Returns `JobError::Fetch` if the HTTP client cannot be built.
    pub fn new(source: SourceConfig) -> Result<Self, JobError> {
        let transport = ReqwestTransport::new(source.timeout())?;
        Ok(Self { transport, source })
    }
}

impl<T: Transport> RequestExecutor<T> {
    /// Executor over an explicit transport.
    pub fn with_transport(transport: T, source: SourceConfig) -> Self {
        Self { transport, source }
    }

    /// Run the job and fold the outcome into a [`JobOutput`].
    pub fn run(&self, secrets: &SecretBundle) -> JobOutput {
        self.execute(secrets).into()
    }

    /// Run the job.
    ///
    /// Issues at most one HTTP request, and none when the credentials are
    /// blank.
    ///
    /// # Errors
    ///
    /// Returns the `JobError` of the first stage that fails.
    pub fn execute(&self, secrets: &SecretBundle) -> Result<EncodedResult, JobError> {
        enter(Stage::ValidateSecrets);
        if secrets.api_key().is_empty() || secrets.api_secret().is_empty() {
            return Err(JobError::CredentialsNotProvided);
        }

        enter(Stage::Fetch);
        let headers = [
            ("Accept", "application/json"),
            (self.source.key_header.as_str(), secrets.api_key()),
            (self.source.secret_header.as_str(), secrets.api_secret()),
        ];
        let response = self
            .transport
            .get(secrets.api_url(), &headers)
            .map_err(JobError::Fetch)?;
        if !response.is_success() {
            return Err(JobError::Fetch(format!(
                "upstream returned http {}",
                response.status
            )));
        }

        enter(Stage::ValidateResponse);
        let value = market_value(&response.body)?;
        info!(market_value = %value, "position fetched");

        enter(Stage::Encode);
        let encoded = codec::encode(&value)?;

        enter(Stage::Done);
        Ok(encoded)
    }
}

fn enter(stage: Stage) {
    debug!(%stage, "job stage");
}

/// Extract `data.market_value` as an exact decimal.
///
/// `Number` keeps the literal text of the body (`arbitrary_precision`), so
/// no digit passes through `f64`.
fn market_value(body: &[u8]) -> Result<BigDecimal, JobError> {
    let parsed: PositionResponse =
        serde_json::from_slice(body).map_err(|_| JobError::InvalidResponse)?;
    // JSON has no NaN or infinity; a number that fails to parse as a
    // decimal is rejected the same way.
    BigDecimal::from_str(&parsed.data.market_value.to_string())
        .map_err(|_| JobError::InvalidResponse)
}
