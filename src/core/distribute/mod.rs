//! Secret distribution.
//!
//! Uploads an encrypted envelope to every configured gateway concurrently
//! and succeeds once a quorum has acknowledged. Gateways that have not
//! answered when quorum is decided are left running and reported as
//! pending; every call is bounded by the gateway timeout, so nothing waits
//! on a dead gateway for longer than that.

pub mod gateway;

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::cipher::EncryptedSecrets;
use crate::core::config::NetworkConfig;
use crate::core::types::{SecretsVersion, SlotId};
use crate::core::validation::validate_endpoint;
use crate::error::{DistributionError, Result};

pub use gateway::{Gateway, GatewayAck, HttpGateway, UploadRequest};

/// Slack added to the gateway timeout before a silent gateway is given up on.
const DEADLINE_GRACE: Duration = Duration::from_millis(250);

/// The active secrets record for a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionRecord {
    pub slot_id: SlotId,
    /// Version assigned by the network.
    pub version: SecretsVersion,
    pub expires_at: DateTime<Utc>,
}

impl DistributionRecord {
    /// Whether the record is still active at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// What one gateway said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayStatus {
    Accepted(SecretsVersion),
    Failed(String),
    /// No answer yet when quorum was decided.
    Pending,
}

/// Per-gateway outcome of a distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOutcome {
    pub gateway: String,
    pub status: GatewayStatus,
}

/// Successful distribution.
#[derive(Debug, Clone)]
pub struct Distribution {
    pub record: DistributionRecord,
    pub outcomes: Vec<GatewayOutcome>,
}

impl Distribution {
    /// Gateways that failed, quorum notwithstanding.
    pub fn failures(&self) -> impl Iterator<Item = &GatewayOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, GatewayStatus::Failed(_)))
    }
}

/// Fans uploads out to a gateway set.
pub struct SecretDistributor {
    gateways: Vec<Arc<dyn Gateway>>,
    quorum: usize,
    timeout: Duration,
}

impl SecretDistributor {
    /// Create a distributor over explicit gateways.
    ///
    /// `timeout` is the per-gateway bound; a gateway silent for longer is
    /// counted as failed.
    ///
    /// # Errors
    ///
    /// Returns `DistributionError::NoGateways` for an empty set and
    /// `DistributionError::UnreachableQuorum` when `quorum` is zero or
    /// larger than the set.
    pub fn new(
        gateways: Vec<Arc<dyn Gateway>>,
        quorum: usize,
        timeout: Duration,
    ) -> std::result::Result<Self, DistributionError> {
        if gateways.is_empty() {
            return Err(DistributionError::NoGateways);
        }
        if quorum == 0 || quorum > gateways.len() {
            return Err(DistributionError::UnreachableQuorum {
                required: quorum,
                available: gateways.len(),
            });
        }
        Ok(Self {
            gateways,
            quorum,
            timeout,
        })
    }

    /// Create HTTP gateways from the network section of the config.
    ///
    /// # Errors
    ///
    /// Returns config errors for malformed URLs and distribution errors for
    /// an unusable gateway set.
    pub fn from_config(network: &NetworkConfig) -> Result<Self> {
        let timeout = network.gateway_timeout();
        let mut gateways: Vec<Arc<dyn Gateway>> = Vec::with_capacity(network.gateways.len());
        for raw in &network.gateways {
            let url = validate_endpoint("network.gateways", raw)?;
            gateways.push(Arc::new(HttpGateway::new(url, timeout)?));
        }
        Ok(Self::new(gateways, network.quorum(), timeout)?)
    }

    /// Acknowledgements required.
    pub fn quorum(&self) -> usize {
        self.quorum
    }

    /// Upload `blob` to every gateway under `slot_id`, valid for
    /// `ttl_minutes` from now.
    ///
    /// Never retries. On success the record carries the highest version
    /// any accepting gateway reported.
    ///
    /// # Errors
    ///
    /// Returns `DistributionError::QuorumNotReached` with every gateway's
    /// reason when fewer than `quorum` gateways accept.
    pub fn distribute(
        &self,
        blob: &EncryptedSecrets,
        slot_id: SlotId,
        ttl_minutes: u32,
    ) -> Result<Distribution> {
        let request = Arc::new(UploadRequest::new(blob, slot_id, ttl_minutes)?);
        let total = self.gateways.len();
        info!(
            slot = slot_id,
            ttl_minutes,
            gateways = total,
            quorum = self.quorum,
            fingerprint = %blob.fingerprint(),
            "distributing secrets"
        );

        let (tx, rx) = mpsc::channel();
        for (index, gateway) in self.gateways.iter().enumerate() {
            let gateway = Arc::clone(gateway);
            let request = Arc::clone(&request);
            let tx = tx.clone();
            thread::spawn(move || {
                let result = gateway.upload(&request);
                // Receiver may be gone once quorum is decided.
                let _ = tx.send((index, result));
            });
        }
        drop(tx);

        let mut statuses = vec![GatewayStatus::Pending; total];
        let mut accepted = 0usize;
        let mut failed = 0usize;
        let deadline = Instant::now() + self.timeout + DEADLINE_GRACE;

        while accepted < self.quorum && failed <= total - self.quorum {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok((index, Ok(version))) => {
                    debug!(gateway = self.gateways[index].endpoint(), version, "gateway accepted");
                    statuses[index] = GatewayStatus::Accepted(version);
                    accepted += 1;
                }
                Ok((index, Err(reason))) => {
                    warn!(gateway = self.gateways[index].endpoint(), %reason, "gateway failed");
                    statuses[index] = GatewayStatus::Failed(reason);
                    failed += 1;
                }
                Err(_) => {
                    for status in statuses.iter_mut() {
                        if *status == GatewayStatus::Pending {
                            *status = GatewayStatus::Failed("request timed out".to_string());
                            failed += 1;
                        }
                    }
                    break;
                }
            }
        }

        let outcomes: Vec<GatewayOutcome> = self
            .gateways
            .iter()
            .zip(statuses)
            .map(|(gateway, status)| GatewayOutcome {
                gateway: gateway.endpoint().to_string(),
                status,
            })
            .collect();

        let version = outcomes
            .iter()
            .filter_map(|o| match o.status {
                GatewayStatus::Accepted(v) => Some(v),
                _ => None,
            })
            .max();

        match version {
            Some(version) if accepted >= self.quorum => {
                let record = DistributionRecord {
                    slot_id,
                    version,
                    expires_at: Utc::now() + chrono::Duration::minutes(i64::from(ttl_minutes)),
                };
                info!(
                    slot = slot_id,
                    version,
                    accepted,
                    failed,
                    expires_at = %record.expires_at,
                    "secrets distributed"
                );
                Ok(Distribution { record, outcomes })
            }
            _ => {
                let reason = outcomes
                    .iter()
                    .filter_map(|o| match &o.status {
                        GatewayStatus::Failed(reason) => Some(format!("{}: {}", o.gateway, reason)),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                warn!(accepted, required = self.quorum, "quorum not reached");
                Err(DistributionError::QuorumNotReached {
                    reason: format!(
                        "{} of {} required gateways accepted ({})",
                        accepted, self.quorum, reason
                    ),
                }
                .into())
            }
        }
    }
}
