//! Provision command.
//!
//! Builds the secret bundle, encrypts it for the network, uploads it to the
//! gateways and records the resulting version for the slot.

use std::path::PathBuf;

use chrono::Utc;
use tracing::debug;

use crate::cli::output;
use crate::core::bundle::build_secret_bundle;
use crate::core::cipher::{NetworkKey, SecretEncryptor, Signer};
use crate::core::config::Config;
use crate::core::distribute::{GatewayStatus, SecretDistributor};
use crate::core::env::Environment;
use crate::core::ledger::Ledger;
use crate::core::types::SlotId;
use crate::error::Result;

/// Inputs for one provisioning run.
pub struct Options {
    pub config: PathBuf,
    pub env: Environment,
    pub slot: Option<SlotId>,
    pub ttl: Option<u32>,
    pub ledger: Option<PathBuf>,
    pub dry_run: bool,
    pub yes: bool,
}

/// Run bundle → encrypt → distribute once.
pub fn execute(options: Options) -> Result<()> {
    let config = Config::load(&options.config)?;
    config.require_provisioning()?;

    let slot_id = options.slot.unwrap_or(config.secrets.slot_id);
    let ttl_minutes = options.ttl.unwrap_or(config.secrets.ttl_minutes);
    debug!(slot = slot_id, ttl_minutes, "provisioning");

    // Credentials are checked before any crypto or network I/O.
    let bundle = build_secret_bundle(&options.env)?;
    let signer = Signer::from_environment(&options.env)?;

    let network = NetworkKey::new(config.network.don_id.clone(), &config.network.recipients)?;
    let envelope = SecretEncryptor::new(network).encrypt(&bundle, &signer)?;
    drop(bundle);

    if options.dry_run {
        output::success("secrets encrypted (dry run, nothing uploaded)");
        output::kv("network:    ", &envelope.don_id);
        output::kv("signer:     ", &envelope.signer);
        output::kv("fingerprint:", envelope.fingerprint());
        return Ok(());
    }

    let ledger_path = match options.ledger {
        Some(path) => path,
        None => Ledger::default_path()?,
    };
    let mut ledger = Ledger::open(&ledger_path)?;

    if let Some(active) = ledger.get(slot_id).filter(|r| r.is_active(Utc::now())) {
        let message = format!(
            "slot {} holds version {} until {}; overwrite it?",
            slot_id, active.version, active.expires_at
        );
        if !options.yes && !confirm(&message)? {
            output::dimmed("aborted, slot left unchanged");
            return Ok(());
        }
    }

    let distributor = SecretDistributor::from_config(&config.network)?;
    let distribution = distributor.distribute(&envelope, slot_id, ttl_minutes)?;
    let superseded = ledger.record(distribution.record.clone())?;

    output::success("secrets uploaded");
    output::kv("network:", &config.network.don_id);
    if let Some(router) = &config.network.router_address {
        output::kv("router: ", router);
    }
    if let Some(rpc) = signer.rpc_url() {
        output::kv("rpc:    ", rpc);
    }
    output::kv("slot:   ", distribution.record.slot_id);
    output::kv("version:", distribution.record.version);
    output::kv("expires:", distribution.record.expires_at.to_rfc3339());
    if let Some(previous) = superseded {
        output::kv("replaced:", previous.version);
    }

    output::section("Gateways");
    for outcome in &distribution.outcomes {
        let line = match &outcome.status {
            GatewayStatus::Accepted(version) => format!("{}  accepted (v{})", outcome.gateway, version),
            GatewayStatus::Failed(reason) => format!("{}  failed: {}", outcome.gateway, reason),
            GatewayStatus::Pending => format!("{}  no answer before quorum", outcome.gateway),
        };
        output::list_item(&line);
    }
    if distribution.failures().next().is_some() {
        output::warn("some gateways failed; quorum was still reached");
    }

    Ok(())
}

/// Ask before superseding an active slot; non-interactive runs proceed.
fn confirm(message: &str) -> Result<bool> {
    if !console::Term::stderr().is_term() {
        output::warn(&format!("{} (non-interactive, proceeding)", message));
        return Ok(true);
    }

    let answer = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    Ok(answer)
}
