//! position-oracle - Off-chain position feed for an oracle network.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use position_oracle::cli::output;
use position_oracle::cli::{execute, Cli, LogFormat};
use position_oracle::error::{ConfigError, CredentialError, DistributionError, Error, JobError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("POSITION_ORACLE_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("position_oracle=debug")
        } else {
            EnvFilter::new("position_oracle=warn")
        }
    });

    let registry = tracing_subscriber::registry().with(filter);
    match cli.log_format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }

    if let Err(e) = execute(cli) {
        // Format error with suggestion if available
        let error_msg = e.to_string();
        let suggestion = match &e {
            Error::Job(JobError::CredentialsNotProvided) => {
                Some("set ALPACA_API_KEY and ALPACA_SECRET_KEY")
            }
            Error::Credential(CredentialError::Missing("apiKey" | "apiSecret")) => {
                Some("set ALPACA_API_KEY and ALPACA_SECRET_KEY")
            }
            Error::Credential(CredentialError::Missing("apiUrl")) => Some("set ALPACA_API_URL"),
            Error::Credential(CredentialError::Missing(_)) => Some("set PRIVATE_KEY"),
            Error::Config(ConfigError::MissingField { field }) => Some(missing_field_hint(field)),
            Error::Distribution(DistributionError::QuorumNotReached { .. }) => {
                Some("check gateway reachability, or lower network.quorum")
            }
            _ => None,
        };

        output::error(&error_msg);
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

/// Hint for a config field that must be set.
fn missing_field_hint(field: &str) -> &'static str {
    match field {
        "network.recipients" => "add the network's age public keys to network.recipients in oracle.toml",
        "network.gateways" => "add gateway URLs to network.gateways in oracle.toml",
        "network.don_id" => "set network.don_id in oracle.toml",
        "source.key_header" | "source.secret_header" => {
            "set a header name under [source] in oracle.toml, or remove the key to use the default"
        }
        _ => "check oracle.toml",
    }
}
