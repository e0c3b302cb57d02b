//! Command-line interface.

pub mod completions;
pub mod decode;
pub mod output;
pub mod provision;
pub mod records;
pub mod simulate;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::env::Environment;
use crate::core::types::SlotId;

/// position-oracle - Off-chain position feed for an oracle network.
#[derive(Parser)]
#[command(
    name = "position-oracle",
    about = "Provision oracle secrets and run the position fetch-and-encode job",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Path to the configuration file
    #[arg(
        long,
        global = true,
        env = "POSITION_ORACLE_CONFIG",
        default_value = crate::core::constants::CONFIG_FILE
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Log formats.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Encrypt the credentials and upload them to the network's gateways
    Provision {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Hex ed25519 seed of the signer
        #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
        private_key: Option<String>,

        /// RPC endpoint the signer is bound to
        #[arg(long, env = "SEPOLIA_RPC_URL")]
        rpc_url: Option<String>,

        /// Slot to write (overrides config)
        #[arg(long)]
        slot: Option<SlotId>,

        /// Minutes until the secrets expire (overrides config)
        #[arg(long)]
        ttl: Option<u32>,

        /// Slot ledger path
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Encrypt only; print the envelope fingerprint and skip upload
        #[arg(long)]
        dry_run: bool,

        /// Overwrite an active slot without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Run the job locally against plaintext credentials
    Simulate {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Print the job output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a 32-byte hex job result
    Decode {
        /// Hex result, with or without 0x
        hex: String,
    },

    /// Show the recorded secrets versions per slot
    Records {
        /// Slot ledger path
        #[arg(long)]
        ledger: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Brokerage credentials, sourced from the environment.
#[derive(Args, Clone, Default)]
pub struct CredentialArgs {
    /// Brokerage API key
    #[arg(long, env = "ALPACA_API_KEY", default_value = "", hide_env_values = true, hide_default_value = true)]
    pub api_key: String,

    /// Brokerage API secret
    #[arg(long, env = "ALPACA_SECRET_KEY", default_value = "", hide_env_values = true, hide_default_value = true)]
    pub api_secret: String,

    /// Brokerage base URL
    #[arg(long, env = "ALPACA_API_URL", default_value = "", hide_default_value = true)]
    pub api_url: String,
}

impl CredentialArgs {
    /// Capture into an [`Environment`].
    pub fn into_environment(
        self,
        private_key: Option<String>,
        rpc_url: Option<String>,
    ) -> Environment {
        Environment {
            api_key: self.api_key,
            api_secret: self.api_secret,
            api_url: self.api_url,
            private_key,
            rpc_url,
        }
    }
}

/// Supported shells for completions.
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(cli: Cli) -> crate::error::Result<()> {
    let config_path = cli.config;

    match cli.command {
        Command::Provision {
            credentials,
            private_key,
            rpc_url,
            slot,
            ttl,
            ledger,
            dry_run,
            yes,
        } => provision::execute(provision::Options {
            config: config_path,
            env: credentials.into_environment(private_key, rpc_url),
            slot,
            ttl,
            ledger,
            dry_run,
            yes,
        }),
        Command::Simulate { credentials, json } => {
            simulate::execute(&config_path, credentials.into_environment(None, None), json)
        }
        Command::Decode { hex } => decode::execute(&hex),
        Command::Records { ledger } => records::execute(ledger),
        Command::Completions { shell } => completions::execute(shell),
    }
}
