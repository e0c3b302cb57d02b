//! Simulate command.
//!
//! Runs the job locally with plaintext credentials, the way the network
//! would after decrypting them, and prints the decoded result.

use std::path::Path;

use crate::cli::output;
use crate::core::bundle::SecretBundle;
use crate::core::codec;
use crate::core::config::Config;
use crate::core::env::Environment;
use crate::core::executor::{JobOutput, RequestExecutor};
use crate::error::Result;

/// Run the job once and report its output.
pub fn execute(config: &Path, env: Environment, json: bool) -> Result<()> {
    let config = Config::load(config)?;
    let secrets = SecretBundle::from_environment(&env);
    let result = RequestExecutor::new(config.source)?.execute(&secrets);
    let job = JobOutput::from(result.clone());

    if json {
        let rendered = serde_json::to_string_pretty(&job)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        output::data(&rendered);
        // The document already carries the error; exit without repeating it.
        if result.is_err() {
            std::process::exit(1);
        }
    } else if let Some(bytes) = job.response() {
        output::success("job succeeded");
        output::kv("value:", codec::decode(bytes));
        output::kv("bytes:", codec::to_hex(bytes));
    }

    result?;
    Ok(())
}
