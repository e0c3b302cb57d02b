//! Command helper methods for Test.

use super::fixtures::SIGNER_SEED;
use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Variables the binary reads; cleared so the host environment never leaks in.
const INHERITED: &[&str] = &[
    "ALPACA_API_KEY",
    "ALPACA_SECRET_KEY",
    "ALPACA_API_URL",
    "PRIVATE_KEY",
    "SEPOLIA_RPC_URL",
    "POSITION_ORACLE_CONFIG",
    "POSITION_ORACLE_LOG",
];

impl Test {
    /// Create a position-oracle command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test working directory
    /// - Credential variables removed and colors disabled
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd =
            Command::cargo_bin("position-oracle").expect("failed to find position-oracle binary");
        for name in INHERITED {
            cmd.env_remove(name);
        }
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Command with brokerage credentials pointing at `api_url`.
    pub fn cmd_with_credentials(&self, api_url: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.env("ALPACA_API_KEY", "PKTEST");
        cmd.env("ALPACA_SECRET_KEY", "sk-test");
        cmd.env("ALPACA_API_URL", api_url);
        cmd
    }

    /// Shortcut for `position-oracle simulate`.
    pub fn simulate(&self, api_url: &str) -> Output {
        self.cmd_with_credentials(api_url)
            .arg("simulate")
            .output()
            .expect("failed to run simulate")
    }

    /// Shortcut for `position-oracle provision` with a signer key.
    pub fn provision(&self, args: &[&str]) -> Output {
        self.cmd_with_credentials("https://paper-api.example.test/v2")
            .env("PRIVATE_KEY", SIGNER_SEED)
            .arg("provision")
            .args(args)
            .output()
            .expect("failed to run provision")
    }

    /// Shortcut for `position-oracle records`.
    pub fn records(&self) -> Output {
        self.cmd()
            .arg("records")
            .output()
            .expect("failed to run records")
    }
}
