//! Tests for `position-oracle provision`.

use age::x25519::Identity;
use position_oracle::core::cipher::{EncryptedSecrets, NetworkKey, SecretEncryptor};
use position_oracle::core::distribute::UploadRequest;

use crate::support::*;

fn config_for(identity: &Identity, gateways: &[String], quorum: Option<usize>) -> String {
    network_config(&identity.to_public().to_string(), gateways, quorum)
}

#[test]
fn test_provision_dry_run() {
    let identity = network_identity();
    let t = Test::with_config(&config_for(
        &identity,
        &["http://127.0.0.1:9/upload".to_string()],
        None,
    ));

    let output = t.provision(&["--dry-run"]);
    assert_success(&output);
    assert_stdout_contains(&output, "dry run");
    assert_stdout_contains(&output, SIGNER_PUBLIC);
    assert!(!t.ledger_path().exists());
}

#[test]
fn test_provision_requires_network_config() {
    let t = Test::new();

    let output = t.provision(&["--dry-run"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "network.recipients");
    assert_stderr_contains(&output, "age public keys");
}

#[test]
fn test_provision_requires_signer_key() {
    let identity = network_identity();
    let t = Test::with_config(&config_for(
        &identity,
        &["http://127.0.0.1:9/upload".to_string()],
        None,
    ));

    let output = t
        .cmd_with_credentials("https://paper-api.example.test/v2")
        .args(["provision", "--dry-run"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "missing credential: privateKey");
    assert_stderr_contains(&output, "PRIVATE_KEY");
}

#[test]
fn test_provision_requires_api_key() {
    let identity = network_identity();
    let t = Test::with_config(&config_for(
        &identity,
        &["http://127.0.0.1:9/upload".to_string()],
        None,
    ));

    let output = t
        .cmd()
        .env("ALPACA_SECRET_KEY", "sk-test")
        .env("ALPACA_API_URL", "https://paper-api.example.test/v2")
        .env("PRIVATE_KEY", SIGNER_SEED)
        .args(["provision", "--dry-run"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "missing credential: apiKey");
}

#[test]
fn test_provision_rejects_malformed_signer_key() {
    let identity = network_identity();
    let t = Test::with_config(&config_for(
        &identity,
        &["http://127.0.0.1:9/upload".to_string()],
        None,
    ));

    let output = t
        .cmd_with_credentials("https://paper-api.example.test/v2")
        .env("PRIVATE_KEY", "0x1234")
        .args(["provision", "--dry-run"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid signer key");
}

#[test]
fn test_provision_uploads_and_records_version() {
    let identity = network_identity();
    let (first, first_server) = accepting_gateway(5);
    let (second, second_server) = accepting_gateway(7);
    let t = Test::with_config(&config_for(&identity, &[first, second], Some(2)));

    let output = t.provision(&[]);
    assert_success(&output);
    assert_stdout_contains(&output, "secrets uploaded");
    assert_stdout_contains(&output, "version:  7");

    let ledger = std::fs::read_to_string(t.ledger_path()).unwrap();
    assert!(ledger.contains("version = 7"), "ledger: {}", ledger);

    // The uploaded envelope decrypts back to the credentials.
    let request = first_server.join().unwrap().expect("no upload received");
    assert_eq!(request.method, "POST");
    let upload: UploadRequest = serde_json::from_str(&request.body).unwrap();
    assert_eq!(upload.slot_id, 0);
    assert_eq!(upload.ttl_minutes, 60);
    assert_eq!(upload.signer, SIGNER_PUBLIC);

    let envelope = EncryptedSecrets::from_base64(&upload.encrypted_secrets).unwrap();
    let network = NetworkKey::new(
        "fun-ethereum-sepolia-1",
        &[identity.to_public().to_string()],
    )
    .unwrap();
    let bundle = SecretEncryptor::new(network).decrypt(&envelope, &identity).unwrap();
    assert_eq!(bundle.api_key(), "PKTEST");
    assert_eq!(bundle.api_secret(), "sk-test");
    assert_eq!(
        bundle.api_url(),
        "https://paper-api.example.test/v2/positions/TSLA"
    );

    assert!(second_server.join().unwrap().is_some());
}

#[test]
fn test_provision_slot_override() {
    let identity = network_identity();
    let (gateway, _server) = accepting_gateway(3);
    let t = Test::with_config(&config_for(&identity, &[gateway], None));

    let output = t.provision(&["--slot", "4", "--ttl", "15"]);
    assert_success(&output);

    let records = t.records();
    assert_success(&records);
    assert_stdout_contains(&records, "slot 4  version 3");
    assert_stdout_contains(&records, "active");
}

#[test]
fn test_provision_quorum_failure_leaves_ledger_untouched() {
    let identity = network_identity();
    let (good, _good) = accepting_gateway(5);
    let (bad, _bad) = failing_gateway();
    let t = Test::with_config(&config_for(&identity, &[good, bad], Some(2)));

    let output = t.provision(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to upload secrets");
    assert_stderr_contains(&output, "http 500");
    assert!(!t.ledger_path().exists());
}

#[test]
fn test_provision_tolerates_hung_gateway_within_quorum() {
    let identity = network_identity();
    let (good, _good) = accepting_gateway(9);
    let (hung, _listener) = silent_endpoint();
    let t = Test::with_config(&config_for(&identity, &[good, hung], Some(1)));

    let output = t.provision(&[]);
    assert_success(&output);
    assert_stdout_contains(&output, "version:  9");
}

#[test]
fn test_provision_overwrite_active_slot() {
    let identity = network_identity();
    let (gateway, _server) = accepting_gateway(1);
    let t = Test::with_config(&config_for(&identity, &[gateway], None));
    assert_success(&t.provision(&[]));

    let (gateway, _server) = accepting_gateway(2);
    t.write_config(&config_for(&identity, &[gateway], None));
    let output = t.provision(&["--yes"]);
    assert_success(&output);
    assert_stdout_contains(&output, "replaced:  1");
    assert_stderr_excludes(&output, "overwrite it?");

    let records = t.records();
    assert_stdout_contains(&records, "slot 0  version 2");
}

#[test]
fn test_provision_non_interactive_overwrite_warns() {
    let identity = network_identity();
    let (gateway, _server) = accepting_gateway(1);
    let t = Test::with_config(&config_for(&identity, &[gateway], None));
    assert_success(&t.provision(&[]));

    let (gateway, _server) = accepting_gateway(2);
    t.write_config(&config_for(&identity, &[gateway], None));
    let output = t.provision(&[]);
    assert_success(&output);
    assert_stderr_contains(&output, "non-interactive");
}
