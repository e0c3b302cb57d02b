//! Tests for `position-oracle records`.

use crate::support::*;

#[test]
fn test_records_empty() {
    let t = Test::new();

    let output = t.records();
    assert_success(&output);
    assert_stdout_contains(&output, "no slots recorded");
}

#[test]
fn test_records_lists_expired_slot() {
    let t = Test::new();
    let path = t.ledger_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        "[slots.2]\nslot_id = 2\nversion = 11\nexpires_at = \"2020-01-01T00:00:00Z\"\n",
    )
    .unwrap();

    let output = t.records();
    assert_success(&output);
    assert_stdout_contains(&output, "slot 2  version 11");
    assert_stdout_contains(&output, "expired");
}

#[test]
fn test_records_explicit_ledger_path() {
    let t = Test::new();
    let path = t.dir.path().join("custom.toml");

    let output = t
        .cmd()
        .args(["records", "--ledger"])
        .arg(&path)
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "no slots recorded");
}
