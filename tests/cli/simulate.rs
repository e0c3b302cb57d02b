//! Tests for `position-oracle simulate`.

use crate::support::*;

#[test]
fn test_simulate_encodes_market_value() {
    let t = Test::new();
    let (url, server) = serve_once(200, POSITION_BODY);

    let output = t.simulate(&url);
    assert_success(&output);
    assert_stdout_contains(&output, "4521.10");
    assert_stdout_contains(&output, POSITION_RESULT_HEX);

    let request = server.join().unwrap().expect("no request received");
    assert_eq!(request.method, "GET");
    assert_eq!(request.url, "/positions/TSLA");
    assert_eq!(request.header("Accept"), Some("application/json"));
    assert_eq!(request.header("APCA-API-KEY-ID"), Some("PKTEST"));
    assert_eq!(request.header("APCA-API-SECRET-KEY"), Some("sk-test"));
}

#[test]
fn test_simulate_trailing_slash_in_base_url() {
    let t = Test::new();
    let (url, server) = serve_once(200, POSITION_BODY);

    let output = t.simulate(&format!("{}/", url));
    assert_success(&output);

    let request = server.join().unwrap().expect("no request received");
    assert_eq!(request.url, "/positions/TSLA");
}

#[test]
fn test_simulate_json_output() {
    let t = Test::new();
    let (url, _server) = serve_once(200, POSITION_BODY);

    let output = t
        .cmd_with_credentials(&url)
        .args(["simulate", "--json"])
        .output()
        .unwrap();
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["response"], POSITION_RESULT_HEX);
    assert!(json["error"].is_null());
}

#[test]
fn test_simulate_without_credentials_makes_no_request() {
    let t = Test::new();
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();

    let output = t
        .cmd()
        .env("ALPACA_API_URL", format!("http://{addr}"))
        .args(["simulate", "--json"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_excludes(&output, "credentials not provided");

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(json["response"].is_null());
    assert_eq!(json["error"], "credentials not provided");

    assert!(server.try_recv().unwrap().is_none());
}

#[test]
fn test_simulate_missing_secret_only() {
    let t = Test::new();

    let output = t
        .cmd()
        .env("ALPACA_API_KEY", "PKTEST")
        .env("ALPACA_API_URL", "http://127.0.0.1:9")
        .arg("simulate")
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "credentials not provided");
    assert_stderr_contains(&output, "ALPACA_SECRET_KEY");
}

#[test]
fn test_simulate_json_failure_reports_error_once() {
    let t = Test::new();
    let (url, _server) = serve_once(200, r#"{"data":{"symbol":"TSLA"}}"#);

    let output = t
        .cmd_with_credentials(&url)
        .args(["simulate", "--json"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_eq!(stdout(&output).matches("invalid response shape").count(), 1);
    assert_stderr_excludes(&output, "invalid response shape");
}

#[test]
fn test_simulate_rejects_missing_market_value() {
    let t = Test::new();
    let (url, _server) = serve_once(200, r#"{"data":{"symbol":"TSLA"}}"#);

    let output = t.simulate(&url);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid response shape");
}

#[test]
fn test_simulate_rejects_string_market_value() {
    let t = Test::new();
    let (url, _server) = serve_once(200, r#"{"data":{"market_value":"4521.10"}}"#);

    let output = t.simulate(&url);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid response shape");
}

#[test]
fn test_simulate_upstream_error_status() {
    let t = Test::new();
    let (url, _server) = serve_once(403, r#"{"message":"forbidden"}"#);

    let output = t.simulate(&url);
    assert_failure(&output);
    assert_stderr_contains(&output, "fetch failed");
    assert_stderr_contains(&output, "403");
}

#[test]
fn test_simulate_custom_headers_from_config() {
    let t = Test::with_config("[source]\nkey_header = \"X-Key\"\nsecret_header = \"X-Secret\"\n");
    let (url, server) = serve_once(200, POSITION_BODY);

    let output = t.simulate(&url);
    assert_success(&output);

    let request = server.join().unwrap().expect("no request received");
    assert_eq!(request.header("X-Key"), Some("PKTEST"));
    assert_eq!(request.header("X-Secret"), Some("sk-test"));
    assert_eq!(request.header("APCA-API-KEY-ID"), None);
}
