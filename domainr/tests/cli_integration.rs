// domainr/tests/cli_integration.rs

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Command with an isolated HOME and no inherited overrides
fn domainr(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("domainr").unwrap();
    cmd.env("HOME", home)
        .env_remove("DOMAINR_CONFIG")
        .env_remove("DOMAINR_CONCURRENCY")
        .env_remove("DOMAINR_CACHE_TTL")
        .env_remove("RUST_LOG");
    cmd
}

/// Write `~/.domainr/config` under the given home
fn write_config(home: &Path, body: &str) -> PathBuf {
    let base = home.join(".domainr");
    fs::create_dir_all(&base).expect("Failed to create config dir");
    let path = base.join("config");
    fs::write(&path, body).expect("Failed to write config");
    path
}

fn godaddy_config(home: &Path, api_url: &str) -> PathBuf {
    write_config(
        home,
        &format!(
            "[search]\nconcurrency = 2\n\n[godaddy]\nkey = \"k\"\nsecret = \"s\"\napi_url = \"{}\"\nenabled = true\n",
            api_url
        ),
    )
}

fn mock_answer<'a>(server: &'a MockServer, domain: &str, available: bool) -> httpmock::Mock<'a> {
    let body = format!(r#"{{"available":{},"domain":"{}","definitive":true}}"#, available, domain);
    server.mock(|when, then| {
        when.method(GET)
            .path("/v1/domains/available")
            .query_param("domain", domain);
        then.status(200).body(body);
    })
}

#[test]
fn test_help_lists_search_flags() {
    let home = TempDir::new().unwrap();
    domainr(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--second"))
        .stdout(predicate::str::contains("--tld-sub"))
        .stdout(predicate::str::contains("--load"))
        .stdout(predicate::str::contains("--save"));
}

#[test]
fn test_missing_parts_is_rejected() {
    let home = TempDir::new().unwrap();
    domainr(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("You must specify domain parts"));
}

#[test]
fn test_concurrency_out_of_range() {
    let home = TempDir::new().unwrap();
    domainr(home.path())
        .args(["super", "-t", "com", "-c", "500"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Concurrency must be between 1 and 100"));
}

#[test]
fn test_init_creates_default_config() {
    let home = TempDir::new().unwrap();

    domainr(home.path())
        .arg("--init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created default config"));

    let config = home.path().join(".domainr").join("config");
    assert!(config.is_file());
    assert!(home.path().join(".domainr").join("data").is_dir());
    assert!(fs::read_to_string(&config).unwrap().contains("[godaddy]"));

    domainr(home.path())
        .arg("--init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Config already exists"));
}

#[test]
fn test_first_run_writes_config_and_stops() {
    let home = TempDir::new().unwrap();
    domainr(home.path())
        .args(["super", "-t", "com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Created default config"));

    assert!(home.path().join(".domainr").join("config").is_file());
}

#[test]
fn test_no_enabled_backend_is_fatal() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), "[dns]\nenabled = false\n");

    domainr(home.path())
        .args(["super", "-t", "com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No search source enabled"));
}

#[test]
fn test_explicit_config_file() {
    let home = TempDir::new().unwrap();
    let other = TempDir::new().unwrap();
    let config = other.path().join("custom.toml");
    fs::write(&config, "[namecheap]\nenabled = false\n").unwrap();

    domainr(home.path())
        .args(["super", "-t", "com", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No search source enabled"));

    // An explicit config never triggers first-run setup
    assert!(!home.path().join(".domainr").join("config").exists());
}

#[test]
fn test_unknown_tld_is_rejected_before_searching() {
    let home = TempDir::new().unwrap();
    godaddy_config(home.path(), "http://127.0.0.1:1");

    domainr(home.path())
        .args(["super", "-t", "com,notatld"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid TLD: notatld"));
}

#[test]
fn test_missing_session_file() {
    let home = TempDir::new().unwrap();
    godaddy_config(home.path(), "http://127.0.0.1:1");

    domainr(home.path())
        .args(["--load", "/nonexistent/session.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Couldn't read: /nonexistent/session.json"));
}

#[test]
fn test_nothing_to_search() {
    let home = TempDir::new().unwrap();
    godaddy_config(home.path(), "http://127.0.0.1:1");

    // "yachts" is itself a TLD, so substitution leaves no base name
    domainr(home.path())
        .args(["yachts", "--tld-sub"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No possible searches!"));
}

#[test]
fn test_search_with_json_output_and_session() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    godaddy_config(home.path(), &server.base_url());

    mock_answer(&server, "super.com", false);
    mock_answer(&server, "super.io", true);
    mock_answer(&server, "mega.com", true);
    mock_answer(&server, "mega.io", false);

    let session = home.path().join("search.json");
    let output = domainr(home.path())
        .args(["super", "mega", "-t", "com,io", "--json", "--save"])
        .arg(&session)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["status"], "completed");
    assert_eq!(report["scanned"], 4);
    assert_eq!(report["found"], 2);
    assert_eq!(report["domains"], serde_json::json!(["mega.com", "super.io"]));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&session).unwrap()).unwrap();
    assert_eq!(saved["Parts1"], serde_json::json!(["super", "mega"]));
    assert_eq!(saved["Tlds"], serde_json::json!(["com", "io"]));
    assert_eq!(saved["Domains"], serde_json::json!(["mega.com", "super.io"]));
    assert_eq!(saved["Settings"]["TLDSubstitutions"], false);
}

#[test]
fn test_answers_are_cached_between_runs() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    godaddy_config(home.path(), &server.base_url());
    let mock = mock_answer(&server, "super.io", true);

    for _ in 0..2 {
        domainr(home.path())
            .args(["super", "-t", "io"])
            .assert()
            .success()
            .stdout(predicate::str::contains("super.io"))
            .stdout(predicate::str::contains(
                "Search complete: Scanned 1 domain(s) - 1 domain(s) available",
            ));
    }
    assert_eq!(mock.hits(), 1);

    // --no-cache goes back to the API
    domainr(home.path())
        .args(["super", "-t", "io", "--no-cache"])
        .assert()
        .success();
    assert_eq!(mock.hits(), 2);
}

#[test]
fn test_api_error_is_reported() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    godaddy_config(home.path(), &server.base_url());
    server.mock(|when, then| {
        when.method(GET).path("/v1/domains/available");
        then.status(401)
            .body(r#"{"code":"UNABLE_TO_AUTHENTICATE","message":"Unable to authenticate"}"#);
    });

    domainr(home.path())
        .args(["super", "-t", "com", "--no-cache"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("API error: Unable to authenticate"));
}

#[test]
fn test_session_load_reruns_search() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start();
    godaddy_config(home.path(), &server.base_url());
    mock_answer(&server, "megayachts.io", true);

    let session = home.path().join("saved.json");
    fs::write(
        &session,
        r#"{
    "Parts1": ["mega"],
    "Parts2": ["yachts"],
    "Tlds": ["io"],
    "Domains": [],
    "Settings": {
        "TLDSubstitutions": false
    }
}"#,
    )
    .unwrap();

    domainr(home.path())
        .args(["--json", "--no-cache", "--load"])
        .arg(&session)
        .assert()
        .success()
        .stdout(predicate::str::contains("megayachts.io"));
}
