#![allow(deprecated)] // cargo_bin

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn lswp() -> Command {
    let mut cmd = Command::cargo_bin("lswp").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("LEASEWEB_TOKEN")
        .env_remove("LSWP_PROVIDER_CONFIG");
    cmd
}

#[test]
fn test_cli_help() {
    lswp()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("schema"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("read-data-source"));
}

#[test]
fn test_schema_lists_every_type() {
    lswp()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("leaseweb_dns_resource_record_set"))
        .stdout(predicate::str::contains("leaseweb_publiccloud_instance"))
        .stdout(predicate::str::contains("leaseweb_ipmgmt_null_route"));
}

#[test]
fn test_schema_for_one_type() {
    lswp()
        .args(["schema", "--type", "leaseweb_dns_resource_record_set"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ttl\""))
        .stdout(predicate::str::contains("leaseweb_publiccloud_instance").not());
}

#[test]
fn test_schema_for_unknown_type_fails() {
    lswp()
        .args(["schema", "--type", "leaseweb_nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("leaseweb_nope"));
}

#[test]
fn test_validate_rejects_bad_ttl() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("record.json");
    fs::write(
        &config,
        r#"{"domain_name": "example.com", "name": "www.", "type": "A", "content": ["1.2.3.4"], "ttl": 301}"#,
    )
    .unwrap();

    lswp()
        .args([
            "validate",
            "--type",
            "leaseweb_dns_resource_record_set",
            "--config",
        ])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("ttl"));
}

#[test]
fn test_validate_accepts_record_set() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("record.json");
    fs::write(
        &config,
        r#"{"domain_name": "example.com", "name": "www.", "type": "A", "content": ["1.2.3.4"], "ttl": 300}"#,
    )
    .unwrap();

    lswp()
        .args(["validate", "-t", "leaseweb_dns_resource_record_set", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_validate_reads_stdin() {
    lswp()
        .args([
            "validate",
            "-t",
            "leaseweb_dns_resource_record_set",
            "-c",
            "-",
        ])
        .write_stdin(
            r#"{"domain_name": "example.com", "name": "www.", "type": "MX", "content": [], "ttl": 300}"#,
        )
        .assert()
        .failure()
        .stderr(predicate::str::contains("content"));
}

#[test]
fn test_import_without_token_fails() {
    let dir = tempfile::tempdir().unwrap();
    let credentials = dir.path().join("credentials.yaml");
    fs::write(&credentials, "").unwrap();

    lswp()
        .env("LEASEWEB_CONFIG_PATH", &credentials)
        .args(["import", "-t", "leaseweb_publiccloud_instance", "i-1"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("LEASEWEB_TOKEN"));
}
