use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn root_with_manifest(version: &str) -> TempDir {
    let tmp = TempDir::new().expect("tmpdir");
    fs::write(
        tmp.path().join("package.json"),
        format!(r#"{{"name": "host-app", "version": "{version}"}}"#),
    )
    .expect("write manifest");
    tmp
}

fn kinfo(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kinfo"));
    cmd.env_remove("KINFO_ROOT")
        .env("KINFO_LOG", "off")
        .arg("--root")
        .arg(root);
    cmd
}

#[test]
fn check_on_fresh_root_exits_with_diagnostics() {
    let tmp = root_with_manifest("1.3.4");
    kinfo(tmp.path())
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("incompatible"))
        .stderr(predicate::str::contains("System is not initialized yet!"))
        .stderr(predicate::str::contains(
            "Please initialize your system via update tool!",
        ));
    assert!(!tmp.path().join(".kernel.bes").exists());
}

#[test]
fn check_no_exit_quiet_reports_without_failing() {
    let tmp = root_with_manifest("1.3.4");
    kinfo(tmp.path())
        .args(["check", "--no-exit", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("incompatible"))
        .stderr(predicate::str::contains("System is not initialized").not());
}

#[test]
fn quiet_check_keeps_stderr_empty_at_default_log_level() {
    let tmp = root_with_manifest("1.3.4");
    Command::new(assert_cmd::cargo::cargo_bin!("kinfo"))
        .env_remove("KINFO_ROOT")
        .env_remove("KINFO_LOG")
        .arg("--root")
        .arg(tmp.path())
        .args(["check", "--quiet", "--no-exit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("incompatible"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn init_then_check_passes() {
    let tmp = root_with_manifest("1.3.4");
    kinfo(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("version 1.3.4"));
    assert!(tmp.path().join(".kernel.bes").exists());

    kinfo(tmp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::diff("compatible\n"));

    kinfo(tmp.path())
        .args(["get", "version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"1.3.4\""));
}

#[test]
fn stale_data_version_fails_check() {
    let tmp = root_with_manifest("1.3.4");
    kinfo(tmp.path())
        .args(["init", "--data-version", "1.0.0"])
        .assert()
        .success();
    kinfo(tmp.path())
        .args(["check", "--json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Data version is older than system version!",
        ))
        .stdout(predicate::str::contains("\"compatible\": false"));
}

#[test]
fn init_refuses_downgrade_without_force() {
    let tmp = root_with_manifest("1.3.4");
    kinfo(tmp.path())
        .args(["init", "--data-version", "2.0.0"])
        .assert()
        .success();
    kinfo(tmp.path())
        .args(["init", "--data-version", "1.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    kinfo(tmp.path())
        .args(["init", "--data-version", "1.0.0", "--force"])
        .assert()
        .success();
}

#[test]
fn set_and_get_round_trip_json_values() {
    let tmp = TempDir::new().expect("tmpdir");
    kinfo(tmp.path())
        .args(["set", "settings", r#"{"retries": 3, "tags": ["a", "b"]}"#])
        .assert()
        .success();

    let output = kinfo(tmp.path())
        .args(["get", "settings"])
        .output()
        .expect("run get");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["retries"], 3);
    assert_eq!(json["tags"][1], "b");

    kinfo(tmp.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"settings\""));
}

#[test]
fn reserved_keys_cannot_be_set() {
    let tmp = TempDir::new().expect("tmpdir");
    for key in ["save", "load", "cli_args"] {
        kinfo(tmp.path())
            .args(["set", key, "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("reserved"));
    }
    assert!(!tmp.path().join(".kernel.bes").exists());
}

#[test]
fn get_missing_key_fails() {
    let tmp = TempDir::new().expect("tmpdir");
    kinfo(tmp.path())
        .args(["get", "absent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no kernel data under 'absent'"));
}

#[test]
fn non_mapping_data_file_is_reported() {
    let tmp = TempDir::new().expect("tmpdir");
    let bytes = kinfo_cbor::to_canonical_cbor(&vec![1u32, 2, 3]).expect("encode");
    fs::write(tmp.path().join(".kernel.bes"), bytes).expect("write");
    kinfo(tmp.path())
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a mapping"));
}

#[test]
fn args_are_passed_through() {
    let tmp = TempDir::new().expect("tmpdir");
    kinfo(tmp.path())
        .args(["args", "serve", "--port", "8080"])
        .assert()
        .success()
        .stdout(predicate::str::diff("serve\n--port\n8080\n"));
}

#[test]
fn arch_lists_descriptors() {
    let tmp = TempDir::new().expect("tmpdir");
    kinfo(tmp.path())
        .arg("arch")
        .assert()
        .success()
        .stdout(predicate::str::contains("kinfo.kernel\t1.3.4"));
}
