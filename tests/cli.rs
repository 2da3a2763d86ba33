use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

fn wowpack(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wowpack").unwrap();
    cmd.env("WOWPACK_HOME", home.path())
        .env_remove("WOWPACK_INSTALL_PATH")
        .env_remove("WOWPACK_DEBUG");
    cmd
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn unknown_provider_fails_before_any_download() {
    let home = TempDir::new().unwrap();
    let target = home.path().join("AddOns");
    fs::create_dir_all(target.join("Keep")).unwrap();

    let output = wowpack(&home)
        .args(["install", "WeakAuras:github", "--path"])
        .arg(&target)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout_of(&output).contains("Unknown download provider 'github'"));
    assert!(target.join("Keep").is_dir());
}

#[test]
fn install_alias_parses_tokens() {
    let home = TempDir::new().unwrap();
    let output = wowpack(&home).args(["i", ":curse"]).output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout_of(&output).contains("has an empty name"));
}

#[test]
fn install_requires_an_addon() {
    let home = TempDir::new().unwrap();
    wowpack(&home).arg("install").assert().failure();
}

#[test]
fn unknown_subcommand_is_a_no_op() {
    let home = TempDir::new().unwrap();
    wowpack(&home).args(["frobnicate", "x"]).assert().success();
    assert_eq!(fs::read_dir(home.path()).unwrap().count(), 0);
}

#[test]
fn path_is_persisted_and_listed() {
    let home = TempDir::new().unwrap();
    let target = home.path().join("Interface").join("AddOns");

    wowpack(&home).arg("path").arg(&target).assert().success();

    let record = fs::read_to_string(home.path().join("installed.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&record).unwrap();
    assert_eq!(json["path"], target.to_string_lossy().as_ref());
    assert_eq!(json["addons"], serde_json::json!([]));

    let output = wowpack(&home).arg("path").output().unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains(target.to_string_lossy().as_ref()));

    let output = wowpack(&home).arg("ls").output().unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("No addons recorded"));
}

#[test]
fn env_path_overrides_configured_path() {
    let home = TempDir::new().unwrap();
    let output = wowpack(&home)
        .env("WOWPACK_INSTALL_PATH", "/from/env/AddOns")
        .arg("path")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("/from/env/AddOns"));
}

#[test]
fn version_prints_banner() {
    let home = TempDir::new().unwrap();
    let output = wowpack(&home)
        .env("WOWPACK_CLI_VERSION", "9.9.9")
        .arg("--version")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("v9.9.9"));
}
