//! Integration tests for the permit binary against the bundled fixtures.

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn permit() -> Command {
    let mut cmd = Command::cargo_bin("permit").unwrap();
    cmd.env_remove("PERMIT_CONFIG")
        .env_remove("PERMIT_DENIAL_MESSAGE")
        .env_remove("PERMIT_LOG_JSON")
        .env("RUST_LOG", "off");
    cmd
}

fn with_config() -> Command {
    let mut cmd = permit();
    cmd.args(["--config", &fixture("permit.toml")]);
    cmd
}

#[test]
fn check_grants_held_code() {
    permit()
        .args(["check", "--fixture", &fixture("org.yaml")])
        .args(["--principal", "dave", "--permission", "user_view"])
        .assert()
        .success()
        .stdout("GRANTED\n");
}

#[test]
fn check_all_mode_reports_missing_code() {
    permit()
        .args(["check", "--fixture", &fixture("org.yaml"), "--principal", "alice"])
        .args(["-p", "user_view", "-p", "user_edit", "--mode", "all"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("DENIED"))
        .stdout(predicate::str::contains("user_edit"));
}

#[test]
fn check_any_mode_grants_on_one_held_code() {
    permit()
        .args(["check", "--fixture", &fixture("org.yaml"), "--principal", "dave"])
        .args(["-p", "user_edit", "-p", "user_view", "--mode", "ANY"])
        .assert()
        .success();
}

#[test]
fn check_ownership_on_subject() {
    permit()
        .args(["check", "--fixture", &fixture("org.yaml"), "--principal", "alice"])
        .args(["-p", "article_edit", "--subject", "article:7"])
        .assert()
        .success();

    permit()
        .args(["check", "--fixture", &fixture("org.yaml"), "--principal", "alice"])
        .args(["-p", "article_edit", "--subject", "article:8"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ownership"));
}

#[test]
fn check_roleless_and_unknown_principals_are_denied() {
    for principal in ["eve", "nobody"] {
        permit()
            .args(["check", "--fixture", &fixture("org.yaml"), "--principal", principal])
            .args(["-p", "user_view"])
            .assert()
            .code(1);
    }
}

#[test]
fn check_card_is_json() {
    let output = permit()
        .args(["check", "--fixture", &fixture("org.yaml"), "--principal", "carol"])
        .args(["-p", "user_delete", "--card"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let card: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(card["principal_id"], "carol");
    assert_eq!(card["required"][0], "user_delete");
    assert_eq!(card["decision"]["outcome"], "granted");
}

#[test]
fn check_rejects_bad_mode() {
    permit()
        .args(["check", "--fixture", &fixture("org.yaml"), "--principal", "alice"])
        .args(["-p", "user_view", "--mode", "or"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn guard_enforces_stacked_declarations() {
    with_config()
        .args(["guard", "--fixture", &fixture("org.yaml"), "--principal", "alice"])
        .args(["--operation", "edit_article", "--subject", "article:7"])
        .assert()
        .success()
        .stdout("GRANTED\n");

    // alice owns article 7 but lacks article_publish
    with_config()
        .args(["guard", "--fixture", &fixture("org.yaml"), "--principal", "alice"])
        .args(["--operation", "publish_article", "--subject", "article:7"])
        .assert()
        .code(1)
        .stdout("DENIED: Access denied: insufficient permissions.\n");
}

#[test]
fn guard_denies_when_subject_missing() {
    with_config()
        .args(["guard", "--fixture", &fixture("org.yaml"), "--principal", "carol"])
        .args(["--operation", "edit_article"])
        .assert()
        .code(1);
}

#[test]
fn guard_uses_denial_message_from_env() {
    with_config()
        .env("PERMIT_DENIAL_MESSAGE", "Nope")
        .args(["guard", "--fixture", &fixture("org.yaml"), "--principal", "dave"])
        .args(["--operation", "manage_users"])
        .assert()
        .code(1)
        .stdout("DENIED: Nope\n");
}

#[test]
fn guard_unknown_operation_is_an_error() {
    with_config()
        .args(["guard", "--fixture", &fixture("org.yaml"), "--principal", "carol"])
        .args(["--operation", "launch_rockets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("launch_rockets"));
}

#[test]
fn validate_lists_operations() {
    with_config()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Guarded operations: 4"))
        .stdout(predicate::str::contains("publish_article"))
        .stdout(predicate::str::contains("article_publish, article_edit [ALL] on article"));
}

#[test]
fn validate_rejects_empty_permission_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[[guards.broken]]\npermission = []\n").unwrap();

    permit()
        .args(["--config", path.to_str().unwrap(), "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken"));
}
