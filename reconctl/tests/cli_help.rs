use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn top_level_help_lists_input_modes() {
    let mut cmd = cargo_bin_cmd!("recon");
    let output = cmd
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    for mode in ["domain", "ip", "nmap"] {
        assert!(text.contains(mode), "help missing '{mode}' subcommand");
    }
}

#[test]
fn domain_help_documents_required_flags() {
    let mut cmd = cargo_bin_cmd!("recon");
    let output = cmd
        .args(["domain", "--help"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    assert!(text.contains("--output"), "domain help missing --output");
    assert!(text.contains("--workspace"), "domain help missing --workspace");
    assert!(text.contains("--filename"), "domain help missing --filename");
    assert!(text.contains("xlsx"), "domain help missing xlsx format");
}

#[test]
fn missing_workspace_is_rejected() {
    let mut cmd = cargo_bin_cmd!("recon");
    cmd.args(["domain", "example.com", "-o", "csv", "-f", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--workspace"));
}

#[test]
fn unknown_format_is_rejected() {
    let mut cmd = cargo_bin_cmd!("recon");
    cmd.args([
        "domain",
        "example.com",
        "-o",
        "pdf",
        "-w",
        "ws",
        "-f",
        "out.pdf",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid value 'pdf'"));
}

#[test]
fn missing_tools_fail_with_one_diagnostic() {
    let empty = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("recon");
    cmd.env("PATH", empty.path())
        .env("RUST_LOG", "off")
        .env_remove("RECON_CONFIG_PATH")
        .env_remove("RECON_CONFIG_JSON")
        .current_dir(empty.path())
        .args(["domain", "example.com", "-o", "json", "-w", "test1", "-f", "out.json"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("pre-flight failed")
                .and(predicate::str::contains("nmap")),
        );
    assert!(!empty.path().join("out.json").exists());
}

#[test]
fn missing_ip_file_is_invalid_input() {
    let empty = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("recon");
    cmd.env("RUST_LOG", "off")
        .current_dir(empty.path())
        .args(["ip", "nope.txt", "-o", "csv", "-w", "ws", "-f", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid input"));
}
