#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;

pub fn prodlog_cmd() -> Command {
    let mut cmd = Command::cargo_bin("prodlog").unwrap();
    cmd.env_remove("PRODLOG_ROOT");
    cmd.env_remove("PRODLOG_API_BASE");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Command running inside `root`, with network calls pointed at a closed port
pub fn workspace_cmd(root: &Path) -> Command {
    let mut cmd = prodlog_cmd();
    cmd.current_dir(root);
    cmd.env("PRODLOG_API_BASE", "http://127.0.0.1:9");
    cmd
}

/// Initialize a workspace with a small option list and date/shift selected
pub fn seeded_workspace(root: &Path) {
    prodlog_cmd().arg("init").arg(root).assert().success();
    fs::write(
        root.join("lists.json"),
        r#"{
  "operators": ["Asha", "Ravi"],
  "machines": ["CNC-1", "Lathe"],
  "operations": ["Milling", "Turning"]
}"#,
    )
    .unwrap();
    workspace_cmd(root)
        .args(["date", "2025-01-17"])
        .assert()
        .success();
    workspace_cmd(root).args(["shift", "first"]).assert().success();
}

pub fn add_entry(root: &Path, job: &str) {
    workspace_cmd(root)
        .args([
            "add",
            "--operator",
            "asha",
            "--machine",
            "CNC-1",
            "--operation",
            "Milling",
            "--qty",
            "12",
            "--job-card",
            job,
            "--description",
            "Bracket",
        ])
        .assert()
        .success();
}
