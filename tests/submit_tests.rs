//! Integration tests for batch submission against an in-process log server

#![allow(deprecated)]

use assert_cmd::assert::{Assert, OutputAssertExt};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

mod common;
use common::{add_entry, seeded_workspace, workspace_cmd};

const DRAFT: &str = ".prodlog/drafts/2025-01-17_First.json";

#[derive(Clone, Copy)]
enum Reply {
    Accept,
    NoContent,
    AcceptAllButOne,
    Reject,
    RejectAfterPartialInsert,
    Garbage,
}

#[derive(Clone)]
struct SinkState {
    reply: Arc<Mutex<Reply>>,
    received: Arc<Mutex<Vec<Value>>>,
}

impl SinkState {
    fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    fn batches(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

async fn batch(State(state): State<SinkState>, Json(body): Json<Value>) -> (StatusCode, String) {
    let count = body["logs"].as_array().map(|logs| logs.len()).unwrap_or(0);
    state.received.lock().unwrap().push(body);

    let reply = *state.reply.lock().unwrap();
    match reply {
        Reply::Accept => (
            StatusCode::OK,
            json!({"success": true, "inserted": count}).to_string(),
        ),
        Reply::NoContent => (StatusCode::NO_CONTENT, String::new()),
        Reply::AcceptAllButOne => (
            StatusCode::OK,
            json!({"success": true, "inserted": count - 1}).to_string(),
        ),
        Reply::Reject => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"success": false, "error": "database is locked"}).to_string(),
        ),
        Reply::RejectAfterPartialInsert => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "success": false,
                "inserted": count - 1,
                "errors": [{"index": count - 1, "error": "invalid qty"}]
            })
            .to_string(),
        ),
        Reply::Garbage => (StatusCode::OK, "<html>proxy error</html>".to_string()),
    }
}

async fn spawn_sink(reply: Reply) -> (String, SinkState) {
    let state = SinkState {
        reply: Arc::new(Mutex::new(reply)),
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/api/logs/batch", post(batch))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

fn workspace_with_entries(jobs: &[&str]) -> TempDir {
    let temp = TempDir::new().unwrap();
    seeded_workspace(temp.path());
    for job in jobs {
        add_entry(temp.path(), job);
    }
    temp
}

/// Run `prodlog submit` off the async runtime so the server keeps serving
async fn submit(root: PathBuf, api_base: String) -> Assert {
    let output = tokio::task::spawn_blocking(move || {
        workspace_cmd(&root)
            .env("PRODLOG_API_BASE", api_base)
            .args(["submit", "--timeout", "5"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();
    output.assert()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_success_clears_draft_and_prefs() {
    let (url, sink) = spawn_sink(Reply::Accept).await;
    let temp = workspace_with_entries(&["JC-1", "JC-2"]);

    submit(temp.path().to_path_buf(), url)
        .await
        .success()
        .stdout(predicate::str::contains(
            "Submitted 2 entries for 2025-01-17 First shift",
        ))
        .stdout(predicate::str::contains("Date and shift cleared"));

    let batches = sink.batches();
    assert_eq!(batches.len(), 1);
    let logs = batches[0]["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["jobCardNo"], "JC-1");
    assert_eq!(logs[0]["shift"], "First");
    assert_eq!(logs[0]["date"], "2025-01-17");
    assert_eq!(logs[0]["endTime"], "06:00 PM");
    assert!(logs[0].get("id").is_none());

    assert!(!temp.path().join(DRAFT).exists());
    assert!(!temp.path().join(".prodlog/prefs.json").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_no_content_counts_as_success() {
    let (url, _sink) = spawn_sink(Reply::NoContent).await;
    let temp = workspace_with_entries(&["JC-1"]);

    submit(temp.path().to_path_buf(), url).await.success();
    assert!(!temp.path().join(DRAFT).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_rejected_keeps_draft() {
    let (url, sink) = spawn_sink(Reply::Reject).await;
    let temp = workspace_with_entries(&["JC-1", "JC-2"]);
    let before = fs::read_to_string(temp.path().join(DRAFT)).unwrap();

    submit(temp.path().to_path_buf(), url.clone())
        .await
        .code(4)
        .stderr(predicate::str::contains("Could not submit logs"))
        .stderr(predicate::str::contains("database is locked"))
        .stderr(predicate::str::contains("still saved locally"));

    assert_eq!(fs::read_to_string(temp.path().join(DRAFT)).unwrap(), before);
    assert!(temp.path().join(".prodlog/prefs.json").exists());

    // Retrying after the server recovers sends the same batch again
    sink.set_reply(Reply::Accept);
    submit(temp.path().to_path_buf(), url).await.success();

    let batches = sink.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0], batches[1]);
    assert!(!temp.path().join(DRAFT).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_partial_acceptance_keeps_draft() {
    let (url, _sink) = spawn_sink(Reply::AcceptAllButOne).await;
    let temp = workspace_with_entries(&["JC-1", "JC-2", "JC-3"]);

    submit(temp.path().to_path_buf(), url)
        .await
        .code(4)
        .stderr(predicate::str::contains("accepted only 2 of 3"));

    let contents = fs::read_to_string(temp.path().join(DRAFT)).unwrap();
    let entries: Vec<Value> = serde_json::from_str(&contents).unwrap();
    assert_eq!(entries.len(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_failure_after_partial_insert_reports_stored_count() {
    let (url, _sink) = spawn_sink(Reply::RejectAfterPartialInsert).await;
    let temp = workspace_with_entries(&["JC-1", "JC-2"]);
    let before = fs::read_to_string(temp.path().join(DRAFT)).unwrap();

    submit(temp.path().to_path_buf(), url)
        .await
        .code(4)
        .stderr(predicate::str::contains("accepted only 1 of 2"))
        .stderr(predicate::str::contains("already stored on the server"));

    assert_eq!(fs::read_to_string(temp.path().join(DRAFT)).unwrap(), before);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_malformed_response_keeps_draft() {
    let (url, _sink) = spawn_sink(Reply::Garbage).await;
    let temp = workspace_with_entries(&["JC-1"]);

    submit(temp.path().to_path_buf(), url)
        .await
        .code(4)
        .stderr(predicate::str::contains("invalid response"));
    assert!(temp.path().join(DRAFT).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_unreachable_server_keeps_draft() {
    let temp = workspace_with_entries(&["JC-1"]);

    submit(temp.path().to_path_buf(), "http://127.0.0.1:9".to_string())
        .await
        .code(4)
        .stderr(predicate::str::contains("Could not submit logs"));
    assert!(temp.path().join(DRAFT).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_empty_batch_skips_server() {
    let (url, sink) = spawn_sink(Reply::Accept).await;
    let temp = workspace_with_entries(&[]);

    submit(temp.path().to_path_buf(), url)
        .await
        .success()
        .stdout(predicate::str::contains("Nothing to submit"));
    assert!(sink.batches().is_empty());
    assert!(temp.path().join(".prodlog/prefs.json").exists());
}
