use std::io;

use serde_json::json;
use shellgate::Outcome;
use shellgate::error::{PolicyViolation, RequestError};
use shellgate::exec::RawOutput;

use crate::gateway_harness::{Harness, RecordingLauncher};

#[tokio::test]
async fn root_command_is_wrapped_in_su_with_quoted_args() {
    let mut h = Harness::with_output("uid=0(root)\n", 0);

    let body = h
        .completed(json!({
            "method": "executeRootCommand",
            "command": "ls",
            "args": ["-la", "it's here"],
        }))
        .await;

    assert_eq!(body["exitCode"], 0);
    let seen = h.launcher.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].argv(), ["su", "-c", r"ls '-la' 'it'\''s here'"]);
    assert!(seen[0].cwd().is_none());
}

#[tokio::test]
async fn root_path_uses_the_same_allowlist() {
    let mut h = Harness::new();

    let body = h
        .completed(json!({"method": "executeRootCommand", "command": "sh", "args": ["-c", "id"]}))
        .await;
    assert_eq!(body["exitCode"], 1);
    assert_eq!(
        body["error"],
        PolicyViolation::ElevatedCommandNotAllowed.to_string()
    );
    assert_eq!(h.launcher.launches(), 0);
}

#[tokio::test]
async fn root_args_with_metacharacters_are_refused() {
    let mut h = Harness::new();

    let body = h
        .completed(json!({
            "method": "executeRootCommand",
            "command": "cat",
            "args": ["/etc/shadow; reboot"],
        }))
        .await;
    assert_eq!(body["error"], PolicyViolation::UnsafeArguments.to_string());
    assert_eq!(h.launcher.launches(), 0);
}

#[tokio::test]
async fn unprivileged_only_entries_cannot_escalate() {
    let mut h = Harness::with_config(|c| c.allowlist.unprivileged_only = vec!["rm".into()]);

    let body = h
        .completed(json!({"method": "executeRootCommand", "command": "rm", "args": ["x"]}))
        .await;
    assert_eq!(body["exitCode"], 1);

    let body = h
        .completed(json!({"method": "executeCommand", "command": "rm", "args": ["x"]}))
        .await;
    assert_eq!(body["exitCode"], 0);
    assert_eq!(h.launcher.launches(), 1);
}

#[tokio::test]
async fn missing_root_command_is_rejected() {
    let mut h = Harness::new();
    assert_eq!(
        h.call(json!({"method": "executeRootCommand", "args": []})).await,
        Outcome::Rejected(RequestError::MissingField("Command is required"))
    );
}

#[tokio::test]
async fn su_spawn_failure_is_labelled() {
    let mut h = Harness::build(RecordingLauncher::failing(io::ErrorKind::NotFound), |_| {});

    let body = h
        .completed(json!({"method": "executeRootCommand", "command": "id"}))
        .await;
    assert_eq!(body["exitCode"], 1);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Root execution failed:")
    );
}

#[tokio::test]
async fn root_probe_reports_a_boolean() {
    let mut h = Harness::with_output("test\n", 0);
    let body = h.completed(json!({"method": "checkRootAccess"})).await;
    assert_eq!(body, json!({"hasPrivilege": true, "hasRoot": true}));
    assert_eq!(h.launcher.seen()[0].argv(), ["su", "-c", "echo test"]);

    let launcher = RecordingLauncher::answering(RawOutput {
        exit_code: 1,
        ..RawOutput::default()
    });
    let mut h = Harness::build(launcher, |_| {});
    let body = h.completed(json!({"method": "checkRootAccess"})).await;
    assert_eq!(body["hasPrivilege"], false);
}

#[tokio::test]
async fn root_probe_is_false_when_su_is_missing() {
    let mut h = Harness::build(RecordingLauncher::failing(io::ErrorKind::NotFound), |_| {});
    let body = h.completed(json!({"method": "checkRootAccess"})).await;
    assert_eq!(body, json!({"hasPrivilege": false, "hasRoot": false}));
}
