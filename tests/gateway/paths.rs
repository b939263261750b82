use std::path::PathBuf;

use serde_json::json;
use shellgate::Outcome;
use shellgate::error::{PolicyViolation, RequestError};
use shellgate::security::PathResolveMode;

use crate::gateway_harness::Harness;

#[tokio::test]
async fn change_directory_moves_following_executions() {
    let mut h = Harness::new();
    let home = h.session.home().to_path_buf();

    let body = h
        .completed(json!({"method": "changeDirectory", "path": "downloads"}))
        .await;
    assert_eq!(body["path"], home.join("downloads").display().to_string());

    h.completed(json!({"method": "executeCommand", "command": "ls"}))
        .await;
    assert_eq!(
        h.launcher.seen()[0].cwd(),
        Some(home.join("downloads").as_path())
    );
}

#[tokio::test]
async fn parent_segments_are_allowed_when_changing_directory() {
    let mut h = Harness::new();
    let home = h.session.home().to_path_buf();

    h.completed(json!({"method": "changeDirectory", "path": "bin"}))
        .await;
    let body = h
        .completed(json!({"method": "changeDirectory", "path": ".."}))
        .await;
    assert_eq!(body["path"], home.display().to_string());
    assert_eq!(h.session.cwd(), home);
}

#[tokio::test]
async fn tilde_and_absolute_targets() {
    let mut h = Harness::new();
    let home = h.session.home().to_path_buf();

    h.completed(json!({"method": "changeDirectory", "path": "~/tmp"}))
        .await;
    assert_eq!(h.session.cwd(), home.join("tmp"));

    h.completed(json!({"method": "changeDirectory", "path": "~"}))
        .await;
    assert_eq!(h.session.cwd(), home);

    let absolute = home.join(".config").display().to_string();
    h.completed(json!({"method": "changeDirectory", "path": absolute}))
        .await;
    assert_eq!(h.session.cwd(), home.join(".config"));
}

#[tokio::test]
async fn failed_change_keeps_the_previous_session() {
    let mut h = Harness::new();
    let before = h.session.clone();
    std::fs::write(before.home().join("file.txt"), "x").unwrap();

    let body = h
        .completed(json!({"method": "changeDirectory", "path": "file.txt"}))
        .await;
    assert_eq!(body["exitCode"], 1);
    assert!(body["error"].as_str().unwrap().starts_with("Not a directory:"));
    assert_eq!(h.session, before);

    assert_eq!(
        h.call(json!({"method": "changeDirectory"})).await,
        Outcome::Rejected(RequestError::MissingField("Path is required"))
    );
}

#[tokio::test]
async fn current_directory_reports_path_and_home() {
    let mut h = Harness::new();
    let body = h.completed(json!({"method": "getCurrentDirectory"})).await;
    assert_eq!(
        body,
        json!({
            "path": h.session.cwd().display().to_string(),
            "home": h.session.home().display().to_string(),
        })
    );
}

#[test]
fn resolver_basics_hold_for_the_gateway_policy() {
    let h = Harness::new();
    let policy = h.gateway.policy();

    assert_eq!(policy.resolve_path(&h.session, Some("")).unwrap(), h.session.cwd());
    assert_eq!(
        policy.resolve_path(&h.session, Some("~/x")).unwrap(),
        PathBuf::from(format!("{}/x", h.session.home().display()))
    );
    assert_eq!(
        policy.resolve_path(&h.session, Some("/a/b")).unwrap(),
        PathBuf::from("/a/b")
    );
}

#[test]
fn strict_mode_from_config_refuses_unresolvable_paths() {
    let h = Harness::with_config(|c| c.paths.resolve_mode = PathResolveMode::Strict);
    assert_eq!(
        h.gateway
            .policy()
            .resolve_path(&h.session, Some("nowhere/deep/file")),
        Err(PolicyViolation::UnresolvablePath("nowhere/deep/file".into()))
    );

    let lenient = Harness::new();
    assert_eq!(
        lenient
            .gateway
            .policy()
            .resolve_path(&lenient.session, Some("nowhere/deep/file"))
            .unwrap(),
        lenient.session.cwd().join("nowhere/deep/file")
    );
}

#[tokio::test]
async fn setup_environment_rehomes_the_session() {
    let mut h = Harness::with_config(|c| c.environment.user = "dev".into());

    let body = h
        .completed(json!({"method": "setupLinuxEnvironment"}))
        .await;
    assert_eq!(body["exitCode"], 0);

    let root = PathBuf::from(body["linuxRoot"].as_str().unwrap());
    assert_eq!(h.session.home(), root.join("home/dev"));
    assert_eq!(h.session.cwd(), h.session.home());
    let passwd = std::fs::read_to_string(root.join("etc/passwd")).unwrap();
    assert!(passwd.contains("dev:x:1000:1000"));
    assert!(root.join("var/log").is_dir());
}
