use serde_json::{Value, json};
use shellgate::Outcome;
use shellgate::error::{PolicyViolation, RequestError};

use crate::gateway_harness::Harness;

const TRAVERSAL: &str = "../../etc/passwd";

#[tokio::test]
async fn write_read_and_list_round_trip() {
    let mut h = Harness::new();

    let written = h
        .completed(json!({"method": "writeFile", "path": "notes/today.txt", "content": "hi"}))
        .await;
    assert_eq!(written["success"], true);
    assert_eq!(written["size"], 2);

    let read = h
        .completed(json!({"method": "readFile", "path": "notes/today.txt"}))
        .await;
    assert_eq!(read["content"], "hi");

    let listing = h
        .completed(json!({"method": "listDirectory", "path": "notes"}))
        .await;
    assert_eq!(listing["count"], 1);
    assert_eq!(listing["files"][0]["name"], "today.txt");
    assert_eq!(listing["files"][0]["isFile"], true);
}

#[tokio::test]
async fn every_mutating_operation_rejects_traversal() {
    let mut h = Harness::new();
    let requests = [
        json!({"method": "writeFile", "path": TRAVERSAL, "content": "x"}),
        json!({"method": "deleteFile", "path": TRAVERSAL}),
        json!({"method": "createDirectory", "path": TRAVERSAL}),
        json!({"method": "copyFile", "source": "a", "destination": TRAVERSAL}),
        json!({"method": "moveFile", "source": TRAVERSAL, "destination": "b"}),
        json!({"method": "downloadFile", "url": "https://example.com/f", "destination": TRAVERSAL}),
    ];

    for request in requests {
        let body = h.completed(request.clone()).await;
        assert_eq!(body["exitCode"], 1, "{request}");
        assert_eq!(
            body["error"],
            PolicyViolation::PathTraversal.to_string(),
            "{request}"
        );
    }
}

#[tokio::test]
async fn missing_paths_are_rejected() {
    let mut h = Harness::new();
    let cases: [(Value, &'static str); 5] = [
        (json!({"method": "readFile"}), "Path is required"),
        (json!({"method": "writeFile", "content": "x"}), "Path is required"),
        (json!({"method": "deleteFile"}), "Path is required"),
        (
            json!({"method": "copyFile", "source": "a"}),
            "Source and destination are required",
        ),
        (
            json!({"method": "downloadFile", "url": "https://example.com"}),
            "URL and destination are required",
        ),
    ];

    for (request, message) in cases {
        assert_eq!(
            h.call(request).await,
            Outcome::Rejected(RequestError::MissingField(message))
        );
    }
}

#[tokio::test]
async fn create_directory_defaults_to_recursive() {
    let mut h = Harness::new();
    let body = h
        .completed(json!({"method": "createDirectory", "path": "a/b/c"}))
        .await;
    assert_eq!(body["success"], true);
    assert!(h.session.cwd().join("a/b/c").is_dir());

    let body = h
        .completed(json!({"method": "createDirectory", "path": "x/y", "recursive": false}))
        .await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn delete_defaults_to_non_recursive() {
    let mut h = Harness::new();
    h.completed(json!({"method": "writeFile", "path": "d/f", "content": ""}))
        .await;

    let body = h.completed(json!({"method": "deleteFile", "path": "d"})).await;
    assert_eq!(body["success"], false);
    let body = h
        .completed(json!({"method": "deleteFile", "path": "d", "recursive": true}))
        .await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn copy_and_move_report_both_paths() {
    let mut h = Harness::new();
    h.completed(json!({"method": "writeFile", "path": "src.txt", "content": "data"}))
        .await;

    let copied = h
        .completed(json!({"method": "copyFile", "source": "src.txt", "destination": "out/copy.txt"}))
        .await;
    assert_eq!(copied["success"], true);
    assert_eq!(
        copied["destination"],
        h.session.cwd().join("out/copy.txt").display().to_string()
    );

    let moved = h
        .completed(json!({"method": "moveFile", "source": "out/copy.txt", "destination": "moved.txt"}))
        .await;
    assert_eq!(moved["success"], true);
    assert!(!h.session.cwd().join("out/copy.txt").exists());
}

#[tokio::test]
async fn missing_source_is_a_result() {
    let mut h = Harness::new();
    let body = h
        .completed(json!({"method": "readFile", "path": "ghost.txt"}))
        .await;
    assert_eq!(body["exitCode"], 1);
    assert!(body["error"].as_str().unwrap().starts_with("File not found:"));
}

#[tokio::test]
async fn plain_http_download_is_refused() {
    let mut h = Harness::new();
    let body = h
        .completed(json!({"method": "downloadFile", "url": "http://example.com/f", "destination": "f"}))
        .await;
    assert_eq!(body["exitCode"], 1);
    assert_eq!(body["error"], PolicyViolation::InsecureUrl.to_string());
    assert!(!h.session.cwd().join("f").exists());
}
