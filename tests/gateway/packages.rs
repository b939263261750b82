use serde_json::json;
use shellgate::Outcome;
use shellgate::error::{PolicyViolation, RequestError};
use shellgate::exec::{ExecutionEngine, ExecutionEnv};

use crate::gateway_harness::Harness;

#[tokio::test]
async fn debian_source_installs_with_apt_get() {
    let mut h = Harness::with_output("done\n", 0);

    let body = h
        .completed(json!({"method": "installPackage", "packageName": "curl", "source": "debian"}))
        .await;

    assert_eq!(body["exitCode"], 0);
    assert_eq!(
        h.launcher.seen()[0].argv(),
        ["su", "-c", "apt-get install -y curl"]
    );
}

#[tokio::test]
async fn source_mapping_selects_manager_and_subcommand() {
    let cases = [
        (Some("arch"), "pacman -S --noconfirm htop"),
        (Some("rpm"), "yum install -y htop"),
        (Some("auto"), "pkg install -y htop"),
        (None, "pkg install -y htop"),
    ];

    for (source, expected) in cases {
        let mut h = Harness::new();
        let mut request = json!({"method": "installPackage", "packageName": "htop"});
        if let Some(source) = source {
            request["source"] = json!(source);
        }
        h.completed(request).await;
        assert_eq!(h.launcher.seen()[0].argv(), ["su", "-c", expected], "{source:?}");
    }
}

#[tokio::test]
async fn injected_package_name_never_spawns() {
    let mut h = Harness::new();

    let body = h
        .completed(json!({"method": "installPackage", "packageName": "pkg;rm -rf", "source": "debian"}))
        .await;

    assert_eq!(body["exitCode"], 1);
    assert_eq!(body["error"], PolicyViolation::InvalidPackageName.to_string());
    assert_eq!(h.launcher.launches(), 0);
}

#[tokio::test]
async fn manager_outside_package_allowlist_is_refused() {
    let h = Harness::new();
    let mut policy = h.gateway.policy().clone();
    policy.package_managers.remove("yum");

    let engine = ExecutionEngine::new(h.launcher.clone(), ExecutionEnv::default());
    let result = engine.install_package(&policy, "htop", Some("rpm")).await;

    assert_eq!(result.exit_code, 1);
    assert_eq!(
        result.stderr,
        PolicyViolation::PackageManagerNotAllowed.to_string()
    );
    assert_eq!(h.launcher.launches(), 0);
}

#[tokio::test]
async fn missing_package_name_is_rejected() {
    let mut h = Harness::new();
    assert_eq!(
        h.call(json!({"method": "installPackage", "source": "debian"})).await,
        Outcome::Rejected(RequestError::MissingField("Package name is required"))
    );
}
