use predicates::prelude::*;

use crate::common::{TestProject, ctrlgen};

#[test]
fn test_validate_text_output() {
    let project = TestProject::new();
    let description = project.describe(&project.fixture().resource("Pod").resource("Ingress"));

    ctrlgen()
        .args(["validate", "-f"])
        .arg(&description)
        .assert()
        .success()
        .stdout(predicate::str::contains("corev1.Pod"))
        .stdout(predicate::str::contains("k8s.io/api/networking/v1"))
        .stdout(predicate::str::contains("configuration is valid"));

    assert!(!project.out_dir().exists());
}

#[test]
fn test_validate_json_output() {
    let project = TestProject::new();
    let description = project.describe(
        &project
            .fixture()
            .resource("Pod")
            .raw_resource("kind: Gizmo\npackage: example.com/forks/gizmo"),
    );

    let output = ctrlgen()
        .args(["validate", "--format", "json", "-f"])
        .arg(&description)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], true);
    assert_eq!(report["name"], "Controller");
    assert_eq!(report["resources"].as_array().unwrap().len(), 2);
    assert_eq!(report["resources"][0]["qualified_type"], "corev1.Pod");
    assert_eq!(report["warnings"][0]["type"], "no_version_in_package");
    assert_eq!(report["warnings"][0]["kind"], "Gizmo");
}

#[test]
fn test_validate_json_reports_failure() {
    let project = TestProject::new();
    let description = project.describe(&project.fixture().resource("Frobnicator"));

    let output = ctrlgen()
        .args(["validate", "--format", "json", "-f"])
        .arg(&description)
        .output()
        .unwrap();
    assert!(!output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["config_error"], true);
    assert!(report["error"].as_str().unwrap().contains("Frobnicator"));
}

#[test]
fn test_validate_json_unreadable_description_is_not_a_config_error() {
    let project = TestProject::new();

    let output = ctrlgen()
        .args(["validate", "--format", "json", "-f"])
        .arg(project.root().join("absent.yaml"))
        .output()
        .unwrap();
    assert!(!output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["config_error"], false);
}
