//! Failures must be reported on stderr with a non-zero exit, and must not
//! leave half-written output behind.

use predicates::prelude::*;
use std::fs;

use crate::common::{TestProject, ctrlgen};

#[test]
fn test_unknown_kind_writes_nothing() {
    let project = TestProject::new();
    let description = project.describe(&project.fixture().resource("Pod").resource("Frobnicator"));

    project
        .generate(&description)
        .failure()
        .stderr(predicate::str::contains("unknown resource kind: Frobnicator"));

    assert!(!project.out_dir().exists());
}

#[test]
fn test_empty_resource_list() {
    let project = TestProject::new();
    let description = project.describe(&project.fixture());

    project
        .generate(&description)
        .failure()
        .stderr(predicate::str::contains("no resource to control"));
}

#[test]
fn test_reserved_group_for_third_party_type() {
    let project = TestProject::new();
    let description =
        project.describe(&project.fixture().raw_resource("kind: Widget\ngroup: apps"));

    project
        .generate(&description)
        .failure()
        .stderr(predicate::str::contains("invalid third-party group 'apps'"));
}

#[test]
fn test_missing_description_file() {
    let project = TestProject::new();

    ctrlgen()
        .args(["generate", "--no-tidy", "-f"])
        .arg(project.root().join("absent.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.yaml"));
}

#[test]
fn test_malformed_yaml() {
    let project = TestProject::new();
    let path = project.root().join("controller.yaml");
    fs::write(&path, "resources: [kind: Pod\n").unwrap();

    project
        .generate(&path)
        .failure()
        .stderr(predicate::str::contains("invalid controller description"));
}

#[test]
fn test_unparseable_custom_file_is_left_untouched() {
    let project = TestProject::new();
    let description = project.describe(&project.fixture().resource("Pod"));
    project.generate(&description).success();

    let broken = "package main\n\nfunc (c *Controller) AddPod(obj interface{}) {\n\tif true {\n";
    project.write("custom.go", broken);

    project
        .generate(&description)
        .failure()
        .stderr(predicate::str::contains("failed to parse Go source"));

    assert_eq!(project.read("custom.go"), broken);
}
