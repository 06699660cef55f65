//! Re-running `generate` against a project that already exists.

use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_rerun_leaves_custom_file_unchanged() {
    let project = TestProject::new();
    let description = project.describe(&project.fixture().resource("Pod"));
    project.generate(&description).success();
    let before = project.read("custom.go");

    project
        .generate(&description)
        .success()
        .stdout(predicate::str::contains("unchanged"));

    assert_eq!(project.read("custom.go"), before);
}

#[test]
fn test_go_mod_is_written_once() {
    let project = TestProject::new();
    let description = project.describe(&project.fixture().resource("Pod"));
    project.generate(&description).success();

    let edited = format!("{}\nrequire example.com/extra v1.0.0\n", project.read("go.mod"));
    project.write("go.mod", &edited);

    project
        .generate(&description)
        .success()
        .stdout(predicate::str::contains("skipped"));

    assert_eq!(project.read("go.mod"), edited);
}

#[test]
fn test_main_and_controller_are_regenerated() {
    let project = TestProject::new();
    let description = project.describe(&project.fixture().resource("Pod"));
    project.generate(&description).success();
    let pristine = project.read("controller.go");
    project.write("controller.go", "package main\n// stale\n");

    project.generate(&description).success();

    assert_eq!(project.read("controller.go"), pristine);
}

#[test]
fn test_added_resource_is_merged_into_edited_custom_file() {
    let project = TestProject::new();
    let description = project.describe(&project.fixture().resource("Pod"));
    project.generate(&description).success();

    let edited = project
        .read("custom.go")
        .replace("\treturn nil\n}", "\t// look up the pod and reconcile\n\treturn nil\n}");
    project.write("custom.go", &edited);

    let description =
        project.describe(&project.fixture().resource("Pod").resource("Service"));
    project
        .generate(&description)
        .success()
        .stdout(predicate::str::contains("merged"));

    let merged = project.read("custom.go");
    assert!(merged.contains("// look up the pod and reconcile"));
    assert!(merged.contains("corev1 \"k8s.io/api/core/v1\""));
    assert!(merged.contains("func (c *Controller) AddService(obj interface{})"));
    assert_eq!(merged.matches("func (c *Controller) AddPod(").count(), 1);
    assert_eq!(merged.matches("func (c *Controller) doSync(").count(), 1);

    // A third run with the same description is a no-op
    project.generate(&description).success();
    assert_eq!(project.read("custom.go"), merged);
}

#[test]
fn test_hand_written_methods_survive() {
    let project = TestProject::new();
    let description = project.describe(&project.fixture().resource("Pod"));
    project.generate(&description).success();

    let mut edited = project.read("custom.go");
    edited.push_str("\nfunc (c *Controller) helper() int {\n\treturn 42\n}\n");
    project.write("custom.go", &edited);

    project.generate(&description).success();

    assert_eq!(project.read("custom.go"), edited);
}
