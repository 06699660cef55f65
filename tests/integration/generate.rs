use predicates::prelude::*;

use crate::common::{TestProject, ctrlgen};

#[test]
fn test_generate_creates_project() {
    let project = TestProject::new();
    let description = project.describe(&project.fixture().resource("Pod").resource("Deployment"));

    project
        .generate(&description)
        .success()
        .stdout(predicate::str::contains("created"))
        .stdout(predicate::str::contains("4 file(s) written"));

    let go_mod = project.read("go.mod");
    assert!(go_mod.starts_with("module example.com/podwatcher\n"));
    assert!(go_mod.contains("k8s.io/client-go v"));

    let main = project.read("main.go");
    assert!(main.contains("package main"));
    assert!(main.contains("NewController("));

    let controller = project.read("controller.go");
    assert!(controller.contains("corev1 \"k8s.io/api/core/v1\""));
    assert!(controller.contains("appsv1 \"k8s.io/api/apps/v1\""));

    let custom = project.read("custom.go");
    assert!(custom.contains("func (c *Controller) doSync(ctx context.Context, namespace, name string) error"));
    assert!(custom.contains("func (c *Controller) AddPod(obj interface{})"));
    assert!(custom.contains("func (c *Controller) DeleteDeployment(obj interface{})"));
}

#[test]
fn test_generate_uses_controller_name_as_receiver() {
    let project = TestProject::new();
    let description = project.describe(&project.fixture().name("PodWatcher").resource("Pod"));

    project.generate(&description).success();

    let custom = project.read("custom.go");
    assert!(custom.contains("func (c *PodWatcher) UpdatePod(oldObj, newObj interface{})"));
    assert!(!custom.contains("(c *Controller)"));
}

#[test]
fn test_generate_namespaced_controller() {
    let project = TestProject::new();
    let description =
        project.describe(&project.fixture().namespace("kube-system").resource("ConfigMap"));

    project.generate(&description).success();

    assert!(project.read("main.go").contains("\"kube-system\""));
}

#[test]
fn test_generate_local_type_with_deep_copy() {
    let project = TestProject::new();
    let description = project.describe(
        &project
            .fixture()
            .resource("Pod")
            .raw_resource("kind: Widget\ngroup: example.com\ngenDeepCopy: true"),
    );

    project.generate(&description).success();

    let deep_copy = project.read("widget_gen.deepcopy.go");
    assert!(deep_copy.contains("func (in *Widget) DeepCopyObject() runtime.Object"));
    assert!(project.read("custom.go").contains("func (c *Controller) AddWidget(obj interface{})"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let project = TestProject::new();
    let description = project.describe(&project.fixture().resource("Pod"));

    ctrlgen()
        .args(["generate", "--dry-run", "-f"])
        .arg(&description)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(!project.out_dir().exists());
}
