//! Common helpers for ctrlgen integration tests

// Not every helper is used by every test module
#![allow(dead_code)]

use assert_cmd::Command;
use ctrlgen_cli::test_utils::ControllerFixture;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary workspace holding a description file and its output directory.
pub struct TestProject {
    temp_dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Output directory named by `base:` in descriptions from [`Self::fixture`].
    pub fn out_dir(&self) -> PathBuf {
        self.root().join("out")
    }

    pub fn fixture(&self) -> ControllerFixture {
        ControllerFixture::new(self.out_dir())
    }

    /// Write `fixture` as the project's description and return its path.
    pub fn describe(&self, fixture: &ControllerFixture) -> PathBuf {
        fixture.write_to(self.root()).expect("write description")
    }

    pub fn out_file(&self, name: &str) -> PathBuf {
        self.out_dir().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.out_file(name))
            .unwrap_or_else(|e| panic!("read {name}: {e}"))
    }

    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.out_file(name), content).unwrap_or_else(|e| panic!("write {name}: {e}"));
    }

    /// `ctrlgen generate -f <description> --no-tidy`
    pub fn generate(&self, description: &Path) -> assert_cmd::assert::Assert {
        ctrlgen()
            .args(["generate", "--no-tidy", "-f"])
            .arg(description)
            .assert()
    }
}

pub fn ctrlgen() -> Command {
    let mut cmd = Command::cargo_bin("ctrlgen").expect("ctrlgen binary");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}
