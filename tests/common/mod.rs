//! Shared sandbox for end-to-end runs of the `ir-test` binary.
//!
//! Each sandbox is a temporary source tree (`src/tests/*.irt`) plus a build
//! directory holding a shell-script stand-in for the `ir` binary.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const STUB_TARGET: &str = "x86_64";

pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create sandbox");
        fs::create_dir_all(dir.path().join("src/tests")).expect("create tests dir");
        fs::create_dir_all(dir.path().join("build")).expect("create build dir");
        Self { dir }
    }

    pub fn tests_dir(&self) -> PathBuf {
        self.dir.path().join("src/tests")
    }

    /// Writes a fixture below `src/tests` and returns its path.
    pub fn fixture(&self, rel: &str, text: &str) -> PathBuf {
        let path = self.tests_dir().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture dir");
        }
        fs::write(&path, text).expect("write fixture");
        path
    }

    /// Installs `build/ir`, answering `--target` with [`STUB_TARGET`] and
    /// running `body` for every fixture.
    #[cfg(unix)]
    pub fn stub(&self, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.dir.path().join("build/ir");
        let script = format!(
            "#!/bin/sh\nif [ \"$1\" = \"--target\" ]; then echo {STUB_TARGET}; exit 0; fi\n{body}\n"
        );
        fs::write(&path, script).expect("write stub");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod stub");
    }

    /// `ir-test` pointed at this sandbox through the environment.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("ir-test").expect("ir-test binary");
        cmd.env("BUILD_DIR", self.dir.path().join("build"))
            .env("SRC_DIR", self.dir.path().join("src"))
            .env_remove("IR_TEST_TIMEOUT")
            .arg("--no-color");
        cmd
    }

    /// File names in the directory of `fixture`, sorted.
    pub fn files_beside(&self, fixture: &Path) -> Vec<String> {
        let dir = fixture.parent().expect("fixture has a parent");
        let mut names: Vec<_> = fs::read_dir(dir)
            .expect("read fixture dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
