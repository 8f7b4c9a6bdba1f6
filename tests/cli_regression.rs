// Regression test: fatal CLI errors are rendered as miette diagnostics
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

#[test]
fn missing_binary_aborts_with_target_query_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("tests")).unwrap();
    std::fs::write(
        dir.path().join("tests/add.irt"),
        "--TEST--\nAdd\n--CODE--\n1+1\n--EXPECT--\n2\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("ir-test").unwrap();
    cmd.env("BUILD_DIR", dir.path().join("no-build"))
        .env("SRC_DIR", dir.path())
        .arg("--no-color");
    cmd.assert()
        .code(1)
        .stderr(contains("ir_test::target_query").or(contains("could not query the target")))
        .stdout(contains("PASS").not());

    // Nothing was executed, so no scratch files exist.
    assert!(!dir.path().join("tests/add.ir").exists());
}

#[test]
fn help_lists_environment_overrides() {
    let mut cmd = Command::cargo_bin("ir-test").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("BUILD_DIR").and(contains("SRC_DIR")).and(contains("--show-diff")));
}
