// Fixture discovery and parsing through the public API.
use std::fs;

use ir_test::discovery::discover_fixtures;
use ir_test::{Fixture, HarnessError};

#[test]
fn discovers_and_parses_a_fixture_tree() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("x86")).unwrap();
    fs::create_dir_all(root.join("common")).unwrap();
    fs::write(
        root.join("x86/call.irt"),
        "--TEST--\nCall\n--TARGET--\nx86_64\n--ARGS--\n-S\n--CODE--\ncall\n--EXPECT--\nok\n",
    )
    .unwrap();
    fs::write(root.join("common/add.irt"), "--TEST--\nAdd\n--CODE--\n1+1\n--EXPECT--\n2\n").unwrap();
    fs::write(root.join("common/missing.irt"), "--TEST--\nMissing\n--CODE--\nx\n").unwrap();
    fs::write(root.join("common/add.out"), "stale").unwrap();

    let paths = discover_fixtures(root);
    assert_eq!(
        paths,
        vec![
            root.join("common/add.irt"),
            root.join("common/missing.irt"),
            root.join("x86/call.irt"),
        ]
    );
    assert_eq!(paths, discover_fixtures(root));

    let add = Fixture::parse(&paths[0]).unwrap();
    assert_eq!((add.name.as_str(), add.args.as_str()), ("Add", "--save"));

    let missing = Fixture::parse(&paths[1]).unwrap_err();
    assert!(matches!(missing, HarnessError::MalformedFixture { .. }));

    let call = Fixture::parse(&paths[2]).unwrap();
    assert_eq!(call.target.as_deref(), Some("x86_64"));
    assert_eq!(call.arg_list(), vec!["-S"]);
}

#[test]
fn unreadable_fixture_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let err = Fixture::parse(dir.path().join("gone.irt")).unwrap_err();
    assert_eq!(err.error_type(), ir_test::ErrorType::Malformed);
}
