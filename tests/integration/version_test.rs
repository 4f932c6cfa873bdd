//! Version resolution and stamping through the CLI

use crate::support::{stderr, stdout, TestHarness, BASE_VERSION};

#[test]
fn test_version_uses_cached_suffix() {
    let harness = TestHarness::new();
    harness.pin_suffix("b20240101\n");

    let output = harness.run(&["version"]).expect("Failed to run agbuild");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "1.2.0b20240101");
}

#[test]
fn test_version_release_has_no_suffix() {
    let harness = TestHarness::new();
    harness.pin_suffix("b20240101");

    let output = harness
        .run_with_env(&["version"], &[("RELEASE", "1")])
        .expect("Failed to run agbuild");

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), BASE_VERSION);
}

#[test]
fn test_version_empty_release_is_nightly() {
    let harness = TestHarness::new();
    harness.pin_suffix("b20240101");

    let output = harness
        .run_with_env(&["version"], &[("RELEASE", "")])
        .expect("Failed to run agbuild");

    assert_eq!(stdout(&output).trim(), "1.2.0b20240101");
}

#[test]
fn test_version_no_cache_uses_date_suffix() {
    let harness = TestHarness::new();
    harness.pin_suffix("b19990101");

    let output = harness
        .run(&["version", "--no-cache"])
        .expect("Failed to run agbuild");
    let version = stdout(&output).trim().to_string();

    assert!(version.starts_with("1.2.0b"), "got {}", version);
    assert_ne!(version, "1.2.0b19990101");
    // b + YYYYMMDD
    assert_eq!(version.len(), BASE_VERSION.len() + 9);
}

#[test]
fn test_version_write_cache_is_reused() {
    let harness = TestHarness::new();

    let first = harness
        .run(&["version", "--write-cache"])
        .expect("Failed to run agbuild");
    assert!(first.status.success());

    let cached = harness.read("core/src/autogluon/VERSION.minor");
    assert!(cached.starts_with('b'));

    let second = harness.run(&["version"]).expect("Failed to run agbuild");
    assert_eq!(stdout(&first), stdout(&second));
    assert_eq!(stdout(&second).trim(), format!("{}{}", BASE_VERSION, cached.trim()));
}

#[test]
fn test_version_missing_file_fails() {
    let harness = TestHarness::new();
    std::fs::remove_file(harness.path().join("core/src/autogluon/VERSION"))
        .expect("Failed to remove VERSION");

    let output = harness.run(&["version"]).expect("Failed to run agbuild");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("VERSION"));
}

#[test]
fn test_stamp_writes_namespace_version_file() {
    let harness = TestHarness::new();
    harness.pin_suffix("b20240101");

    let output = harness.run(&["stamp"]).expect("Failed to run agbuild");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let stamp = harness.read("core/src/autogluon/version.py");
    assert!(stamp.contains("__version__ = '1.2.0b20240101'"));
    assert!(stamp.contains("__lite__ = False"));
}

#[test]
fn test_stamp_submodule_in_lite_mode() {
    let harness = TestHarness::new();

    let output = harness
        .run_with_env(
            &["stamp", "--submodule", "tabular"],
            &[("RELEASE", "1"), ("AUTOGLUON_PACKAGE_NAME", "autogluon-lite")],
        )
        .expect("Failed to run agbuild");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let stamp = harness.read("core/src/autogluon/tabular/version.py");
    assert!(stamp.contains("__version__ = '1.2.0'"));
    assert!(stamp.contains("__lite__ = True"));
}

#[test]
fn test_stamp_rejects_path_like_submodule() {
    let harness = TestHarness::new();

    let output = harness
        .run(&["stamp", "--submodule", "../escape"])
        .expect("Failed to run agbuild");

    assert!(!output.status.success());
    assert!(!harness.path().join("core/src/escape").exists());
}

#[test]
fn test_quiet_hides_progress() {
    let harness = TestHarness::new();
    harness.pin_suffix("b20240101");

    let output = harness
        .run(&["--quiet", "stamp"])
        .expect("Failed to run agbuild");

    assert!(output.status.success());
    assert!(!stderr(&output).contains("Building version"));
    assert_eq!(stdout(&output).trim(), "1.2.0b20240101");
}

#[test]
fn test_self_version_verbose() {
    let harness = TestHarness::new();

    let output = harness
        .run(&["self-version", "--verbose"])
        .expect("Failed to run agbuild");

    let out = stdout(&output);
    assert!(out.starts_with(&format!("agbuild {}", env!("CARGO_PKG_VERSION"))));
    assert!(out.contains("commit: "));
    assert!(out.contains("built: "));
}

#[test]
fn test_completion_generates_script() {
    let harness = TestHarness::new();

    let output = harness
        .run(&["completion", "bash"])
        .expect("Failed to run agbuild");

    assert!(output.status.success());
    assert!(stdout(&output).contains("agbuild"));
}
