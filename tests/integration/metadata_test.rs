//! Setup metadata assembly through the CLI

use crate::support::{stderr, stdout, TestHarness};
use serde_json::Value;

fn metadata(harness: &TestHarness, args: &[&str], vars: &[(&str, &str)]) -> Value {
    let output = harness
        .run_with_env(args, vars)
        .expect("Failed to run agbuild");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    serde_json::from_str(&stdout(&output)).expect("Invalid metadata JSON")
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("Expected array")
        .iter()
        .map(|v| v.as_str().expect("Expected string").to_string())
        .collect()
}

#[test]
fn test_metadata_top_level_nightly() {
    let harness = TestHarness::new();
    harness.pin_suffix("b20240101");

    let meta = metadata(&harness, &["metadata"], &[]);

    assert_eq!(meta["name"], "autogluon");
    assert_eq!(meta["version"], "1.2.0b20240101");
    assert_eq!(meta["classifiers"][0], "Development Status :: 4 - Beta");
    assert_eq!(meta["long_description"], "# AutoGluon\n\nAutoML for everyone.\n");
    assert_eq!(meta["long_description_content_type"], "text/markdown");
    assert_eq!(meta["package_dir"][""], "core/src");
    assert_eq!(
        strings(&meta["packages"]),
        vec!["autogluon", "autogluon.common", "autogluon.core"]
    );
    assert!(strings(&meta["install_requires"]).contains(&"autogluon.core==1.2.0b20240101".to_string()));

    // Preparing metadata also stamps the version file
    assert!(harness
        .read("core/src/autogluon/version.py")
        .contains("1.2.0b20240101"));
}

#[test]
fn test_metadata_release_is_stable() {
    let harness = TestHarness::new();

    let meta = metadata(&harness, &["metadata"], &[("RELEASE", "yes")]);

    assert_eq!(meta["version"], "1.2.0");
    assert_eq!(
        meta["classifiers"][0],
        "Development Status :: 5 - Production/Stable"
    );
}

#[test]
fn test_metadata_submodule() {
    let harness = TestHarness::new();
    harness.write("tabular/src/autogluon/tabular/__init__.py", "");
    harness.write("tabular/src/autogluon/tabular/models/__init__.py", "");

    let meta = metadata(
        &harness,
        &["metadata", "--submodule", "tabular"],
        &[("RELEASE", "1")],
    );

    assert_eq!(meta["name"], "autogluon.tabular");
    assert_eq!(meta["package_dir"][""], "src");
    assert_eq!(
        strings(&meta["packages"]),
        vec!["autogluon.tabular", "autogluon.tabular.models"]
    );
    assert_eq!(
        strings(&meta["install_requires"]),
        vec!["numpy>=1.25.0,<2.1.4", "scipy>=1.5.4,<1.16"]
    );
    assert!(harness
        .read("core/src/autogluon/tabular/version.py")
        .contains("__version__ = '1.2.0'"));
}

#[test]
fn test_metadata_written_to_file() {
    let harness = TestHarness::new();

    let output = harness
        .run(&["metadata", "-o", "out/setup.json"])
        .expect("Failed to run agbuild");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());

    let meta: Value =
        serde_json::from_str(&harness.read("out/setup.json")).expect("Invalid metadata JSON");
    assert_eq!(meta["name"], "autogluon");
}

#[test]
fn test_metadata_missing_readme_fails() {
    let harness = TestHarness::new();
    std::fs::remove_file(harness.path().join("README.md")).expect("Failed to remove README");

    let output = harness.run(&["metadata"]).expect("Failed to run agbuild");

    assert!(!output.status.success());
    assert!(stderr(&output).contains("README.md"));
}

#[test]
fn test_metadata_settings_override_package_fields() {
    let harness = TestHarness::new();
    harness.write(
        "agbuild.yaml",
        "package:\n  author: Test Author\n  python_requires: \">=3.10\"\n",
    );

    let meta = metadata(&harness, &["metadata"], &[]);

    assert_eq!(meta["author"], "Test Author");
    assert_eq!(meta["python_requires"], ">=3.10");
    assert_eq!(meta["license"], "Apache-2.0");
}

#[test]
fn test_metadata_rejects_invalid_settings() {
    let harness = TestHarness::new();
    harness.write("agbuild.yaml", "hooks:\n  install_command: []\n");

    let output = harness.run(&["metadata"]).expect("Failed to run agbuild");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("agbuild.yaml"));
}
