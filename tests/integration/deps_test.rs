//! Dependency aggregation and specifier validation through the CLI

use crate::support::{stderr, stdout, TestHarness};

fn lines(output: &std::process::Output) -> Vec<String> {
    stdout(output).lines().map(str::to_string).collect()
}

#[test]
fn test_deps_top_level_unions_submodules() {
    let harness = TestHarness::new();
    harness.pin_suffix("b20240101");

    let output = harness.run(&["deps"]).expect("Failed to run agbuild");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        lines(&output),
        vec![
            "autogluon.core==1.2.0b20240101",
            "numpy>=1.25.0,<2.1.4",
            "pandas>=2.0.0,<2.3.0",
            "psutil>=5.7.3,<7.0.0",
            "scipy>=1.5.4,<1.16",
        ]
    );
    assert!(stderr(&output).contains("not a valid spec!"));
}

#[test]
fn test_deps_skips_excluded_directories() {
    let harness = TestHarness::new();
    harness.write("docs/setup.yaml", "install_requires:\n  - torch\n");
    harness.write("tests/unittests/setup.yaml", "install_requires:\n  - accelerate\n");
    harness.write("multimodal/setup.yaml", "install_requires:\n  - lightning\n");

    let output = harness.run(&["deps"]).expect("Failed to run agbuild");
    let deps = lines(&output);

    assert!(deps.contains(&"lightning>=2.2,<2.6".to_string()));
    assert!(!deps.iter().any(|d| d.starts_with("torch")));
    assert!(!deps.iter().any(|d| d.starts_with("accelerate")));
}

#[test]
fn test_deps_broken_descriptor_is_isolated() {
    let harness = TestHarness::new();
    harness.write("broken/setup.yaml", "install_requires: [unclosed\n");

    let output = harness.run(&["deps"]).expect("Failed to run agbuild");

    assert!(output.status.success());
    assert!(lines(&output).contains(&"pandas>=2.0.0,<2.3.0".to_string()));
    assert!(stderr(&output).contains("broken"));
}

#[test]
fn test_deps_submodule_only_own_descriptor() {
    let harness = TestHarness::new();

    let output = harness
        .run(&["deps", "--submodule", "tabular", "--json"])
        .expect("Failed to run agbuild");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let deps: Vec<String> = serde_json::from_str(&stdout(&output)).expect("Invalid JSON");
    assert_eq!(deps, vec!["numpy>=1.25.0,<2.1.4", "scipy>=1.5.4,<1.16"]);
}

#[test]
fn test_deps_lite_mode_drops_excluded_ranges() {
    let harness = TestHarness::new();

    let output = harness
        .run_with_env(&["deps"], &[("AUTOGLUON_PACKAGE_NAME", "autogluon.lite")])
        .expect("Failed to run agbuild");
    let deps = lines(&output);

    assert!(deps.contains(&"psutil".to_string()));
    assert!(!deps.contains(&"psutil>=5.7.3,<7.0.0".to_string()));
    assert!(deps.contains(&"numpy>=1.25.0,<2.1.4".to_string()));
}

#[test]
fn test_deps_extra_table_entries_from_settings() {
    let harness = TestHarness::new();
    harness.write(
        "agbuild.yaml",
        "dependencies:\n  extra:\n    scipy: \">=1.10,<1.12\"\n",
    );

    let output = harness
        .run(&["deps", "--submodule", "tabular"])
        .expect("Failed to run agbuild");

    assert!(lines(&output).contains(&"scipy>=1.10,<1.12".to_string()));
}

#[test]
fn test_validate_accepts_good_specifiers() {
    let harness = TestHarness::new();

    let output = harness
        .run(&["validate", "numpy>=1.25.0,<2.1.4", "transformers[sentencepiece]>=4.38.0,<5", "boto3"])
        .expect("Failed to run agbuild");

    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().count(), 3);
}

#[test]
fn test_validate_fails_on_bad_specifier() {
    let harness = TestHarness::new();

    let output = harness
        .run(&["validate", "numpy", "numpy = 1.0", ">=1.0"])
        .expect("Failed to run agbuild");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("2 of 3"));
}
