//! Install and build hooks through the CLI

use crate::support::{stderr, TestHarness};

const SETTINGS: &str = r#"hooks:
  install_command: ["sh", "-c", "echo installed > installed.txt"]
  build_command: ["sh", "-c", "cp \"$AGBUILD_SETUP_METADATA\" built.json"]
"#;

fn harness_with_hooks() -> TestHarness {
    let harness = TestHarness::new();
    harness.write("agbuild.yaml", SETTINGS);
    harness.pin_suffix("b20240101");
    harness
}

#[test]
#[cfg_attr(not(target_os = "linux"), ignore = "Uses the linux post-step script")]
fn test_install_runs_standard_step_then_script() {
    let harness = harness_with_hooks();
    harness.write(
        "post_install_linux.sh",
        "test -f installed.txt || exit 9\necho \"lite=$AGBUILD_LITE release=$AGBUILD_RELEASE\" > hook.txt\n",
    );

    let output = harness.run(&["install"]).expect("Failed to run agbuild");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(harness.read("hook.txt").trim(), "lite=0 release=0");
    assert!(harness.path().join("build/agbuild-setup.json").is_file());
    assert!(harness.read("core/src/autogluon/version.py").contains("1.2.0b20240101"));
}

#[test]
#[cfg_attr(not(target_os = "linux"), ignore = "Uses the linux post-step script")]
fn test_install_exports_lite_and_release() {
    let harness = harness_with_hooks();
    harness.write(
        "post_install_linux.sh",
        "echo \"lite=$AGBUILD_LITE release=$AGBUILD_RELEASE\" > hook.txt\n",
    );

    let output = harness
        .run_with_env(
            &["install"],
            &[("RELEASE", "1"), ("AUTOGLUON_PACKAGE_NAME", "autogluon-lite")],
        )
        .expect("Failed to run agbuild");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(harness.read("hook.txt").trim(), "lite=1 release=1");
}

#[test]
#[cfg_attr(not(target_os = "linux"), ignore = "Uses the linux post-step script")]
fn test_install_missing_script_succeeds() {
    let harness = harness_with_hooks();

    let output = harness.run(&["install"]).expect("Failed to run agbuild");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(harness.path().join("installed.txt").is_file());
    assert!(stderr(&output).contains("post_install_linux.sh"));
}

#[test]
#[cfg_attr(not(target_os = "linux"), ignore = "Uses the linux post-step script")]
fn test_install_script_failure_propagates_exit_code() {
    let harness = harness_with_hooks();
    harness.write("post_install_linux.sh", "exit 7\n");

    let output = harness.run(&["install"]).expect("Failed to run agbuild");

    assert_eq!(output.status.code(), Some(7));
    assert!(stderr(&output).contains("post_install_linux.sh"));
}

#[test]
#[cfg_attr(not(target_os = "linux"), ignore = "Uses the linux post-step script")]
fn test_install_standard_failure_skips_script() {
    let harness = TestHarness::new();
    harness.write("agbuild.yaml", "hooks:\n  install_command: [\"sh\", \"-c\", \"exit 4\"]\n");
    harness.write("post_install_linux.sh", "touch hook-ran\n");

    let output = harness.run(&["install"]).expect("Failed to run agbuild");

    assert_eq!(output.status.code(), Some(4));
    assert!(!harness.path().join("hook-ran").exists());
}

#[test]
#[cfg_attr(not(target_os = "linux"), ignore = "Uses the linux post-step script")]
fn test_install_skip_standard_with_log_file() {
    let harness = harness_with_hooks();
    harness.write("post_install_linux.sh", "echo from-hook\n");

    let output = harness
        .run(&["install", "--skip-standard", "--log-file"])
        .expect("Failed to run agbuild");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(!harness.path().join("installed.txt").exists());

    let log = harness.read(".agbuild/logs/install.log");
    assert!(log.starts_with("# agbuild install log"));
    assert!(log.contains("from-hook"));
}

#[test]
#[cfg_attr(not(target_os = "linux"), ignore = "Uses the linux post-step script")]
fn test_build_receives_metadata_path() {
    let harness = harness_with_hooks();
    harness.write("post_build_linux.sh", "test -f built.json\n");

    let output = harness
        .run(&["build", "--metadata-output", "dist/meta.json"])
        .expect("Failed to run agbuild");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let built: serde_json::Value =
        serde_json::from_str(&harness.read("built.json")).expect("Invalid metadata JSON");
    assert_eq!(built["version"], "1.2.0b20240101");
    assert!(harness.path().join("dist/meta.json").is_file());
}

#[test]
#[cfg_attr(not(target_os = "linux"), ignore = "Uses the linux post-step script")]
fn test_install_bootstrap_runs_before_failing() {
    let harness = TestHarness::new();
    harness.write(
        "agbuild.yaml",
        r#"hooks:
  install_command: ["true"]
  bootstrap_commands:
    - ["sh", "-c", "touch bootstrapped"]
"#,
    );
    harness.write("post_install_linux.sh", "exit 3\n");

    let output = harness
        .run(&["install", "--bootstrap-pm"])
        .expect("Failed to run agbuild");

    assert_eq!(output.status.code(), Some(3));
    assert!(harness.path().join("bootstrapped").exists());
}
