//! Install/build runner with platform-specific post-step scripts.
//!
//! A run performs the standard packaging step unmodified, then looks for a
//! post-step script named after the step and platform (for example
//! `post_install_linux.sh`) in the configured scripts directory and runs it.
//! A missing script is only a notice. A failing script or packaging step
//! ends the build with a non-zero exit code.

use anyhow::{Context, Result};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::config::{resolve_path, BuildEnv, HookSettings};
use crate::ui;

/// Environment variable carrying the setup metadata path to the packaging step
pub const METADATA_ENV_VAR: &str = "AGBUILD_SETUP_METADATA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Install,
    Build,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Build => "build",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Windows => "windows",
        }
    }

    fn script_extension(&self) -> &'static str {
        match self {
            Self::Windows => "bat",
            _ => "sh",
        }
    }

    /// Program and leading arguments that execute a script on this platform
    fn interpreter(&self) -> &'static [&'static str] {
        match self {
            Self::Windows => &["cmd", "/C"],
            _ => &["bash"],
        }
    }
}

/// Script file name for a step on a platform, e.g. `post_build_macos.sh`
pub fn script_name(step: Step, platform: Platform) -> String {
    format!(
        "post_{}_{}.{}",
        step.as_str(),
        platform.as_str(),
        platform.script_extension()
    )
}

/// Switches for one runner invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookOptions {
    /// Release build, exported to children as `AGBUILD_RELEASE`
    pub release: bool,
    /// Lite build, exported to children as `AGBUILD_LITE`
    pub lite: bool,
    /// Bootstrap the package manager before failing on a script error
    pub bootstrap_pm: bool,
    /// Send child output to a log file instead of the console
    pub log_to_file: bool,
    /// Run only the post-step script
    pub skip_standard: bool,
}

impl HookOptions {
    pub fn from_env(env: &BuildEnv) -> Self {
        Self {
            release: env.release,
            lite: env.lite,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub enum HookError {
    Spawn {
        program: String,
        source: std::io::Error,
    },
    StandardStepFailed {
        command: String,
        code: Option<i32>,
    },
    ScriptFailed {
        script: PathBuf,
        code: Option<i32>,
        signal: Option<String>,
    },
    BootstrapFailed {
        command: String,
        code: Option<i32>,
    },
}

impl HookError {
    /// Process exit code to report for this failure
    pub fn exit_code(&self) -> i32 {
        let code = match self {
            HookError::Spawn { .. } => None,
            HookError::StandardStepFailed { code, .. }
            | HookError::ScriptFailed { code, .. }
            | HookError::BootstrapFailed { code, .. } => *code,
        };
        code.filter(|c| *c != 0).unwrap_or(1)
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookError::Spawn { program, source } => {
                write!(f, "Failed to start '{}': {}", program, source)
            }
            HookError::StandardStepFailed { command, code } => {
                write!(f, "Standard step '{}' failed ({})", command, describe(*code, None))
            }
            HookError::ScriptFailed {
                script,
                code,
                signal,
            } => write!(
                f,
                "Post-step script {} failed ({})",
                script.display(),
                describe(*code, signal.as_deref())
            ),
            HookError::BootstrapFailed { command, code } => write!(
                f,
                "Package manager bootstrap '{}' failed ({})",
                command,
                describe(*code, None)
            ),
        }
    }
}

impl std::error::Error for HookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HookError::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn describe(code: Option<i32>, signal: Option<&str>) -> String {
    match (code, signal) {
        (Some(code), _) => format!("exit code {}", code),
        (None, Some(signal)) => format!("terminated by {}", signal),
        (None, None) => "no exit code".to_string(),
    }
}

#[cfg(unix)]
fn signal_name(status: &ExitStatus) -> Option<String> {
    use std::os::unix::process::ExitStatusExt;

    let sig = status.signal()?;
    Some(
        nix::sys::signal::Signal::try_from(sig)
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|_| format!("signal {}", sig)),
    )
}

#[cfg(not(unix))]
fn signal_name(_status: &ExitStatus) -> Option<String> {
    None
}

/// Log file shared by every child process of one run.
pub struct HookLog {
    file: File,
    path: PathBuf,
}

impl HookLog {
    /// Create `<log_dir>/<step>.log` and write the header.
    pub fn create(log_dir: &Path, step: Step, platform: Platform) -> Result<Self> {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

        let path = log_dir.join(format!("{}.log", step.as_str()));
        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;

        writeln!(file, "# agbuild {} log", step)?;
        writeln!(file, "# Started: {}", crate::local_now_iso())?;
        writeln!(file, "# Platform: {}", platform.as_str())?;
        file.flush()?;

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn section(&mut self, title: &str) -> Result<()> {
        writeln!(self.file)?;
        writeln!(self.file, "## {}", title)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }

    fn stdio(&self) -> Result<(Stdio, Stdio)> {
        let out = self.file.try_clone().context("Failed to share log file")?;
        let err = self.file.try_clone().context("Failed to share log file")?;
        Ok((Stdio::from(out), Stdio::from(err)))
    }
}

/// What happened after the standard step succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    ScriptCompleted {
        script: PathBuf,
        log: Option<PathBuf>,
    },
    ScriptMissing {
        expected: PathBuf,
    },
}

pub struct HookRunner<'a> {
    root: PathBuf,
    settings: &'a HookSettings,
    options: HookOptions,
    platform: Platform,
}

impl<'a> HookRunner<'a> {
    pub fn new(root: &Path, settings: &'a HookSettings, options: HookOptions) -> Self {
        Self {
            root: root.to_path_buf(),
            settings,
            options,
            platform: Platform::current(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn script_path(&self, step: Step) -> Result<PathBuf> {
        let dir = resolve_path(&self.root, &self.settings.scripts_dir)?;
        Ok(dir.join(script_name(step, self.platform)))
    }

    /// Standard step, then the post-step script.
    pub fn run(&self, step: Step, metadata_path: Option<&Path>) -> Result<HookOutcome> {
        let mut log = if self.options.log_to_file {
            let dir = resolve_path(&self.root, &self.settings.log_dir)?;
            let log = HookLog::create(&dir, step, self.platform)?;
            ui::info(&format!("Writing {} output to {}", step, log.path().display()));
            Some(log)
        } else {
            None
        };

        if self.options.skip_standard {
            ui::notice(&format!("Skipping standard {} step", step));
        } else {
            self.run_standard_step(step, metadata_path, log.as_mut())?;
        }

        self.run_post_script(step, log.as_mut())
    }

    pub fn run_standard_step(
        &self,
        step: Step,
        metadata_path: Option<&Path>,
        log: Option<&mut HookLog>,
    ) -> Result<()> {
        let argv = match step {
            Step::Install => &self.settings.install_command,
            Step::Build => &self.settings.build_command,
        };
        let argv = expand_args(argv);
        let display = argv.join(" ");

        ui::info(&format!("Running standard {} step: {}", step, display));

        let mut extra_env = Vec::new();
        if let Some(path) = metadata_path {
            extra_env.push((METADATA_ENV_VAR, path.display().to_string()));
        }

        let status = self.run_command(&argv, &extra_env, log, "standard step")?;
        if !status.success() {
            return Err(HookError::StandardStepFailed {
                command: display,
                code: status.code(),
            }
            .into());
        }
        Ok(())
    }

    /// Run the platform script for `step` if it exists.
    pub fn run_post_script(&self, step: Step, mut log: Option<&mut HookLog>) -> Result<HookOutcome> {
        let script = self.script_path(step)?;
        if !script.is_file() {
            ui::notice(&format!(
                "No post-{} script for {} at {}, skipping",
                step,
                self.platform.as_str(),
                script.display()
            ));
            return Ok(HookOutcome::ScriptMissing { expected: script });
        }

        ui::info(&format!("Running post-{} script {}", step, script.display()));

        let mut argv: Vec<String> = self
            .platform
            .interpreter()
            .iter()
            .map(|s| s.to_string())
            .collect();
        argv.push(script.display().to_string());

        let status = self.run_command(&argv, &[], log.as_deref_mut(), "post-step script")?;
        if !status.success() {
            let failure = HookError::ScriptFailed {
                script: script.clone(),
                code: status.code(),
                signal: signal_name(&status),
            };
            ui::error(&failure.to_string());

            if self.options.bootstrap_pm {
                self.bootstrap_package_manager(log)?;
            }
            return Err(failure.into());
        }

        ui::success(&format!("Post-{} script finished", step));
        Ok(HookOutcome::ScriptCompleted {
            script,
            log: log.map(|l| l.path().to_path_buf()),
        })
    }

    /// Make sure a package manager is present and current. Any failing
    /// command is fatal.
    pub fn bootstrap_package_manager(&self, mut log: Option<&mut HookLog>) -> Result<()> {
        for command in &self.settings.bootstrap_commands {
            let argv = expand_args(command);
            let display = argv.join(" ");
            ui::info(&format!("Bootstrapping package manager: {}", display));

            let status = self.run_command(&argv, &[], log.as_deref_mut(), "bootstrap")?;
            if !status.success() {
                return Err(HookError::BootstrapFailed {
                    command: display,
                    code: status.code(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn run_command(
        &self,
        argv: &[String],
        extra_env: &[(&str, String)],
        log: Option<&mut HookLog>,
        label: &str,
    ) -> Result<ExitStatus> {
        let (program, args) = argv
            .split_first()
            .context("Command line is empty")?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&self.root)
            .env("AGBUILD_RELEASE", flag(self.options.release))
            .env("AGBUILD_LITE", flag(self.options.lite));
        for (key, value) in extra_env {
            cmd.env(key, value);
        }

        let mut log = log;
        if let Some(log) = log.as_deref_mut() {
            log.section(&format!("{}: {}", label, argv.join(" ")))?;
            let (out, err) = log.stdio()?;
            cmd.stdout(out).stderr(err);
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }

        let mut child = cmd.spawn().map_err(|source| HookError::Spawn {
            program: program.clone(),
            source,
        })?;

        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for '{}'", program))?;

        if let Some(log) = log {
            log.write_line(&format!("# {} exited: {}", label, status))?;
        }

        Ok(status)
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Expand a leading `~` in each argument. `$VAR` is left for the child.
fn expand_args(argv: &[String]) -> Vec<String> {
    argv.iter()
        .map(|arg| shellexpand::tilde(arg).into_owned())
        .collect()
}
