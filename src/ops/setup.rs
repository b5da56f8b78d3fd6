//! Implementation of `umpkg setup`.
//!
//! Checks that the packaging tools are installed and writes a global config
//! file when none exists yet.
//!
//! ## Checks Performed
//!
//! - `rpmbuild` and `mock` (the configured backend's tool is required)
//! - `koji` for `umpkg push`
//! - `rpmdev-newspec` for `umpkg init --spec`
//! - `git`

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::shim::BackendAvailability;
use crate::builder::BackendRegistry;
use crate::util::process::find_executable;
use crate::util::{Config, GlobalContext};

/// Result of a single tool check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Tool name
    pub name: String,

    /// Whether the tool was found
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Where the tool was found
    pub path: Option<PathBuf>,

    /// Whether a missing tool makes the setup fail
    pub required: bool,
}

impl CheckResult {
    pub fn pass(name: impl Into<String>, path: PathBuf) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: format!("found at {}", path.display()),
            path: Some(path),
            required: true,
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: false,
            message: message.into(),
            path: None,
            required: true,
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Everything `umpkg setup` found and did.
#[derive(Debug, Clone, Default)]
pub struct SetupReport {
    pub checks: Vec<CheckResult>,

    /// Global config written by this run, if there was none
    pub config_written: Option<PathBuf>,
}

impl SetupReport {
    /// Check if all required checks passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }
}

/// Look a tool up in PATH.
pub fn check_tool(name: &str, hint: &str, required: bool) -> CheckResult {
    let result = match find_executable(name) {
        Some(path) => CheckResult::pass(name, path),
        None => CheckResult::fail(name, format!("not found in PATH\n      hint: {}", hint)),
    };
    if required {
        result
    } else {
        result.optional()
    }
}

/// Run the setup checks and write the global config if missing.
pub fn setup(ctx: &GlobalContext) -> Result<SetupReport> {
    let config = ctx.load_config();
    let backend = config.backend()?;

    let registry = BackendRegistry::new(&config.backend_config(ctx.cwd()));

    let mut report = SetupReport::default();
    for (id, availability) in registry.check_all() {
        let check = match availability {
            BackendAvailability::Available { path } => CheckResult::pass(id.tool(), path),
            BackendAvailability::NotInstalled { tool, install_hint } => CheckResult::fail(
                tool,
                format!("not found in PATH\n      hint: {}", install_hint),
            ),
        };
        report
            .checks
            .push(if id == backend { check } else { check.optional() });
    }
    report.checks.push(check_tool(
        "koji",
        "install with `dnf install koji`",
        false,
    ));
    report.checks.push(check_tool(
        "rpmdev-newspec",
        "install with `dnf install rpmdevtools`",
        false,
    ));
    report
        .checks
        .push(check_tool("git", "install with `dnf install git`", false));

    let config_path = ctx.config_path();
    if !config_path.exists() {
        Config::template().save(&config_path)?;
        tracing::info!("Wrote default config to {}", config_path.display());
        report.config_written = Some(config_path);
    }

    Ok(report)
}

/// Format the setup report for display.
pub fn format_report(report: &SetupReport) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    let _ = writeln!(output, "Checks:");
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };
        let _ = writeln!(output, "  {} {}{}", status, check.name, required);
        let _ = writeln!(output, "      {}", check.message);
    }

    if let Some(path) = &report.config_written {
        let _ = writeln!(output, "\nWrote default config to {}", path.display());
    }

    let required_failed = report.required_failed_count();
    if required_failed > 0 {
        let _ = writeln!(
            output,
            "\n{} required tool(s) missing. Builds will fail until they are installed.",
            required_failed
        );
    } else {
        let _ = writeln!(output, "\numpkg is ready to use.");
    }

    output
}
