// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step plans: which runner to use and the exact argument vector of each step.

use nodeaddon_config::BuildConfig;
use serde::Serialize;
use std::fmt;

/// Runner invoked on Windows hosts.
pub const WINDOWS_RUNNER: &str = "yarn.cmd";

/// Runner invoked on every other host.
pub const DEFAULT_RUNNER: &str = "yarn";

/// Host family, as far as runner and shell selection care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostPlatform {
    /// `std::env::consts::OS == "windows"`.
    Windows,
    /// Anything else.
    Other,
}

impl HostPlatform {
    /// Detect the platform this binary is running on.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier (as in `std::env::consts::OS`) to a platform.
    pub fn from_os(os: &str) -> Self {
        if os == "windows" {
            HostPlatform::Windows
        } else {
            HostPlatform::Other
        }
    }
}

/// One of the two build steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// `napi build ...`: compiles the addon, emits the `.d.ts` and loader.
    Napi,
    /// `tsc`: type-checks the generated declarations.
    Tsc,
}

impl StepKind {
    /// Short name used in diagnostics and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Napi => "napi",
            StepKind::Tsc => "tsc",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the runner: an explicit override wins, otherwise the platform default.
pub fn resolve_runner(override_runner: Option<&str>, platform: HostPlatform) -> String {
    match override_runner {
        Some(r) => r.to_string(),
        None => match platform {
            HostPlatform::Windows => WINDOWS_RUNNER.to_string(),
            HostPlatform::Other => DEFAULT_RUNNER.to_string(),
        },
    }
}

/// Build the napi argument vector: the fixed prefix, then `extra_args`
/// verbatim and in order.
pub fn napi_args(config: &BuildConfig, extra_args: &[String]) -> Vec<String> {
    let mut args: Vec<String> = vec!["napi".into(), "build".into()];
    if config.platform_flag {
        args.push("--platform".into());
    }
    if config.release {
        args.push("--release".into());
    }
    if !config.dts_header.is_empty() {
        args.push("--dts-header".into());
        args.push(config.dts_header.clone());
    }
    args.push("--dts".into());
    args.push(config.dts_file.clone());
    args.push("--js".into());
    args.push(config.js_file.clone());
    if !config.pipe.is_empty() {
        args.push("--pipe".into());
        args.push(config.pipe.clone());
    }
    args.extend(extra_args.iter().cloned());
    args
}

/// Argument vector of the type-check step.
pub fn tsc_args() -> Vec<String> {
    vec!["tsc".into()]
}

/// A single step ready to hand to an executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepPlan {
    /// Which step this is.
    pub step: StepKind,
    /// The runner executable.
    pub program: String,
    /// Arguments after the runner.
    pub args: Vec<String>,
}

impl StepPlan {
    /// The line handed to the shell: program and args joined by single
    /// spaces, with no quoting added.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Both steps of a build, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    /// Platform the plan was resolved for.
    pub platform: HostPlatform,
    /// The native build step.
    pub napi: StepPlan,
    /// The type-check step, absent when `type_check` is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tsc: Option<StepPlan>,
}

impl BuildPlan {
    /// Resolve a plan from config, host platform and forwarded arguments.
    pub fn new(config: &BuildConfig, platform: HostPlatform, extra_args: &[String]) -> Self {
        let runner = resolve_runner(config.runner.as_deref(), platform);
        let napi = StepPlan {
            step: StepKind::Napi,
            program: runner.clone(),
            args: napi_args(config, extra_args),
        };
        let tsc = config.type_check.then(|| StepPlan {
            step: StepKind::Tsc,
            program: runner,
            args: tsc_args(),
        });
        Self {
            platform,
            napi,
            tsc,
        }
    }

    /// Steps in the order they run.
    pub fn steps(&self) -> impl Iterator<Item = &StepPlan> {
        std::iter::once(&self.napi).chain(self.tsc.as_ref())
    }
}
