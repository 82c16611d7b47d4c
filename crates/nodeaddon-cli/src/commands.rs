// SPDX-License-Identifier: MIT OR Apache-2.0
//! Subcommand implementations, kept free of process exit so they can be
//! tested without spawning the binary.

use anyhow::{Context, Result};
use nodeaddon_config::{BuildConfig, discover_config, load_config, validate_config};
use nodeaddon_orchestrator::{BuildPlan, CommandExecutor, HostPlatform, Orchestrator};
use schemars::schema_for;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Collect the process arguments for napi, unchanged and in order.
///
/// Nothing is interpreted: `--`, `--help`, `-V` and subcommand-like words
/// all pass through. Only non-UTF-8 arguments are rejected, because the
/// step runs as a shell command line.
pub fn forwarded_args<I>(args: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|raw| anyhow::anyhow!("argument is not valid UTF-8: {raw:?}"))
        })
        .collect()
}

/// An explicit `--config` path, else `./nodeaddon.toml` if it exists.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<Option<PathBuf>> {
    if explicit.is_some() {
        return Ok(explicit);
    }
    let cwd = std::env::current_dir().context("resolve current directory")?;
    Ok(discover_config(&cwd))
}

/// Run the build and return the process exit status.
///
/// On failure the one-line diagnostic goes to stdout, next to the child
/// output the user is already looking at.
pub fn build<E: CommandExecutor>(
    config: BuildConfig,
    platform: HostPlatform,
    executor: E,
    napi_args: &[String],
) -> i32 {
    let orchestrator = Orchestrator::new(config, platform, executor);
    match orchestrator.run(napi_args) {
        Ok(summary) => summary.exit_code(),
        Err(err) => {
            println!("{}", err.diagnostic());
            err.exit_code()
        }
    }
}

/// Render a plan as shell lines, one per step, or as pretty JSON.
pub fn render_plan(plan: &BuildPlan, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(plan).context("serialize build plan");
    }
    let lines: Vec<String> = plan.steps().map(|s| s.command_line()).collect();
    Ok(lines.join("\n"))
}

/// JSON schema of the config file.
pub fn schema_json() -> Result<String> {
    let schema = schema_for!(BuildConfig);
    serde_json::to_string_pretty(&schema).context("serialize schema")
}

/// Load and validate a configuration file.
///
/// Returns human-readable diagnostics and whether any of them is an error.
pub fn config_check(path: Option<&Path>) -> (Vec<String>, bool) {
    let mut diagnostics = Vec::new();

    let config = match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            diagnostics.push(format!("error: {e}"));
            return (diagnostics, true);
        }
    };

    match validate_config(&config) {
        Ok(warnings) => {
            for w in &warnings {
                diagnostics.push(format!("warning: {w}"));
            }
            diagnostics.push("config: ok".into());
            (diagnostics, false)
        }
        Err(e) => {
            diagnostics.push(format!("error: {e}"));
            (diagnostics, true)
        }
    }
}
