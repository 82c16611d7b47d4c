// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration loading and validation for the nodeaddon build orchestrator.
//!
//! [`BuildConfig::default()`] reproduces the stock two-step build exactly:
//! `napi build --platform --release` with the NAPI-RS declaration header,
//! `index-napi.d.ts` / `index-napi.js` outputs, a `prettier -w` pipe, and a
//! follow-up `tsc` type-check. A `nodeaddon.toml` next to the package can
//! adjust individual pieces. The process environment is never consulted.
#![deny(unsafe_code)]
#![warn(missing_docs)]

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file could not be read.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The file could not be parsed as valid TOML.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory-level issues that do not prevent a build but deserve attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The `tsc` step is disabled, so generated declarations go unchecked.
    TypeCheckDisabled,
    /// `--release` is not passed to napi.
    DebugBuild,
    /// No `--pipe` formatter is configured.
    NoFormatter,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::TypeCheckDisabled => {
                f.write_str("type_check is disabled: tsc will not run after napi")
            }
            ConfigWarning::DebugBuild => {
                f.write_str("release is disabled: napi will produce a debug build")
            }
            ConfigWarning::NoFormatter => {
                f.write_str("pipe is empty: generated files will not be formatted")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Declaration header injected at the top of the generated `.d.ts`.
///
/// The surrounding double quotes are part of the value: the command line is
/// handed to a shell, which strips them and keeps the header as one argument.
pub const DEFAULT_DTS_HEADER: &str = "\"/* auto-generated by NAPI-RS */ /* eslint-disable */ import type * as types from './index.js';\"";

/// Generated declaration file name.
pub const DEFAULT_DTS_FILE: &str = "index-napi.d.ts";

/// Generated loader file name.
pub const DEFAULT_JS_FILE: &str = "index-napi.js";

/// Post-processing command napi pipes generated files through.
pub const DEFAULT_PIPE: &str = "\"prettier -w\"";

/// File name looked up by [`discover_config`].
pub const CONFIG_FILE_NAME: &str = "nodeaddon.toml";

/// Recognised log levels.
const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Top-level settings for a two-step addon build.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Package-script runner used for both steps. When unset the runner is
    /// picked from the host platform (`yarn.cmd` on Windows, `yarn` elsewhere).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runner: Option<String>,

    /// Value of `--dts-header`. Empty omits the flag.
    pub dts_header: String,

    /// Value of `--dts`.
    pub dts_file: String,

    /// Value of `--js`.
    pub js_file: String,

    /// Value of `--pipe`. Empty omits the flag.
    pub pipe: String,

    /// Pass `--platform` to napi.
    pub platform_flag: bool,

    /// Pass `--release` to napi.
    pub release: bool,

    /// Run `tsc` after a successful napi build.
    pub type_check: bool,

    /// Directory both steps run in. Defaults to the current directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    /// Log level override (e.g. `"debug"`, `"info"`, `"warn"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            runner: None,
            dts_header: DEFAULT_DTS_HEADER.into(),
            dts_file: DEFAULT_DTS_FILE.into(),
            js_file: DEFAULT_JS_FILE.into(),
            pipe: DEFAULT_PIPE.into(),
            platform_flag: true,
            release: true,
            type_check: true,
            working_dir: None,
            log_level: Some("info".into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a [`BuildConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, returns [`BuildConfig::default()`].
pub fn load_config(path: Option<&Path>) -> Result<BuildConfig, ConfigError> {
    match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                path: p.display().to_string(),
            })?;
            parse_toml(&content)
        }
        None => Ok(BuildConfig::default()),
    }
}

/// Return `dir/nodeaddon.toml` if it exists.
pub fn discover_config(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Parse a TOML string into a [`BuildConfig`].
pub fn parse_toml(content: &str) -> Result<BuildConfig, ConfigError> {
    toml::from_str::<BuildConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a parsed configuration, returning advisory warnings.
///
/// Hard errors (blank runner, blank output file names, unknown log level)
/// are returned as a [`ConfigError::ValidationError`].
pub fn validate_config(config: &BuildConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    if let Some(ref level) = config.log_level {
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(format!("invalid log_level '{level}'"));
        }
    }

    if let Some(ref runner) = config.runner {
        if runner.trim().is_empty() {
            errors.push("runner must not be empty".into());
        }
    }
    if config.dts_file.trim().is_empty() {
        errors.push("dts_file must not be empty".into());
    }
    if config.js_file.trim().is_empty() {
        errors.push("js_file must not be empty".into());
    }
    if let Some(ref dir) = config.working_dir {
        if dir.trim().is_empty() {
            errors.push("working_dir must not be empty when set".into());
        }
    }

    if !config.type_check {
        warnings.push(ConfigWarning::TypeCheckDisabled);
    }
    if !config.release {
        warnings.push(ConfigWarning::DebugBuild);
    }
    if config.pipe.trim().is_empty() {
        warnings.push(ConfigWarning::NoFormatter);
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
