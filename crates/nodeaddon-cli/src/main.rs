// SPDX-License-Identifier: MIT OR Apache-2.0
//! `nodeaddon-build [ARGS...]`
//!
//! Every argument is appended to `napi build` exactly as given, so this
//! binary parses no flags of its own. Settings come from `./nodeaddon.toml`;
//! inspection lives in `nodeaddon-inspect`.
#![deny(unsafe_code)]

use anyhow::{Context, Result};
use nodeaddon_cli::{commands, init_tracing};
use nodeaddon_config::{discover_config, load_config, validate_config};
use nodeaddon_orchestrator::{HostPlatform, ShellExecutor};

fn main() -> Result<()> {
    let napi_args = commands::forwarded_args(std::env::args_os().skip(1))?;

    let cwd = std::env::current_dir().context("resolve current directory")?;
    let config = load_config(discover_config(&cwd).as_deref()).context("load config")?;
    // Subscriber first, so validation warnings are visible.
    init_tracing(config.log_level.as_deref());
    for w in validate_config(&config).context("validate config")? {
        tracing::warn!(target: "nodeaddon.config", "{w}");
    }

    let mut executor = ShellExecutor::new();
    if let Some(dir) = &config.working_dir {
        executor = executor.with_working_dir(dir);
    }

    let code = commands::build(config, HostPlatform::current(), executor, &napi_args);
    std::process::exit(code);
}
