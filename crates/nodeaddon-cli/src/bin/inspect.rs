// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nodeaddon_cli::commands;
use nodeaddon_config::{load_config, validate_config};
use nodeaddon_orchestrator::{BuildPlan, HostPlatform};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "nodeaddon-inspect",
    version,
    about = "Inspect what nodeaddon-build would run and how it is configured"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the commands a build would run, without running them.
    Plan {
        /// Path to a TOML config file (defaults to ./nodeaddon.toml if present).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print JSON instead of shell lines.
        #[arg(long)]
        json: bool,

        /// Arguments `nodeaddon-build` would forward, given after `--`.
        #[arg(last = true, allow_hyphen_values = true)]
        napi_args: Vec<String>,
    },

    /// Print the JSON schema of the config file.
    Schema,

    /// Load and validate a config file.
    ConfigCheck {
        /// Path to a TOML config file (defaults to ./nodeaddon.toml if present).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            config,
            json,
            napi_args,
        } => cmd_plan(config, json, &napi_args),
        Commands::Schema => {
            println!("{}", commands::schema_json()?);
            Ok(())
        }
        Commands::ConfigCheck { config } => {
            let path = commands::resolve_config_path(config)?;
            let (diagnostics, failed) = commands::config_check(path.as_deref());
            for line in &diagnostics {
                println!("{line}");
            }
            if failed {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn cmd_plan(config: Option<PathBuf>, json: bool, napi_args: &[String]) -> Result<()> {
    let path = commands::resolve_config_path(config)?;
    let config = load_config(path.as_deref()).context("load config")?;
    validate_config(&config).context("validate config")?;
    let plan = BuildPlan::new(&config, HostPlatform::current(), napi_args);
    println!("{}", commands::render_plan(&plan, json)?);
    Ok(())
}
