// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared pieces of the `nodeaddon-build` and `nodeaddon-inspect` binaries.
#![deny(unsafe_code)]

pub mod commands;

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. Only the config file decides the level.
pub fn init_tracing(log_level: Option<&str>) {
    let filter = EnvFilter::new(format!("nodeaddon={}", log_level.unwrap_or("info")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
