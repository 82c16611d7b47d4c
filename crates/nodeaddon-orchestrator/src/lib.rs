// SPDX-License-Identifier: MIT OR Apache-2.0
//! nodeaddon-orchestrator
//!
//! Runs a Node native-addon build as two strictly ordered, fail-fast steps:
//! `napi build ...` then `tsc`, both through the package-script runner.
//! The second step starts only after the first has exited with status 0.
#![deny(unsafe_code)]

pub mod plan;
pub mod process;

pub use plan::{BuildPlan, HostPlatform, StepKind, StepPlan};
pub use process::{CommandExecutor, ShellExecutor, ShellInvocation, StepOutcome};

use nodeaddon_config::BuildConfig;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Exit status used when a step could not be launched at all.
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = 1;

/// Why a build stopped early.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("{step}: failed to launch: {source}")]
    Launch {
        step: StepKind,
        #[source]
        source: std::io::Error,
    },

    #[error("{step}: exited with status {code}")]
    NonZeroExit { step: StepKind, code: i32 },

    #[error("{step}: terminated by signal {signal}")]
    Signaled { step: StepKind, signal: i32 },
}

impl StepError {
    /// The step that failed.
    pub fn step(&self) -> StepKind {
        match self {
            StepError::Launch { step, .. }
            | StepError::NonZeroExit { step, .. }
            | StepError::Signaled { step, .. } => *step,
        }
    }

    /// Exit status the orchestrator terminates with.
    ///
    /// A non-zero exit is passed through unchanged. Signals map to the shell
    /// convention `128 + signal`.
    pub fn exit_code(&self) -> i32 {
        match self {
            StepError::Launch { .. } => LAUNCH_FAILURE_EXIT_CODE,
            StepError::NonZeroExit { code, .. } => *code,
            StepError::Signaled { signal, .. } => 128 + signal,
        }
    }

    /// One-line diagnostic: step name, status, and launch error.
    /// Missing parts are printed as `-`.
    pub fn diagnostic(&self) -> String {
        match self {
            StepError::Launch { step, source } => format!("{step} - {source}"),
            StepError::NonZeroExit { step, code } => format!("{step} {code} -"),
            StepError::Signaled { step, signal } => format!("{step} - signal {signal}"),
        }
    }

    fn from_outcome(step: StepKind, outcome: StepOutcome) -> Option<Self> {
        match outcome {
            StepOutcome::Exited { code: 0 } => None,
            StepOutcome::Exited { code } => Some(StepError::NonZeroExit { step, code }),
            StepOutcome::Signaled { signal } => Some(StepError::Signaled { step, signal }),
        }
    }
}

/// Where a build currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    RunningNapi,
    RunningTsc,
    Done,
    Failed,
}

impl BuildState {
    fn running(step: StepKind) -> Self {
        match step {
            StepKind::Napi => BuildState::RunningNapi,
            StepKind::Tsc => BuildState::RunningTsc,
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildState::Idle => "idle",
            BuildState::RunningNapi => "running_napi",
            BuildState::RunningTsc => "running_tsc",
            BuildState::Done => "done",
            BuildState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Timing of a step that completed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: StepKind,
    pub elapsed: Duration,
}

/// Result of a build that finished with every step succeeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: Vec<StepReport>,
    pub state: BuildState,
}

impl RunSummary {
    /// Always 0; returned explicitly rather than relying on a default.
    pub fn exit_code(&self) -> i32 {
        0
    }
}

/// Sequences the build steps over a [`CommandExecutor`].
#[derive(Debug)]
pub struct Orchestrator<E> {
    config: BuildConfig,
    platform: HostPlatform,
    executor: E,
}

impl<E: CommandExecutor> Orchestrator<E> {
    pub fn new(config: BuildConfig, platform: HostPlatform, executor: E) -> Self {
        Self {
            config,
            platform,
            executor,
        }
    }

    /// The plan `run` would execute for `extra_args`.
    pub fn plan(&self, extra_args: &[String]) -> BuildPlan {
        BuildPlan::new(&self.config, self.platform, extra_args)
    }

    /// Run napi, then tsc if napi exited 0. Stops at the first failure.
    pub fn run(&self, extra_args: &[String]) -> Result<RunSummary, StepError> {
        let plan = self.plan(extra_args);
        let mut state = BuildState::Idle;
        let mut steps = Vec::new();

        for step_plan in plan.steps() {
            advance(&mut state, BuildState::running(step_plan.step));
            match self.run_step(step_plan) {
                Ok(report) => steps.push(report),
                Err(err) => {
                    advance(&mut state, BuildState::Failed);
                    warn!(
                        target: "nodeaddon.step",
                        step = %err.step(),
                        exit_code = err.exit_code(),
                        "{err}"
                    );
                    return Err(err);
                }
            }
        }

        advance(&mut state, BuildState::Done);
        Ok(RunSummary { steps, state })
    }

    fn run_step(&self, step_plan: &StepPlan) -> Result<StepReport, StepError> {
        let step = step_plan.step;
        info!(target: "nodeaddon.step", %step, command = %step_plan.command_line(), "starting");
        let started = Instant::now();

        let outcome = self
            .executor
            .execute(step_plan)
            .map_err(|source| StepError::Launch { step, source })?;
        let elapsed = started.elapsed();
        debug!(target: "nodeaddon.step", %step, ?outcome, ?elapsed, "exited");

        if let Some(err) = StepError::from_outcome(step, outcome) {
            return Err(err);
        }
        info!(target: "nodeaddon.step", %step, elapsed_ms = elapsed.as_millis() as u64, "finished");
        Ok(StepReport { step, elapsed })
    }
}

fn advance(state: &mut BuildState, next: BuildState) {
    debug!(target: "nodeaddon.state", from = %state, to = %next, "transition");
    *state = next;
}
