// SPDX-License-Identifier: MIT OR Apache-2.0
//! Launching a step through the host shell.

use crate::plan::{HostPlatform, StepPlan};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

/// How a launched step terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The process exited with a status code.
    Exited {
        /// Exit code returned by the process.
        code: i32,
    },
    /// The process was terminated by a signal (unix only).
    Signaled {
        /// Signal number.
        signal: i32,
    },
}

impl StepOutcome {
    /// `true` only for an exit code of exactly zero.
    pub fn success(&self) -> bool {
        matches!(self, StepOutcome::Exited { code: 0 })
    }
}

impl From<ExitStatus> for StepOutcome {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return StepOutcome::Exited { code };
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return StepOutcome::Signaled { signal };
            }
        }
        // Neither a code nor a signal; treat as a generic failure.
        StepOutcome::Exited { code: 1 }
    }
}

/// Runs one step to completion.
///
/// `Err` means the step could not be launched at all; a step that ran and
/// failed comes back as `Ok` with a non-success [`StepOutcome`].
pub trait CommandExecutor {
    /// Launch `plan` and block until it terminates.
    fn execute(&self, plan: &StepPlan) -> io::Result<StepOutcome>;
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for &T {
    fn execute(&self, plan: &StepPlan) -> io::Result<StepOutcome> {
        (**self).execute(plan)
    }
}

/// The shell a command line is handed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInvocation {
    /// Shell executable.
    pub shell: &'static str,
    /// Switches placed before the command line.
    pub switches: &'static [&'static str],
    /// The unquoted command line.
    pub line: String,
}

impl ShellInvocation {
    /// `cmd.exe /d /s /c "<line>"` on Windows, `/bin/sh -c <line>` elsewhere.
    pub fn for_platform(platform: HostPlatform, line: String) -> Self {
        match platform {
            HostPlatform::Windows => Self {
                shell: "cmd.exe",
                switches: &["/d", "/s", "/c"],
                line,
            },
            HostPlatform::Other => Self {
                shell: "/bin/sh",
                switches: &["-c"],
                line,
            },
        }
    }

    /// Build the [`Command`]. Stdio is not configured here.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(self.shell);
        cmd.args(self.switches);
        self.push_line(&mut cmd);
        cmd
    }

    #[cfg(windows)]
    fn push_line(&self, cmd: &mut Command) {
        use std::os::windows::process::CommandExt;
        // cmd.exe /s strips exactly the outer quote pair.
        cmd.raw_arg(format!("\"{}\"", self.line));
    }

    #[cfg(not(windows))]
    fn push_line(&self, cmd: &mut Command) {
        cmd.arg(&self.line);
    }
}

/// Executor that runs each step through the host shell with inherited stdio.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    platform: HostPlatform,
    working_dir: Option<PathBuf>,
}

impl ShellExecutor {
    /// Executor for the current host, running in the current directory.
    pub fn new() -> Self {
        Self {
            platform: HostPlatform::current(),
            working_dir: None,
        }
    }

    /// Run steps in `dir` instead of the current directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// The shell invocation that would be used for `plan`.
    pub fn invocation(&self, plan: &StepPlan) -> ShellInvocation {
        ShellInvocation::for_platform(self.platform, plan.command_line())
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(&self, plan: &StepPlan) -> io::Result<StepOutcome> {
        let mut cmd = self.invocation(plan).to_command();
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        let status = cmd.status()?;
        Ok(StepOutcome::from(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::StepKind;

    #[test]
    fn only_exit_zero_is_success() {
        assert!(StepOutcome::Exited { code: 0 }.success());
        assert!(!StepOutcome::Exited { code: 2 }.success());
        assert!(!StepOutcome::Exited { code: -1 }.success());
        assert!(!StepOutcome::Signaled { signal: 9 }.success());
    }

    #[test]
    fn windows_invocation_uses_cmd() {
        let inv = ShellInvocation::for_platform(HostPlatform::Windows, "yarn.cmd tsc".into());
        assert_eq!(inv.shell, "cmd.exe");
        assert_eq!(inv.switches, &["/d", "/s", "/c"]);
        assert_eq!(inv.line, "yarn.cmd tsc");
    }

    #[test]
    fn unix_invocation_uses_sh() {
        let inv = ShellInvocation::for_platform(HostPlatform::Other, "yarn tsc".into());
        assert_eq!(inv.shell, "/bin/sh");
        assert_eq!(inv.switches, &["-c"]);
    }

    #[test]
    fn executor_invocation_carries_command_line() {
        let exec = ShellExecutor::new();
        let plan = StepPlan {
            step: StepKind::Tsc,
            program: "yarn".into(),
            args: vec!["tsc".into()],
        };
        assert_eq!(exec.invocation(&plan).line, "yarn tsc");
    }

    #[cfg(unix)]
    mod unix {
        use super::*;

        fn plan(line: &str) -> StepPlan {
            let mut parts = line.split(' ').map(String::from);
            StepPlan {
                step: StepKind::Napi,
                program: parts.next().unwrap(),
                args: parts.collect(),
            }
        }

        #[test]
        fn reports_exit_code() {
            let outcome = ShellExecutor::new().execute(&plan("exit 7")).unwrap();
            assert_eq!(outcome, StepOutcome::Exited { code: 7 });
        }

        #[test]
        fn shell_interprets_embedded_quotes() {
            let outcome = ShellExecutor::new()
                .execute(&plan("test \"a b\" = 'a b'"))
                .unwrap();
            assert!(outcome.success());
        }

        #[test]
        fn missing_program_is_shell_failure() {
            let outcome = ShellExecutor::new()
                .execute(&plan("nodeaddon-no-such-program-xyz"))
                .unwrap();
            assert_eq!(outcome, StepOutcome::Exited { code: 127 });
        }

        #[test]
        fn runs_in_working_dir() {
            let dir = std::env::temp_dir();
            let exec = ShellExecutor::new().with_working_dir(&dir);
            let line = format!("test \"$(pwd -P)\" = \"{}\"", dir.canonicalize().unwrap().display());
            let outcome = exec
                .execute(&StepPlan {
                    step: StepKind::Tsc,
                    program: line,
                    args: vec![],
                })
                .unwrap();
            assert!(outcome.success());
        }

        #[test]
        fn missing_working_dir_is_launch_error() {
            let exec = ShellExecutor::new().with_working_dir("/definitely/not/a/dir");
            assert!(exec.execute(&plan("true")).is_err());
        }

        #[test]
        fn signal_is_reported() {
            let outcome = ShellExecutor::new().execute(&plan("kill -9 $$")).unwrap();
            assert_eq!(outcome, StepOutcome::Signaled { signal: 9 });
        }
    }
}
