// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property-based tests for argument forwarding and fail-fast sequencing.

use std::cell::RefCell;
use std::io;

use proptest::prelude::*;

use nodeaddon_config::BuildConfig;
use nodeaddon_orchestrator::plan::napi_args;
use nodeaddon_orchestrator::{
    CommandExecutor, HostPlatform, Orchestrator, StepError, StepKind, StepOutcome, StepPlan,
};

/// Returns a fixed exit code per step and records the order of calls.
struct FixedExecutor {
    napi: i32,
    tsc: i32,
    calls: RefCell<Vec<StepPlan>>,
}

impl FixedExecutor {
    fn new(napi: i32, tsc: i32) -> Self {
        Self {
            napi,
            tsc,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl CommandExecutor for FixedExecutor {
    fn execute(&self, plan: &StepPlan) -> io::Result<StepOutcome> {
        self.calls.borrow_mut().push(plan.clone());
        let code = match plan.step {
            StepKind::Napi => self.napi,
            StepKind::Tsc => self.tsc,
        };
        Ok(StepOutcome::Exited { code })
    }
}

// ── Strategies ─────────────────────────────────────────────────────

fn arb_arg() -> impl Strategy<Value = String> {
    "[ -~]{0,32}" // printable ASCII, including quotes and spaces
}

fn arb_args() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_arg(), 0..12)
}

fn arb_platform() -> impl Strategy<Value = HostPlatform> {
    prop_oneof![Just(HostPlatform::Windows), Just(HostPlatform::Other)]
}

// ── Properties ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn trailing_napi_args_equal_forwarded(args in arb_args()) {
        let cfg = BuildConfig::default();
        let prefix_len = napi_args(&cfg, &[]).len();
        let full = napi_args(&cfg, &args);
        prop_assert_eq!(full.len(), prefix_len + args.len());
        prop_assert_eq!(&full[prefix_len..], args.as_slice());
    }

    #[test]
    fn failing_napi_stops_the_build(code in prop_oneof![i32::MIN..0, 1..i32::MAX], args in arb_args()) {
        let exec = FixedExecutor::new(code, 0);
        let err = Orchestrator::new(BuildConfig::default(), HostPlatform::Other, &exec)
            .run(&args)
            .unwrap_err();
        prop_assert_eq!(exec.calls.borrow().len(), 1);
        prop_assert_eq!(err.step(), StepKind::Napi);
        prop_assert_eq!(err.exit_code(), code);
    }

    #[test]
    fn tsc_status_is_the_exit_status(code in 0i32..256) {
        let exec = FixedExecutor::new(0, code);
        let result = Orchestrator::new(BuildConfig::default(), HostPlatform::Other, &exec).run(&[]);
        prop_assert_eq!(exec.calls.borrow().len(), 2);
        let exit = match result {
            Ok(summary) => summary.exit_code(),
            Err(err) => {
                prop_assert!(matches!(err, StepError::NonZeroExit { step: StepKind::Tsc, .. }), "unexpected error: {:?}", err);
                err.exit_code()
            }
        };
        prop_assert_eq!(exit, code);
    }

    #[test]
    fn runner_is_shared_by_both_steps(platform in arb_platform(), args in arb_args()) {
        let exec = FixedExecutor::new(0, 0);
        Orchestrator::new(BuildConfig::default(), platform, &exec).run(&args).unwrap();
        let expected = match platform {
            HostPlatform::Windows => "yarn.cmd",
            HostPlatform::Other => "yarn",
        };
        for call in exec.calls.borrow().iter() {
            prop_assert_eq!(call.program.as_str(), expected);
        }
    }
}
