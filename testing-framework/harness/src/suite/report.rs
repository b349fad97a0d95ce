use std::{fmt, sync::Arc, time::Duration};

use tracing::{error, info, warn};

use super::error::SuiteFailure;

/// Why a scenario was skipped instead of dispatched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SkipCause {
    /// The suite's setup hook failed or timed out.
    SetupFailed,
    /// Smoke mode is active and the scenario is not in the declared smoke set.
    NotInSmokeSet,
}

impl fmt::Display for SkipCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetupFailed => f.write_str("suite setup failed"),
            Self::NotInSmokeSet => f.write_str("not in smoke set"),
        }
    }
}

/// Terminal result of one scenario, produced exactly once by the scheduler.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    Passed,
    Failed(String),
    TimedOut,
    Skipped(SkipCause),
}

impl Outcome {
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Failures in the host-runtime sense: a timed-out scenario is a failed
    /// scenario with a distinguishable reason, a skipped one is not.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::TimedOut)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("passed"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            Self::TimedOut => f.write_str("timed out"),
            Self::Skipped(cause) => write!(f, "skipped: {cause}"),
        }
    }
}

/// One scenario's outcome together with its observed wall-clock time.
#[derive(Clone, Debug)]
pub struct ScenarioReport {
    scenario: String,
    outcome: Outcome,
    elapsed: Duration,
}

impl ScenarioReport {
    pub(crate) fn new(scenario: impl Into<String>, outcome: Outcome, elapsed: Duration) -> Self {
        Self {
            scenario: scenario.into(),
            outcome,
            elapsed,
        }
    }

    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    #[must_use]
    pub const fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Sink for per-scenario outcomes, notified by the scheduler as they land.
pub trait Reporter: Send + Sync {
    fn report(&self, suite: &str, entry: &ScenarioReport);
}

/// Default reporter: forwards every outcome as a structured tracing event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, suite: &str, entry: &ScenarioReport) {
        let elapsed_ms = entry.elapsed().as_millis();
        match entry.outcome() {
            Outcome::Passed => {
                info!(suite, scenario = entry.scenario(), elapsed_ms, "scenario passed");
            }
            Outcome::Failed(reason) => {
                error!(
                    suite,
                    scenario = entry.scenario(),
                    elapsed_ms,
                    %reason,
                    "scenario failed"
                );
            }
            Outcome::TimedOut => {
                error!(suite, scenario = entry.scenario(), elapsed_ms, "scenario timed out");
            }
            Outcome::Skipped(cause) => {
                warn!(suite, scenario = entry.scenario(), %cause, "scenario skipped");
            }
        }
    }
}

/// Aggregate outcome counts for one suite run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub skipped: usize,
}

impl Summary {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.timed_out + self.skipped
    }
}

/// Everything the scheduler produced for one suite run, in registration order.
pub struct SuiteReport {
    suite: Arc<str>,
    entries: Vec<ScenarioReport>,
}

impl SuiteReport {
    pub(crate) fn new(suite: Arc<str>, entries: Vec<ScenarioReport>) -> Self {
        Self { suite, entries }
    }

    #[must_use]
    pub fn suite_name(&self) -> &str {
        &self.suite
    }

    #[must_use]
    pub fn entries(&self) -> &[ScenarioReport] {
        &self.entries
    }

    #[must_use]
    pub fn outcome_of(&self, scenario: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|entry| entry.scenario() == scenario)
            .map(ScenarioReport::outcome)
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for entry in &self.entries {
            match entry.outcome() {
                Outcome::Passed => summary.passed += 1,
                Outcome::Failed(_) => summary.failed += 1,
                Outcome::TimedOut => summary.timed_out += 1,
                Outcome::Skipped(_) => summary.skipped += 1,
            }
        }
        summary
    }

    /// Aggregates failing scenarios so a test entry point can see every
    /// missing condition in a single report.
    pub fn ensure_success(&self) -> Result<(), SuiteFailure> {
        let failures = self
            .entries
            .iter()
            .filter(|entry| entry.outcome().is_failure())
            .map(|entry| format!("{}: {}", entry.scenario(), entry.outcome()))
            .collect::<Vec<_>>();

        if failures.is_empty() {
            return Ok(());
        }

        Err(SuiteFailure::new(
            self.suite_name(),
            failures.join("\n"),
        ))
    }

    /// Panicking variant of [`Self::ensure_success`] for test bodies that do
    /// not return a `Result`.
    pub fn assert_success(&self) {
        if let Err(failure) = self.ensure_success() {
            panic!("{failure}");
        }
    }
}
