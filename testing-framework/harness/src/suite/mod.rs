//! Suite/scenario orchestration primitives shared by every system test.
//!
//! A [`Suite`] collects named scenarios (sequential or parallel, optionally
//! time-bounded), an optional once-per-suite setup hook, and an optional
//! smoke subset, then drives them to completion and reports one [`Outcome`]
//! per scenario.

mod definition;
mod error;
mod registry;
mod report;
mod runtime;
mod setup;
mod smoke;

pub use definition::Suite;
pub use error::{ConfigError, SuiteFailure};
pub use registry::{ExecMode, RegistrationHandle, ScenarioOptions, SetupPolicy};
pub use report::{
    Outcome, Reporter, ScenarioReport, SkipCause, SuiteReport, Summary, TracingReporter,
};
pub use runtime::RunContext;
pub use setup::SetupOutcome;
pub use smoke::SmokeMode;
