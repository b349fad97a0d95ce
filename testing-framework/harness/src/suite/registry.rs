use std::{sync::Mutex, time::Duration};

use futures::future::BoxFuture;

use super::{error::ConfigError, runtime::RunContext};
use crate::DynError;

/// Boxed async scenario body. The closure receives the suite-scoped run
/// context and is consumed exactly once by the scheduler.
pub(crate) type ScenarioBody<F> =
    Box<dyn FnOnce(RunContext<F>) -> BoxFuture<'static, Result<(), DynError>> + Send>;

/// Whether a scenario runs on the suite's ordered lane or concurrently.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecMode {
    Sequential,
    Parallel,
}

/// Whether a scenario is skipped when the suite's setup hook fails.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SetupPolicy {
    #[default]
    DependsOnSetup,
    Independent,
}

/// Full-control registration options; the `Suite::run*` wrappers cover the
/// common combinations.
#[derive(Clone, Copy, Debug)]
pub struct ScenarioOptions {
    pub mode: ExecMode,
    pub timeout: Option<Duration>,
    pub setup: SetupPolicy,
}

impl ScenarioOptions {
    #[must_use]
    pub const fn sequential() -> Self {
        Self {
            mode: ExecMode::Sequential,
            timeout: None,
            setup: SetupPolicy::DependsOnSetup,
        }
    }

    #[must_use]
    pub const fn parallel() -> Self {
        Self {
            mode: ExecMode::Parallel,
            timeout: None,
            setup: SetupPolicy::DependsOnSetup,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn independent(mut self) -> Self {
        self.setup = SetupPolicy::Independent;
        self
    }
}

/// Proof of registration, carrying the slot the scenario occupies in the
/// suite's total order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistrationHandle {
    name: String,
    index: usize,
}

impl RegistrationHandle {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

/// A registered scenario, immutable once appended.
pub(crate) struct Scenario<F> {
    pub name: String,
    pub mode: ExecMode,
    pub timeout: Option<Duration>,
    pub setup: SetupPolicy,
    pub index: usize,
    pub body: ScenarioBody<F>,
}

/// Ordered scenario list. Registration is a single mutex-guarded append so a
/// suite body registering from multiple tasks cannot corrupt the order,
/// although none is expected to.
pub(crate) struct Registry<F> {
    scenarios: Mutex<Vec<Scenario<F>>>,
}

impl<F> Registry<F> {
    pub const fn new() -> Self {
        Self {
            scenarios: Mutex::new(Vec::new()),
        }
    }

    pub fn register(
        &self,
        name: String,
        options: ScenarioOptions,
        body: ScenarioBody<F>,
    ) -> Result<RegistrationHandle, ConfigError> {
        let mut scenarios = self.scenarios.lock().expect("scenario registry poisoned");
        if scenarios.iter().any(|scenario| scenario.name == name) {
            return Err(ConfigError::DuplicateScenario(name));
        }

        let index = scenarios.len();
        scenarios.push(Scenario {
            name: name.clone(),
            mode: options.mode,
            timeout: options.timeout,
            setup: options.setup,
            index,
            body,
        });

        Ok(RegistrationHandle { name, index })
    }

    pub fn len(&self) -> usize {
        self.scenarios.lock().expect("scenario registry poisoned").len()
    }

    /// Drains the registry in registration order once the suite body is done
    /// registering; the scheduler owns the scenarios from here on.
    pub fn into_scenarios(self) -> Vec<Scenario<F>> {
        self.scenarios
            .into_inner()
            .expect("scenario registry poisoned")
    }
}
