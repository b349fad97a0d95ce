use std::{future::Future, sync::Arc, time::Duration};

use futures::FutureExt as _;
use tokio::sync::Mutex;
use tracing::info;

use super::{
    error::ConfigError,
    registry::{RegistrationHandle, Registry, ScenarioBody, ScenarioOptions},
    report::{Reporter, SuiteReport, TracingReporter},
    runtime::{scheduler, RunContext},
    setup::SetupCoordinator,
    smoke::{SmokeFilter, SmokeMode},
};
use crate::DynError;

/// One suite invocation: registration surface plus the execution entry point.
///
/// `F` is the suite-scoped shared fixture handed to every body through
/// [`RunContext::fixture`]; suites without shared state use the `()` default.
///
/// The `run*`/`test_setup*`/`set_smoke_tests` wrappers panic on configuration
/// errors (duplicate scenario names, redeclared smoke set or setup hook):
/// those indicate a programming mistake in the test file and must surface
/// before any execution begins. The `try_*`/[`Self::register`] variants
/// return the typed [`ConfigError`] instead.
pub struct Suite<F = ()> {
    name: Arc<str>,
    registry: Registry<F>,
    smoke: SmokeFilter,
    setup: SetupCoordinator<F>,
    fixture: Arc<Mutex<F>>,
    reporter: Arc<dyn Reporter>,
}

impl Suite<()> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_fixture(name, ())
    }
}

impl<F: Send + 'static> Suite<F> {
    /// Creates a suite whose scenarios share `fixture`.
    #[must_use]
    pub fn with_fixture(name: impl Into<String>, fixture: F) -> Self {
        Self {
            name: Arc::from(name.into()),
            registry: Registry::new(),
            smoke: SmokeFilter::new(SmokeMode::FromEnv),
            setup: SetupCoordinator::new(),
            fixture: Arc::new(Mutex::new(fixture)),
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Replaces the default tracing reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    /// Pins smoke activation instead of reading the `SMOKE_TESTS` flag.
    #[must_use]
    pub fn with_smoke_mode(mut self, mode: SmokeMode) -> Self {
        self.smoke.set_mode(mode);
        self
    }

    /// Declares which scenario names constitute this suite's smoke subset.
    pub fn set_smoke_tests<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Err(error) = self.try_set_smoke_tests(names) {
            panic!("{error}");
        }
    }

    pub fn try_set_smoke_tests<I, S>(&mut self, names: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.smoke.declare(names)
    }

    /// Declares the once-per-suite setup hook.
    pub fn test_setup<B, Fut>(&mut self, name: impl Into<String>, body: B)
    where
        B: FnOnce(RunContext<F>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), DynError>> + Send + 'static,
    {
        if let Err(error) = self.try_test_setup(name, None, body) {
            panic!("{error}");
        }
    }

    /// Declares the setup hook with a deadline of its own.
    pub fn test_setup_with_timeout<B, Fut>(
        &mut self,
        name: impl Into<String>,
        timeout: Duration,
        body: B,
    ) where
        B: FnOnce(RunContext<F>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), DynError>> + Send + 'static,
    {
        if let Err(error) = self.try_test_setup(name, Some(timeout), body) {
            panic!("{error}");
        }
    }

    pub fn try_test_setup<B, Fut>(
        &mut self,
        name: impl Into<String>,
        timeout: Option<Duration>,
        body: B,
    ) -> Result<(), ConfigError>
    where
        B: FnOnce(RunContext<F>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), DynError>> + Send + 'static,
    {
        self.setup.declare(name.into(), timeout, box_body(body))
    }

    /// Registers a parallel scenario.
    pub fn run<B, Fut>(&mut self, name: impl Into<String>, body: B)
    where
        B: FnOnce(RunContext<F>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), DynError>> + Send + 'static,
    {
        self.must_register(name, ScenarioOptions::parallel(), body);
    }

    /// Registers a parallel scenario with a deadline.
    pub fn run_with_timeout<B, Fut>(&mut self, name: impl Into<String>, timeout: Duration, body: B)
    where
        B: FnOnce(RunContext<F>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), DynError>> + Send + 'static,
    {
        self.must_register(
            name,
            ScenarioOptions::parallel().with_timeout(timeout),
            body,
        );
    }

    /// Registers a scenario on the suite's ordered lane. Later sequential
    /// scenarios routinely assume state left in the fixture by earlier ones,
    /// so the lane preserves strict registration order.
    pub fn run_sequentially<B, Fut>(&mut self, name: impl Into<String>, body: B)
    where
        B: FnOnce(RunContext<F>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), DynError>> + Send + 'static,
    {
        self.must_register(name, ScenarioOptions::sequential(), body);
    }

    /// Registers a sequential scenario with a deadline.
    pub fn run_sequentially_with_timeout<B, Fut>(
        &mut self,
        name: impl Into<String>,
        timeout: Duration,
        body: B,
    ) where
        B: FnOnce(RunContext<F>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), DynError>> + Send + 'static,
    {
        self.must_register(
            name,
            ScenarioOptions::sequential().with_timeout(timeout),
            body,
        );
    }

    /// Full-control registration; also the only path to
    /// [`SetupPolicy::Independent`] scenarios.
    ///
    /// [`SetupPolicy::Independent`]: super::SetupPolicy::Independent
    pub fn register<B, Fut>(
        &mut self,
        name: impl Into<String>,
        options: ScenarioOptions,
        body: B,
    ) -> Result<RegistrationHandle, ConfigError>
    where
        B: FnOnce(RunContext<F>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), DynError>> + Send + 'static,
    {
        self.registry.register(name.into(), options, box_body(body))
    }

    fn must_register<B, Fut>(&mut self, name: impl Into<String>, options: ScenarioOptions, body: B)
    where
        B: FnOnce(RunContext<F>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), DynError>> + Send + 'static,
    {
        if let Err(error) = self.register(name, options, body) {
            panic!("{error}");
        }
    }

    /// Closes registration and drives every registered scenario to an
    /// outcome.
    pub async fn execute(self) -> SuiteReport {
        info!(
            suite = %self.name,
            scenarios = self.registry.len(),
            "executing suite"
        );
        scheduler::drive(
            self.name,
            self.registry.into_scenarios(),
            self.smoke,
            self.setup,
            self.fixture,
            self.reporter,
        )
        .await
    }
}

fn box_body<F, B, Fut>(body: B) -> ScenarioBody<F>
where
    B: FnOnce(RunContext<F>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), DynError>> + Send + 'static,
{
    Box::new(move |ctx| body(ctx).boxed())
}
