use std::time::Duration;

use tracing::info;

use super::{
    error::ConfigError,
    registry::ScenarioBody,
    runtime::{
        unit::{run_unit, UnitOutcome},
        RunContext,
    },
};

/// Result of the suite's setup hook, cached for the suite lifetime.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SetupOutcome {
    Succeeded,
    Failed(String),
    TimedOut,
}

impl SetupOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

struct SetupHook<F> {
    timeout: Option<Duration>,
    body: ScenarioBody<F>,
}

/// Runs the at-most-one setup hook exactly once per suite and caches its
/// outcome; a suite without a hook vacuously succeeds.
pub(crate) struct SetupCoordinator<F> {
    name: Option<String>,
    hook: Option<SetupHook<F>>,
    cached: Option<SetupOutcome>,
}

impl<F> SetupCoordinator<F> {
    pub const fn new() -> Self {
        Self {
            name: None,
            hook: None,
            cached: None,
        }
    }

    pub fn declare(
        &mut self,
        name: String,
        timeout: Option<Duration>,
        body: ScenarioBody<F>,
    ) -> Result<(), ConfigError> {
        if let Some(existing) = &self.name {
            return Err(ConfigError::SetupAlreadyDeclared(existing.clone()));
        }
        self.name = Some(name);
        self.hook = Some(SetupHook { timeout, body });
        Ok(())
    }

    pub fn hook_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl<F: Send + 'static> SetupCoordinator<F> {
    /// Idempotent: the first call executes the hook under its timeout and
    /// caches the outcome; later calls return the cache without re-executing.
    pub async fn ensure_run(&mut self, ctx: RunContext<F>) -> SetupOutcome {
        if let Some(cached) = &self.cached {
            return cached.clone();
        }

        let outcome = match self.hook.take() {
            None => SetupOutcome::Succeeded,
            Some(hook) => {
                info!(
                    suite = ctx.suite_name(),
                    setup = self.name.as_deref().unwrap_or_default(),
                    "running suite setup"
                );
                match run_unit((hook.body)(ctx), hook.timeout).await {
                    UnitOutcome::Completed => SetupOutcome::Succeeded,
                    UnitOutcome::Failed(reason) => SetupOutcome::Failed(reason),
                    UnitOutcome::TimedOut => SetupOutcome::TimedOut,
                }
            }
        };

        self.cached = Some(outcome.clone());
        outcome
    }
}
