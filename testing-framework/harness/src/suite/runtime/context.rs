use std::sync::Arc;

use tokio::sync::Mutex;

/// Per-scenario view into the suite handed to every body closure.
///
/// The fixture slot is the suite-scoped shared state that sequential
/// scenarios mutate in turn (a wallet, an allocation id, a reserved phone
/// number); making it part of the context keeps the dependency visible in the
/// scenario signature instead of hiding it in globals. Parallel scenarios
/// should seed their own state and leave the fixture alone.
pub struct RunContext<F = ()> {
    suite: Arc<str>,
    scenario: Arc<str>,
    fixture: Arc<Mutex<F>>,
}

impl<F> Clone for RunContext<F> {
    fn clone(&self) -> Self {
        Self {
            suite: Arc::clone(&self.suite),
            scenario: Arc::clone(&self.scenario),
            fixture: Arc::clone(&self.fixture),
        }
    }
}

impl<F> RunContext<F> {
    pub(crate) fn new(suite: Arc<str>, scenario: Arc<str>, fixture: Arc<Mutex<F>>) -> Self {
        Self {
            suite,
            scenario,
            fixture,
        }
    }

    #[must_use]
    pub fn suite_name(&self) -> &str {
        &self.suite
    }

    #[must_use]
    pub fn scenario_name(&self) -> &str {
        &self.scenario
    }

    /// Shared fixture handle; hold the lock only around the mutation.
    #[must_use]
    pub fn fixture(&self) -> Arc<Mutex<F>> {
        Arc::clone(&self.fixture)
    }

    /// Locks the fixture for the duration of `f`.
    pub async fn with_fixture<R>(&self, f: impl FnOnce(&mut F) -> R) -> R {
        let mut guard = self.fixture.lock().await;
        f(&mut guard)
    }
}
