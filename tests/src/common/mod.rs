use std::sync::{Arc, Mutex, Once};

use testing_framework_harness::suite::{Reporter, ScenarioReport};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Installs a fmt subscriber once per test binary; respects `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Order-preserving record of events emitted by scenario bodies, shared
/// across tasks so tests can assert on observed start/finish order.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.events
            .lock()
            .expect("event log poisoned")
            .push(event.into());
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.events.lock().expect("event log poisoned").clone()
    }

    /// Entries starting with `prefix`, with the prefix stripped.
    #[must_use]
    pub fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries()
            .iter()
            .filter_map(|entry| entry.strip_prefix(prefix).map(ToOwned::to_owned))
            .collect()
    }
}

/// Reporter capturing every entry it sees, for asserting on the report
/// stream itself.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    entries: Arc<Mutex<Vec<(String, ScenarioReport)>>>,
}

impl RecordingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<(String, ScenarioReport)> {
        self.entries.lock().expect("reporter log poisoned").clone()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, suite: &str, entry: &ScenarioReport) {
        self.entries
            .lock()
            .expect("reporter log poisoned")
            .push((suite.to_owned(), entry.clone()));
    }
}
