use thiserror::Error;

/// Configuration mistakes in a test file, surfaced at registration time.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("scenario '{0}' is already registered in this suite")]
    DuplicateScenario(String),
    #[error("smoke set is already declared for this suite")]
    SmokeAlreadyDeclared,
    #[error("setup hook '{0}' is already declared for this suite")]
    SetupAlreadyDeclared(String),
}

/// Error returned by [`SuiteReport::ensure_success`] so test entry points can
/// propagate failing scenarios into the host runtime's native failure path.
///
/// [`SuiteReport::ensure_success`]: super::SuiteReport::ensure_success
#[derive(Debug, Error)]
#[error("suite '{suite}' finished with failing scenarios:\n{details}")]
pub struct SuiteFailure {
    suite: String,
    details: String,
}

impl SuiteFailure {
    pub(crate) fn new(suite: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            details: details.into(),
        }
    }
}
