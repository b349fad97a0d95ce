use std::{collections::BTreeSet, env, sync::LazyLock};

use super::error::ConfigError;

static IS_SMOKE_RUN: LazyLock<bool> =
    LazyLock::new(|| env::var("SMOKE_TESTS").is_ok_and(|s| s == "true" || s == "1"));

/// How a suite decides whether smoke filtering is in effect.
///
/// `FromEnv` reads the process-wide `SMOKE_TESTS` flag once and treats it as
/// immutable for the process lifetime; the explicit variants exist so suites
/// (and this crate's own tests) can pin the mode without touching the
/// environment.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SmokeMode {
    #[default]
    FromEnv,
    Enabled,
    Disabled,
}

impl SmokeMode {
    #[must_use]
    pub fn is_active(self) -> bool {
        match self {
            Self::Enabled => true,
            Self::Disabled => false,
            Self::FromEnv => *IS_SMOKE_RUN,
        }
    }
}

/// Pure filtering predicate over the suite's declared smoke subset.
pub(crate) struct SmokeFilter {
    declared: Option<BTreeSet<String>>,
    mode: SmokeMode,
}

impl SmokeFilter {
    pub const fn new(mode: SmokeMode) -> Self {
        Self {
            declared: None,
            mode,
        }
    }

    pub fn set_mode(&mut self, mode: SmokeMode) {
        self.mode = mode;
    }

    pub fn declare<I, S>(&mut self, names: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.declared.is_some() {
            return Err(ConfigError::SmokeAlreadyDeclared);
        }
        self.declared = Some(names.into_iter().map(Into::into).collect());
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.mode.is_active()
    }

    /// True unconditionally when smoke mode is inactive; otherwise true iff
    /// the scenario name is in the declared set.
    pub fn should_run(&self, scenario: &str) -> bool {
        if !self.is_active() {
            return true;
        }
        self.declared
            .as_ref()
            .is_some_and(|set| set.contains(scenario))
    }

    /// Declared names that never matched a registered scenario; flagged as a
    /// configuration warning by the scheduler rather than an error.
    pub fn unmatched<'a>(&self, registered: impl Iterator<Item = &'a str>) -> Vec<String> {
        let Some(declared) = self.declared.as_ref() else {
            return Vec::new();
        };
        let registered: BTreeSet<&str> = registered.collect();
        declared
            .iter()
            .filter(|name| !registered.contains(name.as_str()))
            .cloned()
            .collect()
    }
}
