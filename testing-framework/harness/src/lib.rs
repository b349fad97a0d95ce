pub mod suite;

use std::{env, ops::Mul as _, sync::LazyLock, time::Duration};

/// Boxed error type carried by scenario and setup bodies.
pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

static IS_SLOW_TEST_ENV: LazyLock<bool> =
    LazyLock::new(|| env::var("SLOW_TEST_ENV").is_ok_and(|s| s == "true"));

/// On slow test environments (shared CI runners), use 2x timeout.
#[must_use]
pub fn adjust_timeout(d: Duration) -> Duration {
    if *IS_SLOW_TEST_ENV { d.mul(2) } else { d }
}
