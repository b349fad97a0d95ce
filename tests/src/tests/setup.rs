use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use tests::common::{init_tracing, EventLog};
use testing_framework_harness::suite::{
    ConfigError, Outcome, ScenarioOptions, SkipCause, Suite,
};
use tokio::time::sleep;

fn suite_with_failing_setup(events: &EventLog) -> Suite {
    let mut suite = Suite::new("setup failure");
    suite.test_setup("register shared phone number", |_ctx| async {
        Err("auth service returned 500".into())
    });

    for name in ["send transaction", "check balance"] {
        let log = events.clone();
        suite.run_sequentially(name, move |_ctx| async move {
            log.record(format!("ran:{name}"));
            Ok(())
        });
    }
    suite
}

#[tokio::test]
async fn failing_setup_skips_every_dependent_scenario() {
    init_tracing();

    // Two identical invocations must produce the same all-skipped result.
    for _ in 0..2 {
        let events = EventLog::new();
        let report = suite_with_failing_setup(&events).execute().await;

        assert!(events.entries().is_empty(), "no scenario body may execute");
        for name in ["send transaction", "check balance"] {
            assert_eq!(
                report.outcome_of(name),
                Some(&Outcome::Skipped(SkipCause::SetupFailed))
            );
        }
        let summary = report.summary();
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.total(), 2);
        assert!(report.ensure_success().is_ok(), "skips are not failures");
    }
}

#[tokio::test]
async fn setup_body_runs_exactly_once_for_the_suite() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let observed = Arc::clone(&calls);

    let mut suite = Suite::new("setup once");
    suite.test_setup("create shared wallet", move |_ctx| async move {
        observed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    suite.run_sequentially("first consumer", |_ctx| async { Ok(()) });
    suite.run_sequentially("second consumer", |_ctx| async { Ok(()) });
    suite.run("parallel consumer", |_ctx| async { Ok(()) });

    let report = suite.execute().await;
    report.assert_success();
    assert_eq!(report.summary().passed, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn independent_scenario_still_runs_after_setup_failure() {
    init_tracing();
    let events = EventLog::new();

    let mut suite = Suite::new("setup opt-out");
    suite.test_setup("broken setup", |_ctx| async {
        Err("vault unreachable".into())
    });

    let log = events.clone();
    suite.run("dependent", move |_ctx| async move {
        log.record("ran:dependent");
        Ok(())
    });

    let log = events.clone();
    suite
        .register(
            "health probe",
            ScenarioOptions::parallel().independent(),
            move |_ctx| async move {
                log.record("ran:health probe");
                Ok(())
            },
        )
        .unwrap();

    let report = suite.execute().await;
    assert_eq!(
        report.outcome_of("dependent"),
        Some(&Outcome::Skipped(SkipCause::SetupFailed))
    );
    assert_eq!(report.outcome_of("health probe"), Some(&Outcome::Passed));
    assert_eq!(events.entries(), vec!["ran:health probe".to_owned()]);
}

#[tokio::test]
async fn setup_timeout_cascades_as_skip() {
    init_tracing();
    let mut suite = Suite::new("setup deadline");
    suite.test_setup_with_timeout(
        "slow environment warmup",
        Duration::from_millis(50),
        |_ctx| async {
            sleep(Duration::from_secs(5)).await;
            Ok(())
        },
    );
    suite.run_sequentially("never runs", |_ctx| async { Ok(()) });

    let report = suite.execute().await;
    assert_eq!(
        report.outcome_of("never runs"),
        Some(&Outcome::Skipped(SkipCause::SetupFailed))
    );
}

#[tokio::test]
async fn redeclaring_the_setup_hook_errors() {
    let mut suite = Suite::new("setup redeclare");
    suite.test_setup("first", |_ctx| async { Ok(()) });

    let error = suite
        .try_test_setup("second", None, |_ctx| async { Ok(()) })
        .unwrap_err();
    assert_eq!(error, ConfigError::SetupAlreadyDeclared("first".to_owned()));
}
