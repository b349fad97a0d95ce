use tests::common::{init_tracing, EventLog};
use testing_framework_harness::suite::{ConfigError, Outcome, ScenarioOptions, Suite};

#[tokio::test]
async fn panicking_scenario_fails_alone_and_the_lane_continues() {
    init_tracing();
    let events = EventLog::new();
    let mut suite = Suite::new("isolation");

    suite.run_sequentially("broken assertion", |_ctx| async {
        let allocation_created = false;
        assert!(allocation_created, "allocation was not created");
        Ok(())
    });

    let log = events.clone();
    suite.run_sequentially("still runs", move |_ctx| async move {
        log.record("ran:still runs");
        Ok(())
    });

    let report = suite.execute().await;

    match report.outcome_of("broken assertion") {
        Some(Outcome::Failed(reason)) => {
            assert!(
                reason.contains("allocation was not created"),
                "captured reason was: {reason}"
            );
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(report.outcome_of("still runs"), Some(&Outcome::Passed));
    assert_eq!(events.entries(), vec!["ran:still runs".to_owned()]);

    let failure = report.ensure_success().unwrap_err().to_string();
    assert!(failure.contains("broken assertion"));
    assert!(!failure.contains("still runs"));
}

#[tokio::test]
async fn error_returning_scenario_reports_failed() {
    init_tracing();
    let mut suite = Suite::new("error body");
    suite.run("rejected upload", |_ctx| async {
        Err("upload rejected: allocation full".into())
    });

    let report = suite.execute().await;
    assert_eq!(
        report.outcome_of("rejected upload"),
        Some(&Outcome::Failed(
            "upload rejected: allocation full".to_owned()
        ))
    );
}

#[tokio::test]
async fn failing_parallel_scenario_does_not_abort_siblings() {
    init_tracing();
    let mut suite = Suite::new("parallel isolation");

    suite.run("exploding", |_ctx| async {
        let response_ok = false;
        assert!(response_ok, "blobber returned garbage");
        Ok(())
    });
    suite.run("healthy one", |_ctx| async { Ok(()) });
    suite.run("healthy two", |_ctx| async { Ok(()) });

    let report = suite.execute().await;
    let summary = report.summary();
    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total(), 3);
}

#[tokio::test]
async fn duplicate_scenario_name_is_rejected_at_registration() {
    let mut suite = Suite::new("duplicates");
    let handle = suite
        .register("create wallet", ScenarioOptions::sequential(), |_ctx| async {
            Ok(())
        })
        .unwrap();
    assert_eq!(handle.name(), "create wallet");
    assert_eq!(handle.index(), 0);

    let error = suite
        .register("create wallet", ScenarioOptions::parallel(), |_ctx| async {
            Ok(())
        })
        .unwrap_err();
    assert_eq!(
        error,
        ConfigError::DuplicateScenario("create wallet".to_owned())
    );

    // The first registration stays intact and executes normally.
    let report = suite.execute().await;
    assert_eq!(report.summary().total(), 1);
    assert_eq!(report.outcome_of("create wallet"), Some(&Outcome::Passed));
}
