use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::{sync::Mutex, task::JoinSet};
use tracing::{debug, error, warn};

use super::{
    unit::{run_unit, UnitOutcome},
    RunContext,
};
use crate::suite::{
    registry::{ExecMode, Scenario, SetupPolicy},
    report::{Outcome, Reporter, ScenarioReport, SkipCause, SuiteReport},
    setup::SetupCoordinator,
    smoke::SmokeFilter,
};

/// Drives one suite to completion: setup first, then a single ordered walk of
/// the registry that keeps sequential scenarios on one lane and fans parallel
/// ones out onto their own tasks. Every registered scenario produces exactly
/// one outcome.
pub(crate) async fn drive<F: Send + 'static>(
    suite: Arc<str>,
    scenarios: Vec<Scenario<F>>,
    smoke: SmokeFilter,
    mut setup: SetupCoordinator<F>,
    fixture: Arc<Mutex<F>>,
    reporter: Arc<dyn Reporter>,
) -> SuiteReport {
    warn_unmatched_smoke_names(&smoke, &scenarios);

    let setup_name: Arc<str> = Arc::from(setup.hook_name().unwrap_or("setup"));
    let setup_ctx = RunContext::new(Arc::clone(&suite), setup_name, Arc::clone(&fixture));
    let setup_outcome = setup.ensure_run(setup_ctx).await;
    if !setup_outcome.is_success() {
        warn!(
            suite = %suite,
            ?setup_outcome,
            "suite setup did not succeed; dependent scenarios will be skipped"
        );
    }

    let mut slots: Vec<Option<ScenarioReport>> = Vec::new();
    slots.resize_with(scenarios.len(), || None);
    let mut parallel: JoinSet<(usize, ScenarioReport)> = JoinSet::new();

    for scenario in scenarios {
        let index = scenario.index;

        if !setup_outcome.is_success() && scenario.setup == SetupPolicy::DependsOnSetup {
            let entry = ScenarioReport::new(
                scenario.name,
                Outcome::Skipped(SkipCause::SetupFailed),
                Duration::ZERO,
            );
            reporter.report(&suite, &entry);
            slots[index] = Some(entry);
            continue;
        }

        if !smoke.should_run(&scenario.name) {
            let entry = ScenarioReport::new(
                scenario.name,
                Outcome::Skipped(SkipCause::NotInSmokeSet),
                Duration::ZERO,
            );
            reporter.report(&suite, &entry);
            slots[index] = Some(entry);
            continue;
        }

        let ctx = RunContext::new(
            Arc::clone(&suite),
            Arc::from(scenario.name.as_str()),
            Arc::clone(&fixture),
        );
        match scenario.mode {
            ExecMode::Sequential => {
                // The lane blocks here until the scenario's outcome lands.
                let entry = execute_scenario(scenario, ctx).await;
                reporter.report(&suite, &entry);
                slots[index] = Some(entry);
            }
            ExecMode::Parallel => {
                parallel.spawn(async move { (index, execute_scenario(scenario, ctx).await) });
            }
        }
    }

    while let Some(joined) = parallel.join_next().await {
        match joined {
            Ok((index, entry)) => {
                reporter.report(&suite, &entry);
                slots[index] = Some(entry);
            }
            Err(join_error) => {
                // Unreachable in practice: body panics are recovered inside
                // the execution unit, and dispatch tasks are never aborted.
                error!(suite = %suite, %join_error, "parallel dispatch task failed");
            }
        }
    }

    SuiteReport::new(suite, slots.into_iter().flatten().collect())
}

async fn execute_scenario<F: Send + 'static>(
    scenario: Scenario<F>,
    ctx: RunContext<F>,
) -> ScenarioReport {
    debug!(
        suite = ctx.suite_name(),
        scenario = %scenario.name,
        mode = ?scenario.mode,
        timeout = ?scenario.timeout,
        "scenario started"
    );

    let started = Instant::now();
    let outcome = match run_unit((scenario.body)(ctx), scenario.timeout).await {
        UnitOutcome::Completed => Outcome::Passed,
        UnitOutcome::Failed(reason) => Outcome::Failed(reason),
        UnitOutcome::TimedOut => Outcome::TimedOut,
    };

    ScenarioReport::new(scenario.name, outcome, started.elapsed())
}

fn warn_unmatched_smoke_names<F>(smoke: &SmokeFilter, scenarios: &[Scenario<F>]) {
    for name in smoke.unmatched(scenarios.iter().map(|scenario| scenario.name.as_str())) {
        warn!(
            smoke_test = %name,
            "smoke set names a scenario that is not registered in this suite"
        );
    }
}
