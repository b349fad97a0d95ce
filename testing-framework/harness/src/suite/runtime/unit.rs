use std::{any::Any, panic::AssertUnwindSafe, time::Duration};

use futures::{future::BoxFuture, FutureExt as _};
use tokio::time::timeout;

use crate::DynError;

/// What one isolated execution unit produced.
#[derive(Debug)]
pub(crate) enum UnitOutcome {
    Completed,
    Failed(String),
    TimedOut,
}

/// Runs one body on its own task with panic recovery, racing an optional
/// deadline from the outside.
///
/// On expiry the task gets a best-effort abort and is abandoned rather than
/// awaited, so a stuck body cannot block the lane; whatever survives the
/// abort dies with the suite's runtime, not the process.
pub(crate) async fn run_unit(
    body: BoxFuture<'static, Result<(), DynError>>,
    deadline: Option<Duration>,
) -> UnitOutcome {
    let task = tokio::spawn(AssertUnwindSafe(body).catch_unwind());
    let abort = task.abort_handle();

    let joined = match deadline {
        Some(limit) => match timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_elapsed) => {
                abort.abort();
                return UnitOutcome::TimedOut;
            }
        },
        None => task.await,
    };

    match joined {
        Ok(Ok(Ok(()))) => UnitOutcome::Completed,
        Ok(Ok(Err(error))) => UnitOutcome::Failed(error.to_string()),
        Ok(Err(panic)) => UnitOutcome::Failed(panic_message(panic)),
        Err(join_error) if join_error.is_panic() => {
            UnitOutcome::Failed(panic_message(join_error.into_panic()))
        }
        Err(join_error) if join_error.is_cancelled() => {
            UnitOutcome::Failed("execution unit cancelled".to_owned())
        }
        Err(join_error) => UnitOutcome::Failed(format!("execution unit failed: {join_error}")),
    }
}

/// Attempts to turn a panic payload into a readable string for diagnostics.
fn panic_message(panic: Box<dyn Any + Send>) -> String {
    panic.downcast::<String>().map_or_else(
        |panic| {
            panic.downcast::<&'static str>().map_or_else(
                |_| "unknown panic".to_owned(),
                |message| (*message).to_owned(),
            )
        },
        |message| *message,
    )
}
