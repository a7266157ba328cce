//! Bounded-concurrency batch execution.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Run `task` over every item with at most `limit` running concurrently.
///
/// The result vector is index-aligned with `items`: the output at index `k`
/// came from `items[k]`, regardless of which task finished first. Task
/// bodies start only once a permit is held, so no more than `limit` are ever
/// in flight at once.
///
/// The first task error fails the whole batch. Remaining in-flight tasks
/// are aborted best-effort, not awaited; their outcomes are undefined, and
/// callers needing strict cleanup must layer it on top. A panicking task
/// panics the batch on the caller.
///
/// # Panics
///
/// Panics if `limit` is zero; a zero-permit pool could never run anything.
pub async fn run_bounded<I, O, E, F, Fut>(
    limit: usize,
    items: Vec<I>,
    task: F,
) -> Result<Vec<O>, E>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<O, E>> + Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
{
    assert!(limit > 0, "run_bounded requires a non-zero concurrency limit");

    let total = items.len();
    let permits = Arc::new(Semaphore::new(limit));
    let mut running = JoinSet::new();
    for (index, item) in items.into_iter().enumerate() {
        let permits = permits.clone();
        let work = task(item);
        running.spawn(async move {
            // The semaphore is never closed, so acquisition only ends with a permit.
            let _permit = permits
                .acquire_owned()
                .await
                .expect("batch semaphore closed");
            (index, work.await)
        });
    }

    let mut outputs: Vec<Option<O>> = Vec::with_capacity(total);
    outputs.resize_with(total, || None);
    while let Some(joined) = running.join_next().await {
        match joined {
            Ok((index, Ok(output))) => {
                tracing::trace!(index, total, "batch task finished");
                outputs[index] = Some(output);
            }
            // Dropping `running` aborts the rest of the batch.
            Ok((_, Err(error))) => return Err(error),
            Err(join_error) => match join_error.try_into_panic() {
                Ok(payload) => std::panic::resume_unwind(payload),
                Err(join_error) => panic!("batch task aborted outside the runner: {join_error}"),
            },
        }
    }

    Ok(outputs
        .into_iter()
        .map(|slot| slot.expect("joined batch left a slot unfilled"))
        .collect())
}
