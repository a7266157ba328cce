//! Convergence detection over a set of observed cells.
//!
//! The detector watches every source through one combined cell and decides
//! only after a full quiet window: a stretch of `window` with no publish
//! from any source. Any change restarts the window from zero.

use std::time::Duration;

use accord_cell::{combine, Cell, LatestVector, TaskRegistry};

use crate::race::{first_of, Winner};
use crate::timer::after;

/// The decision artifact of [`converge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consensus<T> {
    /// Every source reported the same value.
    Agreed(T),
    /// The quiet window elapsed with a source silent or sources
    /// disagreeing; the vector carries the partial state for diagnostics.
    Diverged(LatestVector<T>),
}

/// Watch `sources` until they agree or stay quiet too long.
///
/// Combines the sources into one latest-value vector, then repeatedly races
/// a fresh `window` timer against the next vector change:
///
/// - timer first: read the vector and decide. [`Consensus::Agreed`] if it
///   is complete and unanimous, otherwise [`Consensus::Diverged`] (which is
///   also the verdict for zero sources, after one full window).
/// - change first: no decision; the race restarts with a full `window`.
///
/// The window is relative to the last change, not an absolute deadline:
/// sources that keep publishing inside every window keep the call alive
/// indefinitely. Callers that need a hard bound should wrap the call, e.g.
/// `with_timeout(cap, converge(window, &sources))`.
///
/// Replication for the combined view runs in a detector-owned
/// [`TaskRegistry`] and stops when the call returns.
pub async fn converge<T>(window: Duration, sources: &[Cell<T>]) -> Consensus<T>
where
    T: Clone + Eq + Send + 'static,
{
    let registry = TaskRegistry::new();
    let updates = combine(sources, &registry);
    let mut changes = updates.subscribe();

    loop {
        match first_of(after(window), changes.recv()).await {
            Winner::Left(()) => {
                let vector = updates
                    .observe()
                    .expect("combined cell lost its vector");
                let agreed = vector.unanimous().cloned();
                tracing::debug!(
                    sources = vector.len(),
                    agreed = agreed.is_some(),
                    "quiet window elapsed, deciding"
                );
                return match agreed {
                    Some(value) => Consensus::Agreed(value),
                    None => Consensus::Diverged(vector),
                };
            }
            Winner::Right(Some(_vector)) => {
                tracing::trace!("source changed, restarting quiet window");
            }
            Winner::Right(None) => {
                // `updates` is alive for the whole loop, so its stream
                // cannot end before we drop it.
                unreachable!("combined cell dropped while converge still holds it")
            }
        }
    }
}
