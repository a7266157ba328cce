//! Derivation operators: cells computed from other cells.
//!
//! Both operators take their initial snapshot and their subscription from
//! the source inside one critical section, so the derived cell starts from
//! a consistent instant and never misses an upstream publish. Propagation
//! after that is asynchronous: a background task per source forwards each
//! publish, so a derived read may lag a very recent upstream publish by one
//! replication step. No ordering is imposed across different sources.

use crate::cell::Cell;
use crate::latest::LatestVector;
use crate::registry::TaskRegistry;

impl<T> Cell<T>
where
    T: Clone + Send + 'static,
{
    /// Derive a cell whose value is `f` applied to this cell's value.
    ///
    /// The derived cell starts as `f` of the source's current value
    /// (nothing, if the source has not published yet) and thereafter
    /// republishes `f(v)` for every source publish, in order. The
    /// replication task lives in `registry`.
    pub fn map<U, F>(&self, registry: &TaskRegistry, f: F) -> Cell<U>
    where
        U: Clone + Send + 'static,
        F: Fn(T) -> U + Send + 'static,
    {
        let (current, mut stream) = self.subscribe_with_current();
        let derived = Cell::new();
        if let Some(value) = current {
            derived.publish(f(value));
        }

        let target = derived.clone();
        registry.spawn_cancellable(async move {
            while let Some(value) = stream.recv().await {
                target.publish(f(value));
            }
        });

        derived
    }
}

/// Derive a cell holding the latest value from each of `sources`.
///
/// The combined cell starts from a vector of creation-time snapshots, one
/// slot per source. Each source then gets its own replication task in
/// `registry`: on every publish from that source, only its slot is updated
/// and the whole vector is republished, so downstream subscribers see every
/// intermediate vector state. Slot updates for different sources are not
/// synchronized with each other: a published vector may show source `i`
/// advanced while source `j` is still behind, even for publishes that were
/// issued back to back.
pub fn combine<T>(sources: &[Cell<T>], registry: &TaskRegistry) -> Cell<LatestVector<T>>
where
    T: Clone + Send + 'static,
{
    let mut vector = LatestVector::new(sources.len());
    let mut streams = Vec::with_capacity(sources.len());
    for (slot, source) in sources.iter().enumerate() {
        let (current, stream) = source.subscribe_with_current();
        if let Some(value) = current {
            vector.set(slot, value);
        }
        streams.push(stream);
    }

    let combined = Cell::new();
    combined.publish(vector);

    for (slot, mut stream) in streams.into_iter().enumerate() {
        let target = combined.clone();
        registry.spawn_cancellable(async move {
            while let Some(value) = stream.recv().await {
                tracing::trace!(slot, "replicating source publish into combined vector");
                target.update(|vector| vector.set(slot, value));
            }
        });
    }

    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    // Forwarding runs on spawned tasks; give the scheduler a beat.
    async fn settle() {
        sleep(Duration::from_millis(30)).await;
    }

    #[tokio::test]
    async fn map_snapshots_the_source_at_creation() {
        let registry = TaskRegistry::new();
        let source = Cell::new();
        source.publish(5);

        let doubled = source.map(&registry, |x: u32| x * 2);
        assert_eq!(doubled.observe(), Some(10));
    }

    #[tokio::test]
    async fn map_of_an_unpublished_source_starts_empty() {
        let registry = TaskRegistry::new();
        let source: Cell<u32> = Cell::new();

        let doubled = source.map(&registry, |x| x * 2);
        assert_eq!(doubled.observe(), None);

        source.publish(4);
        settle().await;
        assert_eq!(doubled.observe(), Some(8));
    }

    #[tokio::test]
    async fn map_forwards_every_publish_in_order() {
        let registry = TaskRegistry::new();
        let source = Cell::new();
        let doubled = source.map(&registry, |x: u32| x * 2);
        let mut stream = doubled.subscribe();

        for v in 1..=4 {
            source.publish(v);
        }

        for v in 1..=4 {
            assert_eq!(stream.recv().await, Some(v * 2));
        }
    }

    #[tokio::test]
    async fn map_stops_when_the_registry_shuts_down() {
        let registry = TaskRegistry::new();
        let source = Cell::new();
        let doubled = source.map(&registry, |x: u32| x + 1);

        source.publish(1);
        settle().await;
        assert_eq!(doubled.observe(), Some(2));

        registry.shutdown();
        source.publish(10);
        settle().await;
        assert_eq!(doubled.observe(), Some(2));
    }

    #[tokio::test]
    async fn combine_seeds_slots_from_current_values() {
        let registry = TaskRegistry::new();
        let a = Cell::new();
        let b = Cell::new();
        a.publish(1u32);

        let view = combine(&[a, b], &registry);
        let vector = view.observe().expect("combined cell is seeded at creation");
        assert_eq!(vector.get(0), Some(&1));
        assert_eq!(vector.get(1), None);
    }

    #[tokio::test]
    async fn combine_of_no_sources_is_the_empty_vector() {
        let registry = TaskRegistry::new();
        let view = combine::<u32>(&[], &registry);
        let vector = view.observe().expect("combined cell is seeded at creation");
        assert!(vector.is_empty());
    }

    #[tokio::test]
    async fn combine_publishes_every_intermediate_vector_state() {
        let registry = TaskRegistry::new();
        let a = Cell::new();
        let b = Cell::new();
        let view = combine(&[a.clone(), b.clone()], &registry);
        let mut states = view.subscribe();

        a.publish(1u32);
        let first = states.recv().await.expect("first slot update");
        assert_eq!(first.get(0), Some(&1));
        assert_eq!(first.get(1), None);

        b.publish(2);
        let second = states.recv().await.expect("second slot update");
        assert_eq!(second.get(0), Some(&1));
        assert_eq!(second.get(1), Some(&2));
    }

    #[tokio::test]
    async fn combine_keeps_the_latest_value_per_slot() {
        let registry = TaskRegistry::new();
        let a = Cell::new();
        let view = combine(&[a.clone()], &registry);

        a.publish(1u32);
        a.publish(2);
        a.publish(3);
        settle().await;

        let vector = view.observe().expect("combined cell is seeded at creation");
        assert_eq!(vector.get(0), Some(&3));
    }

    #[tokio::test]
    async fn combine_misses_nothing_published_after_creation() {
        let registry = TaskRegistry::new();
        let sources: Vec<Cell<u32>> = (0..3).map(|_| Cell::new()).collect();
        let view = combine(&sources, &registry);

        for (i, source) in sources.iter().enumerate() {
            source.publish(i as u32);
        }
        settle().await;

        let vector = view.observe().expect("combined cell is seeded at creation");
        assert!(vector.is_complete());
        for i in 0..3 {
            assert_eq!(vector.get(i), Some(&(i as u32)));
        }
    }
}
