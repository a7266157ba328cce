//! Cell<T> - a shared observable value with multicast change streams
//!
//! `Cell<T>` holds the most recently published value and fans every publish
//! out to all live subscriber queues. It is the primitive the harness driver
//! uses to watch independently-updating producers.
//!
//! # Atomicity
//!
//! One mutex guards the current value and the subscriber list together.
//! A subscription created concurrently with a publish either receives that
//! value on its queue or was created strictly after the publish completed;
//! publishes on one cell reach all subscribers in a single total order.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

struct CellInner<T> {
    /// Most recently published value, `None` before the first publish.
    value: Option<T>,
    /// Live subscriber queues, fed on every publish.
    subscribers: Vec<mpsc::UnboundedSender<T>>,
}

/// A shared, multicast, continuously-updatable observable value.
///
/// `Cell<T>` provides:
/// - [`publish`](Cell::publish): set the current value and notify all
///   existing subscribers
/// - [`observe`](Cell::observe): read the current value without subscribing
/// - [`subscribe`](Cell::subscribe): get a [`CellStream`] of future publishes
/// - [`map`](Cell::map) / [`combine`](crate::combine): derived cells
///
/// # Thread Safety
///
/// `Cell<T>` is `Send + Sync` and `Clone`; clones share the same state. A
/// cell is not owned by any single component; it lives while any publisher
/// or subscriber holds a clone of it.
///
/// # Example
///
/// ```rust,ignore
/// let cell = Cell::new();
/// let mut stream = cell.subscribe();
///
/// cell.publish(1);
/// assert_eq!(cell.observe(), Some(1));
/// assert_eq!(stream.recv().await, Some(1));
/// ```
pub struct Cell<T> {
    inner: Arc<Mutex<CellInner<T>>>,
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for Cell<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Cell<T>
where
    T: Clone + Send + 'static,
{
    /// Create a cell with no current value and zero subscribers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CellInner {
                value: None,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Set the current value and enqueue it onto every subscriber queue.
    ///
    /// The value update and the fan-out happen inside one critical section,
    /// so `publish` is linearizable with respect to concurrent `publish`
    /// and [`subscribe`](Cell::subscribe) calls on the same cell.
    pub fn publish(&self, value: T) {
        let mut inner = self.inner.lock();
        inner
            .subscribers
            .retain(|queue| queue.send(value.clone()).is_ok());
        inner.value = Some(value);
    }

    /// Read the current value without subscribing.
    ///
    /// Returns `None` if nothing has been published yet.
    pub fn observe(&self) -> Option<T> {
        self.inner.lock().value.clone()
    }

    /// Subscribe to future publishes.
    ///
    /// The returned stream receives every value published from this point
    /// forward, in publish order, exactly once, independent of all other
    /// subscribers' consumption rates. Values buffer without bound; a slow
    /// consumer is never skipped.
    pub fn subscribe(&self) -> CellStream<T> {
        let (queue, stream) = mpsc::unbounded_channel();
        self.inner.lock().subscribers.push(queue);
        CellStream { stream }
    }

    /// Snapshot the current value and subscribe in one critical section.
    ///
    /// Every publish is either reflected in the snapshot or queued on the
    /// stream, never both and never neither. The derivation operators rely
    /// on this for torn-read-free initialization.
    pub(crate) fn subscribe_with_current(&self) -> (Option<T>, CellStream<T>) {
        let (queue, stream) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        inner.subscribers.push(queue);
        (inner.value.clone(), CellStream { stream })
    }

    /// Mutate the current value in place and fan out the result.
    ///
    /// Used by [`combine`](crate::combine) to update one vector slot
    /// without losing concurrent updates to other slots.
    ///
    /// # Panics
    ///
    /// Panics if the cell has no current value; callers only use this on
    /// cells they seeded at creation, so an empty cell here is a wiring bug.
    pub(crate) fn update(&self, mutate: impl FnOnce(&mut T)) {
        let mut inner = self.inner.lock();
        let value = inner
            .value
            .as_mut()
            .expect("update on a cell that was never published");
        mutate(value);
        let snapshot = value.clone();
        inner
            .subscribers
            .retain(|queue| queue.send(snapshot.clone()).is_ok());
    }
}

impl<T: Clone + Send + std::fmt::Debug + 'static> std::fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell").field("value", &self.observe()).finish()
    }
}

/// An independent, ordered stream of one cell's publishes.
///
/// Created by [`Cell::subscribe`]. Each stream has its own queue: consuming
/// from one stream never affects another, and values wait until the consumer
/// is ready for them.
#[derive(Debug)]
pub struct CellStream<T> {
    stream: mpsc::UnboundedReceiver<T>,
}

impl<T> CellStream<T> {
    /// Receive the next published value, suspending until one is available.
    ///
    /// Returns `None` once every clone of the originating cell has been
    /// dropped and the queue has drained.
    pub async fn recv(&mut self) -> Option<T> {
        self.stream.recv().await
    }
}
