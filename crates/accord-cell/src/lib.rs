//! Accord-Cell: Multicast Observable Values
//!
//! This crate provides the reactive layer used by harness coordination:
//! shared cells that any number of producers publish into and any number of
//! consumers observe or stream from, plus the operators that derive cells
//! from other cells.
//!
//! # Core Types
//!
//! - [`Cell<T>`]: a shared, multicast, continuously-updatable observable
//!   value. Publishing atomically updates the current value and fans the
//!   value out to every subscriber queue.
//!
//! - [`CellStream<T>`]: an independent, ordered stream of one cell's future
//!   publishes, created via [`Cell::subscribe`].
//!
//! - [`LatestVector<T>`]: the per-source latest-value view produced by
//!   [`combine`], one optional slot per upstream cell.
//!
//! - [`TaskRegistry`]: owns the background replication tasks spawned by the
//!   derivation operators; dropping the registry stops them.
//!
//! # Design Principles
//!
//! 1. **One critical section**: a cell's current value and its subscriber
//!    list are guarded by a single lock, so `publish` and `subscribe` are
//!    linearizable with respect to each other and no subscriber can miss a
//!    publish that completed before its subscription did.
//!
//! 2. **Queues, not coalescing**: every subscriber gets every publish, in
//!    order, buffered without bound. Consumers that fall behind buffer;
//!    they are never skipped.
//!
//! 3. **Scoped replication**: derivation operators spawn their forwarding
//!    tasks into a caller-supplied [`TaskRegistry`]. The enclosing
//!    coordination scope owns and eventually cancels them; no task outlives
//!    its registry.
//!
//! # Usage
//!
//! ```rust,ignore
//! use accord_cell::{combine, Cell, TaskRegistry};
//!
//! let registry = TaskRegistry::new();
//! let nodes: Vec<Cell<u64>> = (0..3).map(|_| Cell::new()).collect();
//! let view = combine(&nodes, &registry);
//!
//! nodes[0].publish(7);
//! // view's vector now carries 7 in slot 0 once replication runs.
//! ```

pub mod cell;
pub mod latest;
pub mod ops;
pub mod registry;

pub use cell::{Cell, CellStream};
pub use latest::LatestVector;
pub use ops::combine;
pub use registry::TaskRegistry;
