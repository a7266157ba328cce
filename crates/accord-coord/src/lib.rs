//! Accord-Coord: Timed Coordination for Test Harness Drivers
//!
//! Built on the cells from `accord-cell`, this crate decides within a
//! bounded quiet window whether a fixed set of producers agrees, and
//! supplies the timing and batching tools the driver needs around that
//! decision:
//!
//! - [`converge`]: watch N cells until a full quiet window passes, then
//!   report [`Consensus::Agreed`] or [`Consensus::Diverged`].
//! - [`first_of`] / [`with_timeout`]: race two futures, cancel the loser;
//!   give any wait a deadline.
//! - [`after`]: a one-shot timer.
//! - [`trigger`]: a fire-once signal for manual event injection.
//! - [`run_bounded`]: run a batch of independent tasks with a cap on
//!   simultaneous execution, results index-aligned with the input.
//!
//! None of this installs a tracing subscriber or owns a runtime; it is a
//! library layer whose results and failures propagate to the calling
//! driver.

pub mod consensus;
pub mod pool;
pub mod race;
pub mod timer;
pub mod trigger;

pub use consensus::{converge, Consensus};
pub use pool::run_bounded;
pub use race::{first_of, with_timeout, Winner};
pub use timer::after;
pub use trigger::{trigger, Fired, Trigger, TriggerError};
