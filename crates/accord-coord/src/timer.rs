//! One-shot timers.

use std::future::Future;
use std::time::Duration;

/// Complete once, after `duration` elapses.
///
/// The timer has no cancellation handle of its own; dropping the future
/// cancels it, which is what [`first_of`](crate::first_of) does to a losing
/// branch.
pub fn after(duration: Duration) -> impl Future<Output = ()> {
    tokio::time::sleep(duration)
}
