//! Race two futures; the loser is cancelled.
//!
//! The combinators here are the cancellation story for every timed wait in
//! this crate: the losing branch is dropped, releasing whatever it held,
//! before control returns to the caller. A timer that lost a race is not
//! still pending afterwards.

use std::future::Future;
use std::time::Duration;

use futures::future::{self, Either};
use futures::pin_mut;

use crate::timer::after;

/// Which side of a [`first_of`] race completed, and with what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner<A, B> {
    /// The first future completed; the second was cancelled.
    Left(A),
    /// The second future completed; the first was cancelled.
    Right(B),
}

/// Suspend until either future completes; drop the other.
///
/// When both sides become ready at the same poll, the left side wins
/// deterministically, so a completed result is never silently lost to a
/// cancellation the caller didn't ask for. The losing future is dropped
/// before this returns.
pub async fn first_of<A, B>(a: A, b: B) -> Winner<A::Output, B::Output>
where
    A: Future,
    B: Future,
{
    pin_mut!(a, b);
    match future::select(a, b).await {
        Either::Left((value, _loser)) => Winner::Left(value),
        Either::Right((value, _loser)) => Winner::Right(value),
    }
}

/// Run `fut` with a deadline.
///
/// Returns `Some(output)` if `fut` completes within `duration`, otherwise
/// cancels it and returns `None`.
pub async fn with_timeout<F>(duration: Duration, fut: F) -> Option<F::Output>
where
    F: Future,
{
    match first_of(after(duration), fut).await {
        Winner::Left(()) => None,
        Winner::Right(value) => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::time::sleep;

    /// Flags its drop, so a test can confirm a losing branch was cancelled.
    struct DroppedFlag(Arc<AtomicBool>);

    impl Drop for DroppedFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn short_timer_beats_long_timer() {
        let outcome = first_of(
            after(Duration::from_millis(10)),
            after(Duration::from_secs(30)),
        )
        .await;
        assert_eq!(outcome, Winner::Left(()));
    }

    #[tokio::test]
    async fn losing_branch_is_dropped_before_return() {
        let fired = Arc::new(AtomicBool::new(false));
        let dropped = Arc::new(AtomicBool::new(false));

        let guard = DroppedFlag(dropped.clone());
        let fired_flag = fired.clone();
        let loser = async move {
            let _guard = guard;
            sleep(Duration::from_secs(30)).await;
            fired_flag.store(true, Ordering::SeqCst);
        };

        let outcome = first_of(after(Duration::from_millis(10)), loser).await;
        assert_eq!(outcome, Winner::Left(()));
        assert!(dropped.load(Ordering::SeqCst), "loser still held its resources");
        assert!(!fired.load(Ordering::SeqCst), "loser ran to completion anyway");
    }

    #[tokio::test]
    async fn left_wins_when_both_sides_are_ready() {
        let outcome = first_of(future::ready(1), future::ready(2)).await;
        assert_eq!(outcome, Winner::Left(1));
    }

    #[tokio::test]
    async fn right_side_carries_its_value() {
        let outcome: Winner<(), u32> =
            first_of(after(Duration::from_secs(30)), async { 7 }).await;
        assert_eq!(outcome, Winner::Right(7));
    }

    #[tokio::test]
    async fn race_suspends_until_one_side_completes() {
        use crate::trigger::trigger;
        use tokio_test::{assert_pending, assert_ready_eq, task};

        let (fire, fired) = trigger();
        let mut race = task::spawn(first_of(fired.wait(), future::pending::<()>()));
        assert_pending!(race.poll());

        fire.fire(5u32);
        assert!(race.is_woken());
        assert_ready_eq!(race.poll(), Winner::Left(Ok(5)));
    }

    #[tokio::test]
    async fn with_timeout_returns_the_value_in_time() {
        let result = with_timeout(Duration::from_secs(5), async { 42 }).await;
        assert_eq!(result, Some(42));
    }

    #[tokio::test]
    async fn with_timeout_cancels_a_slow_future() {
        let dropped = Arc::new(AtomicBool::new(false));
        let guard = DroppedFlag(dropped.clone());
        let slow = async move {
            let _guard = guard;
            sleep(Duration::from_secs(30)).await;
            1
        };

        let result = with_timeout(Duration::from_millis(10), slow).await;
        assert_eq!(result, None);
        assert!(dropped.load(Ordering::SeqCst));
    }
}
