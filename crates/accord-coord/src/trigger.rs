//! Fire-once signals for manual event injection.
//!
//! A trigger models an external event the driver reports by hand, such as
//! "process exited". Any number of producer handles may race to fire it;
//! only the first firing takes effect, and the consumer side resolves to
//! that first value.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

/// Error returned when a fired value can never arrive.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TriggerError {
    /// Every [`Trigger`] handle was dropped before any of them fired.
    #[error("every trigger handle was dropped before firing")]
    Closed,
}

/// Create a fire-once signal.
///
/// Returns the producer handle and the consumer future. `Trigger` is
/// `Clone`, so several producers can hold one; [`Fired::wait`] resolves to
/// whichever value won.
pub fn trigger<T>() -> (Trigger<T>, Fired<T>) {
    let (sender, receiver) = oneshot::channel();
    (
        Trigger {
            sender: Arc::new(Mutex::new(Some(sender))),
        },
        Fired { receiver },
    )
}

/// Producer side of a fire-once signal.
pub struct Trigger<T> {
    sender: Arc<Mutex<Option<oneshot::Sender<T>>>>,
}

impl<T> Clone for Trigger<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T> Trigger<T> {
    /// Fire the signal.
    ///
    /// Safe to call any number of times across all clones; only the first
    /// call has effect. Returns `true` if this call is the one that fired
    /// and the consumer was still listening.
    pub fn fire(&self, value: T) -> bool {
        match self.sender.lock().take() {
            Some(sender) => sender.send(value).is_ok(),
            None => false,
        }
    }
}

impl<T> std::fmt::Debug for Trigger<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("fired", &self.sender.lock().is_none())
            .finish()
    }
}

/// Consumer side of a fire-once signal.
#[derive(Debug)]
pub struct Fired<T> {
    receiver: oneshot::Receiver<T>,
}

impl<T> Fired<T> {
    /// Suspend until the signal fires, resolving to the first fired value.
    ///
    /// Errors with [`TriggerError::Closed`] only if every producer handle
    /// was dropped without firing.
    pub async fn wait(self) -> Result<T, TriggerError> {
        self.receiver.await.map_err(|_| TriggerError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_fire_wins() {
        let (fire, fired) = trigger();
        assert!(fire.fire(1));
        assert!(!fire.fire(2));
        assert_eq!(fired.wait().await, Ok(1));
    }

    #[tokio::test]
    async fn clones_share_the_single_shot() {
        let (fire, fired) = trigger();
        let other = fire.clone();

        assert!(other.fire("exited"));
        assert!(!fire.fire("exited again"));
        assert_eq!(fired.wait().await, Ok("exited"));
    }

    #[tokio::test]
    async fn wait_suspends_until_fired() {
        let (fire, fired) = trigger();

        let waiter = tokio::spawn(fired.wait());
        tokio::task::yield_now().await;
        fire.fire(9u32);

        assert_eq!(waiter.await.expect("waiter panicked"), Ok(9));
    }

    #[tokio::test]
    async fn dropping_every_handle_closes_the_signal() {
        let (fire, fired) = trigger::<u32>();
        drop(fire);
        assert_eq!(fired.wait().await, Err(TriggerError::Closed));
    }

    #[tokio::test]
    async fn firing_after_the_consumer_dropped_reports_no_effect() {
        let (fire, fired) = trigger();
        drop(fired);
        assert!(!fire.fire(1));
    }
}
