//! Change-subscription primitives.
//!
//! A subscription delivers the full current matching set on registration
//! and again after every commit that touches a matching record -- never a
//! diff. Deliveries for one subscription are strictly ordered; nothing is
//! guaranteed across subscriptions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

/// A live change-subscription on one collection.
///
/// The initial snapshot is already queued on the channel when the
/// subscription is handed out, so the first `next_snapshot()` resolves
/// without waiting for a mutation.
pub struct Subscription<T> {
    receiver: mpsc::UnboundedReceiver<Vec<T>>,
    handle: SubscriptionHandle,
}

impl<T> Subscription<T> {
    /// Assemble a subscription from its snapshot channel and teardown
    /// handle. Store implementations are expected to have queued the
    /// initial snapshot on `receiver` already.
    pub fn new(receiver: mpsc::UnboundedReceiver<Vec<T>>, handle: SubscriptionHandle) -> Self {
        Self { receiver, handle }
    }

    /// Await the next snapshot. Returns `None` once the subscription has
    /// been cancelled and the queue drained.
    pub async fn next_snapshot(&mut self) -> Option<Vec<T>> {
        self.receiver.recv().await
    }

    /// A clone of this subscription's teardown handle.
    pub fn handle(&self) -> SubscriptionHandle {
        self.handle.clone()
    }

    /// Split into the raw snapshot receiver and the teardown handle.
    /// Used by the fan-out layer, which stores handles keyed by project id
    /// and drives receivers through a `StreamMap`.
    pub fn into_parts(self) -> (mpsc::UnboundedReceiver<Vec<T>>, SubscriptionHandle) {
        (self.receiver, self.handle)
    }
}

/// Teardown handle for a [`Subscription`].
///
/// `cancel()` is idempotent: the first call unregisters the subscriber from
/// the store, every later call is a no-op. After `cancel()` returns, no new
/// snapshot is queued (snapshots committed before the call may still be
/// sitting in the channel).
///
/// Dropping the handle does NOT cancel -- handles are held by the fan-out
/// manager and torn down explicitly.
#[derive(Clone)]
pub struct SubscriptionHandle {
    cancelled: Arc<AtomicBool>,
    unregister: Arc<dyn Fn() + Send + Sync>,
}

impl SubscriptionHandle {
    /// Wrap an unregister action. The action runs exactly once, on the
    /// first `cancel()` call.
    pub fn new(unregister: Arc<dyn Fn() + Send + Sync>) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            unregister,
        }
    }

    /// Unregister the subscriber. Safe to call any number of times.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            (self.unregister)();
        }
    }

    /// Whether `cancel()` has been invoked.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
