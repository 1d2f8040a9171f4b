//! Post-checkout notifications.

use crate::checkout::Order;

/// Receives finalized orders after they are persisted.
///
/// `notify` must return immediately. Implementations that do I/O spawn
/// their own task, swallow failures after logging them, and never retry;
/// the checkout result does not depend on them.
pub trait OrderNotifier: Send + Sync {
    fn notify(&self, order: &Order);
}

/// Notifier that does nothing, used when no webhook is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl OrderNotifier for NoopNotifier {
    fn notify(&self, order: &Order) {
        tracing::trace!(order_id = %order.id, "no order notifier configured");
    }
}
