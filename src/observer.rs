//! Observer registry and step-count delivery.
//!
//! Observers are opaque callback capabilities; the registry holds a clone of
//! each `Arc` but never manages observer lifetime beyond that. Registration
//! order is delivery order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Host-supplied callback capability interested in step-count updates.
///
/// `on_step_change` is invoked synchronously from the sensor callback, so
/// implementations must be brief and must not block.
pub trait StepObserver: Send + Sync {
    /// The cumulative step count reported by the platform changed.
    fn on_step_change(&self, count: u32);
}

/// Identity-keyed, insertion-ordered set of step observers.
///
/// Identity is `Arc` allocation identity: registering a clone of an already
/// registered `Arc` is a no-op, while a second `Arc` wrapping a distinct
/// allocation counts as a different observer.
pub struct ObserverRegistry {
    observers: Mutex<Vec<Arc<dyn StepObserver>>>,
    steps_forwarded: AtomicU64,
    events_ignored: AtomicU64,
    notifications: AtomicU64,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
            steps_forwarded: AtomicU64::new(0),
            events_ignored: AtomicU64::new(0),
            notifications: AtomicU64::new(0),
        }
    }

    /// Add `observer` unless it is already registered. Returns whether the
    /// registry changed.
    pub fn register(&self, observer: Arc<dyn StepObserver>) -> bool {
        let mut observers = self.lock();
        if observers.iter().any(|o| Arc::ptr_eq(o, &observer)) {
            return false;
        }
        observers.push(observer);
        debug!(observers = observers.len(), "observer registered");
        true
    }

    /// Remove `observer` if present. Returns whether the registry changed.
    pub fn unregister(&self, observer: &Arc<dyn StepObserver>) -> bool {
        let mut observers = self.lock();
        let before = observers.len();
        observers.retain(|o| !Arc::ptr_eq(o, observer));
        let removed = observers.len() != before;
        if removed {
            debug!(observers = observers.len(), "observer unregistered");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Deliver `count` to every registered observer, in registration order.
    ///
    /// The list is snapshotted under the lock and the callbacks run outside
    /// it, so observers may re-enter the registry.
    pub fn notify_step(&self, count: u32) {
        let snapshot: Vec<Arc<dyn StepObserver>> = self.lock().clone();
        self.steps_forwarded.fetch_add(1, Ordering::Relaxed);
        self.notifications
            .fetch_add(snapshot.len() as u64, Ordering::Relaxed);
        for observer in snapshot {
            observer.on_step_change(count);
        }
    }

    /// Record a sample that was dropped by the sensor-type filter.
    pub fn record_ignored(&self) {
        self.events_ignored.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of the delivery counters.
    pub fn stats(&self) -> DeliveryStats {
        DeliveryStats {
            steps_forwarded: self.steps_forwarded.load(Ordering::Relaxed),
            events_ignored: self.events_ignored.load(Ordering::Relaxed),
            notifications: self.notifications.load(Ordering::Relaxed),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Arc<dyn StepObserver>>> {
        match self.observers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of how many events the bridge has seen and forwarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryStats {
    /// Step-counter samples forwarded to observers
    pub steps_forwarded: u64,
    /// Samples dropped by the sensor-type filter
    pub events_ignored: u64,
    /// Individual observer callbacks made
    pub notifications: u64,
}

/// Observer adapter that forwards step counts into a bounded channel.
///
/// Useful for hosts that prefer draining a receiver over implementing
/// [`StepObserver`]. When the channel is full the count is dropped rather
/// than blocking the sensor callback.
pub struct ChannelObserver {
    sender: Sender<u32>,
}

impl ChannelObserver {
    /// Create an observer and the receiver it feeds, with room for
    /// `capacity` undrained counts.
    pub fn bounded(capacity: usize) -> (Arc<Self>, Receiver<u32>) {
        let (sender, receiver) = bounded(capacity);
        (Arc::new(Self { sender }), receiver)
    }
}

impl StepObserver for ChannelObserver {
    fn on_step_change(&self, count: u32) {
        let _ = self.sender.try_send(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        counts: Mutex<Vec<u32>>,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                counts: Mutex::new(Vec::new()),
            })
        }

        fn counts(&self) -> Vec<u32> {
            self.counts.lock().unwrap().clone()
        }
    }

    impl StepObserver for Recorder {
        fn on_step_change(&self, count: u32) {
            self.counts.lock().unwrap().push(count);
        }
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let registry = ObserverRegistry::new();
        let observer = Recorder::new();

        assert!(registry.register(observer.clone()));
        assert!(!registry.register(observer.clone()));
        assert_eq!(registry.len(), 1);

        registry.notify_step(10);
        assert_eq!(observer.counts(), vec![10]);
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let registry = ObserverRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        struct Tagged {
            tag: &'static str,
            order: Arc<Mutex<Vec<&'static str>>>,
        }

        impl StepObserver for Tagged {
            fn on_step_change(&self, _count: u32) {
                self.order.lock().unwrap().push(self.tag);
            }
        }

        registry.register(Arc::new(Tagged {
            tag: "first",
            order: order.clone(),
        }));
        registry.register(Arc::new(Tagged {
            tag: "second",
            order: order.clone(),
        }));

        registry.notify_step(1);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_unregister_stops_delivery() {
        let registry = ObserverRegistry::new();
        let observer = Recorder::new();
        let kept = Recorder::new();

        registry.register(observer.clone());
        registry.register(kept.clone());
        registry.notify_step(1);

        let as_dyn: Arc<dyn StepObserver> = observer.clone();
        assert!(registry.unregister(&as_dyn));
        assert!(!registry.unregister(&as_dyn));
        registry.notify_step(2);

        assert_eq!(observer.counts(), vec![1]);
        assert_eq!(kept.counts(), vec![1, 2]);
    }

    #[test]
    fn test_stats_count_forwarded_and_ignored() {
        let registry = ObserverRegistry::new();
        registry.register(Recorder::new());
        registry.register(Recorder::new());

        registry.notify_step(5);
        registry.record_ignored();

        let stats = registry.stats();
        assert_eq!(stats.steps_forwarded, 1);
        assert_eq!(stats.events_ignored, 1);
        assert_eq!(stats.notifications, 2);
    }

    #[test]
    fn test_channel_observer_forwards_counts() {
        let registry = ObserverRegistry::new();
        let (observer, receiver) = ChannelObserver::bounded(16);
        registry.register(observer);

        registry.notify_step(3);
        registry.notify_step(4);

        assert_eq!(receiver.try_recv(), Ok(3));
        assert_eq!(receiver.try_recv(), Ok(4));
        assert!(receiver.try_recv().is_err());
    }
}
