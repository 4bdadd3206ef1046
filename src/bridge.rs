//! The step bridge: a permission-gated adapter between the host platform's
//! step-counter sensor and registered observers.
//!
//! The bridge owns no platform resources itself. The host passes a
//! [`SensorHost`] handle into each entry point, the bridge checks the
//! motion-activity-recognition permission, subscribes once, and from then on
//! forwards every step-counter sample to the observer registry. All failures
//! are local: they are logged and the bridge stays idle until the host
//! drives the permission flow and initializes again.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::observer::{DeliveryStats, ObserverRegistry, StepObserver};
use crate::platform::{
    PermissionState, RawSensorEvent, SamplingRate, SensorEventListener, SensorHost, SensorKind,
};

/// Request identifier tagged onto the permission dialog so the host can
/// route the result back through [`StepBridge::on_permission_result`].
pub const STEP_PERMISSION_REQUEST_CODE: u32 = 111;

/// Platform API level that introduced the runtime motion permission. Older
/// platforms grant sensor access at install time.
pub const RUNTIME_PERMISSION_MIN_SDK: u32 = 29;

/// Configuration for the bridge's sensor subscription.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Delivery rate requested from the host
    pub sampling: SamplingRate,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            sampling: SamplingRate::Normal,
        }
    }
}

/// Lifecycle state of the bridge.
///
/// `Active` is terminal: there is no teardown operation, and the sensor
/// subscription persists for as long as the host keeps the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// Not yet subscribed; permission state unknown or denied
    Uninitialized,
    /// Permission dialog shown, waiting for the host to report the result
    PermissionPending,
    /// Subscription live, events flowing to observers
    Active,
}

/// Mediates between the host's step-counter sensor and application-level
/// observers. One bridge per process, owned by the host's composition root.
pub struct StepBridge {
    config: BridgeConfig,
    state: BridgeState,
    registry: Arc<ObserverRegistry>,
}

/// The listener handed to the host on subscribe. Filters for step-counter
/// samples and fans them out through the shared registry.
struct StepForwarder {
    registry: Arc<ObserverRegistry>,
}

impl SensorEventListener for StepForwarder {
    fn on_sensor_changed(&self, event: &RawSensorEvent) {
        match event.as_step_count() {
            Some(count) => {
                debug!(count, "step count updated");
                self.registry.notify_step(count);
            }
            None => self.registry.record_ignored(),
        }
    }
}

impl StepBridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            state: BridgeState::Uninitialized,
            registry: Arc::new(ObserverRegistry::new()),
        }
    }

    /// Check the motion permission and subscribe to the step counter.
    ///
    /// Idempotent: once the bridge is `Active` further calls return
    /// immediately. Every failure path (missing host, denied permission,
    /// absent sensor, rejected subscription) is logged and leaves the bridge
    /// exactly as it was, with no partial subscription state.
    pub fn initialize(&mut self, host: Option<&dyn SensorHost>) {
        let Some(host) = host else {
            error!("initialize called without a host context");
            return;
        };
        if self.state == BridgeState::Active {
            return;
        }
        if !host.permission_state().is_granted() {
            warn!("activity recognition permission denied; step bridge stays idle");
            return;
        }
        let Some(sensor) = host.default_sensor(SensorKind::StepCounter) else {
            warn!("no step counter sensor on this device");
            return;
        };
        let forwarder = Arc::new(StepForwarder {
            registry: self.registry.clone(),
        });
        match host.subscribe(&sensor, forwarder, self.config.sampling) {
            Ok(()) => {
                self.state = BridgeState::Active;
                info!(sensor = %sensor.name, "step bridge active");
            }
            Err(e) => warn!(error = %e, "could not subscribe to step counter"),
        }
    }

    /// Trigger the OS permission dialog, tagged with
    /// [`STEP_PERMISSION_REQUEST_CODE`].
    ///
    /// No-op on platforms that predate the runtime permission and when the
    /// permission is already granted.
    pub fn request_permission(&mut self, host: &dyn SensorHost) {
        if host.sdk_version() < RUNTIME_PERMISSION_MIN_SDK {
            return;
        }
        if host.permission_state().is_granted() {
            return;
        }
        host.show_permission_dialog(STEP_PERMISSION_REQUEST_CODE);
        if self.state == BridgeState::Uninitialized {
            self.state = BridgeState::PermissionPending;
        }
        info!("requested activity recognition permission");
    }

    /// Handle the host-relayed result of the permission dialog.
    ///
    /// Results carrying any other request code are ignored. The grant state
    /// is re-queried from the host rather than read from the callback
    /// payload; on grant the bridge initializes itself, on denial it stays
    /// put until the host retries explicitly.
    pub fn on_permission_result(
        &mut self,
        host: &dyn SensorHost,
        request_code: u32,
        _permissions: &[&str],
        _grant_results: &[PermissionState],
    ) {
        if request_code != STEP_PERMISSION_REQUEST_CODE {
            return;
        }
        if host.sdk_version() < RUNTIME_PERMISSION_MIN_SDK {
            return;
        }
        if host.permission_state().is_granted() {
            info!("activity recognition permission granted");
            self.initialize(Some(host));
        } else {
            warn!("activity recognition permission denied by the user");
        }
    }

    /// Add an observer. Returns `false` if it was already registered.
    pub fn register_observer(&self, observer: Arc<dyn StepObserver>) -> bool {
        self.registry.register(observer)
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unregister_observer(&self, observer: &Arc<dyn StepObserver>) -> bool {
        self.registry.unregister(observer)
    }

    /// Estimated wall-clock timestamp of the device's last boot.
    pub fn boot_time(&self, host: &dyn SensorHost) -> DateTime<Utc> {
        let elapsed = chrono::Duration::milliseconds(host.elapsed_since_boot().as_millis() as i64);
        host.wall_clock() - elapsed
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == BridgeState::Active
    }

    pub fn observer_count(&self) -> usize {
        self.registry.len()
    }

    /// Snapshot of the delivery counters.
    pub fn stats(&self) -> DeliveryStats {
        self.registry.stats()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

impl Default for StepBridge {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::SimulatedHost;

    #[test]
    fn test_bridge_starts_uninitialized() {
        let bridge = StepBridge::default();
        assert_eq!(bridge.state(), BridgeState::Uninitialized);
        assert!(!bridge.is_initialized());
        assert_eq!(bridge.config().sampling, SamplingRate::Normal);
    }

    #[test]
    fn test_initialize_with_granted_permission() {
        let host = SimulatedHost::new();
        let mut bridge = StepBridge::default();

        bridge.initialize(Some(&host));

        assert_eq!(bridge.state(), BridgeState::Active);
        assert_eq!(host.subscription_count(), 1);
    }

    #[test]
    fn test_initialize_without_host_is_a_noop() {
        let mut bridge = StepBridge::default();
        bridge.initialize(None);
        assert_eq!(bridge.state(), BridgeState::Uninitialized);
    }
}
