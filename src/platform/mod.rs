//! Host platform boundary for the step bridge.
//!
//! The operating system's motion subsystem is not linked into this crate.
//! Instead the host injects a [`SensorHost`] capability covering permission
//! queries, sensor lookup, subscription, and clocks; the bridge never reaches
//! into a host lifecycle object. Two backends ship with the crate: a
//! [`NoopHost`] for targets without a motion subsystem and a scriptable
//! [`SimulatedHost`] for tests and demos.

pub mod noop;
pub mod sim;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

pub use noop::NoopHost;
pub use sim::SimulatedHost;
pub use types::{
    PermissionState, RawSensorEvent, SamplingRate, SensorError, SensorHandle, SensorKind,
};

/// Receiver for raw sensor callbacks, retained by the host after a
/// successful [`SensorHost::subscribe`].
///
/// Events may arrive on whichever thread the host delivers callbacks from,
/// so implementations must be `Send + Sync`.
pub trait SensorEventListener: Send + Sync {
    /// A new sample is available.
    fn on_sensor_changed(&self, event: &RawSensorEvent);

    /// The host reports a sensor accuracy change. Ignored by default.
    fn on_accuracy_changed(&self, _sensor: &SensorHandle, _accuracy: i32) {}
}

/// Capabilities the host application environment provides to the bridge.
///
/// One implementation per target environment; the bridge receives a handle
/// per call, the way a platform context or activity is passed around.
pub trait SensorHost: Send + Sync {
    /// Platform API level, used to decide whether the runtime permission
    /// dialog exists at all.
    fn sdk_version(&self) -> u32;

    /// Current grant state of the motion-activity-recognition permission.
    fn permission_state(&self) -> PermissionState;

    /// Open the OS permission dialog, tagged with `request_code` so the
    /// host can route the result back to the bridge.
    fn show_permission_dialog(&self, request_code: u32);

    /// Resolve the default sensor of the given kind, if the device has one.
    fn default_sensor(&self, kind: SensorKind) -> Option<SensorHandle>;

    /// Subscribe `listener` to `sensor` at the requested delivery rate.
    ///
    /// The host keeps the listener alive and invokes it for every sample
    /// until the process ends; there is no unsubscribe.
    fn subscribe(
        &self,
        sensor: &SensorHandle,
        listener: Arc<dyn SensorEventListener>,
        rate: SamplingRate,
    ) -> Result<(), SensorError>;

    /// Current wall-clock time.
    fn wall_clock(&self) -> DateTime<Utc>;

    /// Time elapsed since the device booted.
    fn elapsed_since_boot(&self) -> Duration;
}
