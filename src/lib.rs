//! Step Bridge - step-counter sensor adapter for game-engine hosts.
//!
//! This library wraps a host platform's step-counter sensor behind a small
//! observer API. The host owns the bridge instance, injects the platform as
//! a [`SensorHost`] capability, and drives the runtime permission flow; the
//! bridge checks the permission, subscribes once, and re-broadcasts every
//! cumulative step count to the registered observers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Step Bridge                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │ SensorHost  │──▶│ StepBridge  │──▶│  Observers  │       │
//! │  │ (injected)  │   │ (permission │   │ (in reg.    │       │
//! │  └─────────────┘   │  gate +     │   │  order)     │       │
//! │                    │  filter)    │   └─────────────┘       │
//! │                    └─────────────┘                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use step_bridge::{ChannelObserver, RawSensorEvent, SimulatedHost, StepBridge};
//!
//! let host = SimulatedHost::new();
//! let mut bridge = StepBridge::default();
//!
//! let (observer, counts) = ChannelObserver::bounded(64);
//! bridge.register_observer(observer);
//! bridge.initialize(Some(&host));
//!
//! host.deliver(&RawSensorEvent::step_count(42));
//! assert_eq!(counts.try_recv(), Ok(42));
//! ```

pub mod bridge;
pub mod observer;
pub mod platform;

// Re-export key types at crate root for convenience
pub use bridge::{
    BridgeConfig, BridgeState, StepBridge, RUNTIME_PERMISSION_MIN_SDK,
    STEP_PERMISSION_REQUEST_CODE,
};
pub use observer::{ChannelObserver, DeliveryStats, ObserverRegistry, StepObserver};
pub use platform::{
    NoopHost, PermissionState, RawSensorEvent, SamplingRate, SensorError, SensorEventListener,
    SensorHandle, SensorHost, SensorKind, SimulatedHost,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_permission_flow_constants() {
        assert_eq!(STEP_PERMISSION_REQUEST_CODE, 111);
        assert_eq!(RUNTIME_PERMISSION_MIN_SDK, 29);
    }
}
