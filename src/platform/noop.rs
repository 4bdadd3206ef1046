//! Host backend for targets without a motion subsystem.
//!
//! This exists so the crate (and anything embedding it) can compile and run
//! on platforms with no step-counter hardware and no runtime permission
//! dialog. The bridge stays idle against it: there is no sensor to resolve.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::platform::types::{
    PermissionState, SamplingRate, SensorError, SensorHandle, SensorKind,
};
use crate::platform::{SensorEventListener, SensorHost};

/// A host with no sensors and no permission gate.
pub struct NoopHost {
    started: Instant,
}

impl NoopHost {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for NoopHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorHost for NoopHost {
    fn sdk_version(&self) -> u32 {
        0
    }

    /// No permission gate exists on a sensorless host.
    fn permission_state(&self) -> PermissionState {
        PermissionState::Granted
    }

    fn show_permission_dialog(&self, _request_code: u32) {}

    fn default_sensor(&self, _kind: SensorKind) -> Option<SensorHandle> {
        None
    }

    fn subscribe(
        &self,
        _sensor: &SensorHandle,
        _listener: Arc<dyn SensorEventListener>,
        _rate: SamplingRate,
    ) -> Result<(), SensorError> {
        Err(SensorError::SensorUnavailable)
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Without an OS uptime source, process start stands in for boot.
    fn elapsed_since_boot(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_host_has_no_step_sensor() {
        let host = NoopHost::new();
        assert!(host.default_sensor(SensorKind::StepCounter).is_none());
    }

    #[test]
    fn test_noop_host_is_ungated() {
        let host = NoopHost::new();
        assert!(host.permission_state().is_granted());
        assert_eq!(host.sdk_version(), 0);
    }
}
