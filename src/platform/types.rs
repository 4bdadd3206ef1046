//! Data types crossing the host platform boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sensor type classification, mirroring the host platform's sensor registry.
///
/// Only `StepCounter` is meaningful to the bridge; the other kinds exist so
/// host backends can hand every sample through one listener and let the
/// bridge do the filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    /// Raw acceleration samples
    Accelerometer,
    /// One event per detected step
    StepDetector,
    /// Cumulative step count since the last boot
    StepCounter,
}

/// Delivery rate requested when subscribing to a sensor.
///
/// `Normal` is the power-friendly, best-effort rate the bridge uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingRate {
    Fastest,
    Game,
    Ui,
    Normal,
}

impl Default for SamplingRate {
    fn default() -> Self {
        SamplingRate::Normal
    }
}

/// Grant state of the motion-activity-recognition permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionState {
    Granted,
    Denied,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        self == PermissionState::Granted
    }
}

/// Opaque handle to a resolved platform sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorHandle {
    /// Which sensor this handle resolves to
    pub kind: SensorKind,
    /// Host-reported sensor name, used in log lines only
    pub name: String,
}

impl SensorHandle {
    pub fn new(kind: SensorKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// A raw sample as delivered by the host sensor subsystem.
///
/// Ephemeral: the bridge extracts the step count and drops the event. No
/// history is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSensorEvent {
    /// Which sensor produced the sample
    pub kind: SensorKind,
    /// Raw sample values; `values[0]` carries the cumulative count for
    /// step-counter samples
    pub values: Vec<f32>,
    /// Timestamp when the event occurred
    pub timestamp: DateTime<Utc>,
}

impl RawSensorEvent {
    pub fn new(kind: SensorKind, values: Vec<f32>) -> Self {
        Self {
            kind,
            values,
            timestamp: Utc::now(),
        }
    }

    /// Convenience constructor for a step-counter sample.
    pub fn step_count(count: u32) -> Self {
        Self::new(SensorKind::StepCounter, vec![count as f32])
    }

    /// Extract the cumulative step count, if this is a step-counter sample.
    pub fn as_step_count(&self) -> Option<u32> {
        if self.kind != SensorKind::StepCounter {
            return None;
        }
        self.values.first().map(|v| *v as u32)
    }
}

/// Errors a host backend can report when subscribing to a sensor.
#[derive(Debug)]
pub enum SensorError {
    /// The requested sensor is not present on this device
    SensorUnavailable,
    /// The platform rejected the subscription
    SubscriptionFailed(String),
}

impl std::fmt::Display for SensorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorError::SensorUnavailable => write!(f, "sensor not available on this device"),
            SensorError::SubscriptionFailed(reason) => {
                write!(f, "sensor subscription failed: {reason}")
            }
        }
    }
}

impl std::error::Error for SensorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_count_extraction() {
        let event = RawSensorEvent::step_count(1234);
        assert_eq!(event.kind, SensorKind::StepCounter);
        assert_eq!(event.as_step_count(), Some(1234));
    }

    #[test]
    fn test_foreign_kind_has_no_step_count() {
        let event = RawSensorEvent::new(SensorKind::Accelerometer, vec![0.2, 9.8, 0.1]);
        assert_eq!(event.as_step_count(), None);
    }

    #[test]
    fn test_empty_values_have_no_step_count() {
        let event = RawSensorEvent::new(SensorKind::StepCounter, vec![]);
        assert_eq!(event.as_step_count(), None);
    }

    #[test]
    fn test_permission_state_helper() {
        assert!(PermissionState::Granted.is_granted());
        assert!(!PermissionState::Denied.is_granted());
    }
}
