//! Scriptable in-process host backend.
//!
//! `SimulatedHost` lets tests and demos drive the bridge without a live OS
//! environment: permission state, platform version, and sensor presence are
//! all settable, dialog requests are recorded instead of shown, and scripted
//! samples are delivered to whatever listeners have subscribed.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::platform::types::{
    PermissionState, RawSensorEvent, SamplingRate, SensorError, SensorHandle, SensorKind,
};
use crate::platform::{SensorEventListener, SensorHost};

struct SimInner {
    sdk_version: u32,
    permission: PermissionState,
    step_sensor_present: bool,
    subscriptions: Vec<(SensorHandle, Arc<dyn SensorEventListener>)>,
    dialog_requests: Vec<u32>,
    wall_clock: Option<DateTime<Utc>>,
    elapsed_since_boot: Duration,
}

/// A host whose behavior is scripted by the test or demo driving it.
pub struct SimulatedHost {
    inner: Mutex<SimInner>,
}

impl SimulatedHost {
    /// A modern device with the permission already granted and a step
    /// counter present.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SimInner {
                sdk_version: 34,
                permission: PermissionState::Granted,
                step_sensor_present: true,
                subscriptions: Vec::new(),
                dialog_requests: Vec::new(),
                wall_clock: None,
                elapsed_since_boot: Duration::from_secs(3_600),
            }),
        }
    }

    pub fn grant_permission(&self) {
        self.lock().permission = PermissionState::Granted;
    }

    pub fn deny_permission(&self) {
        self.lock().permission = PermissionState::Denied;
    }

    pub fn set_sdk_version(&self, version: u32) {
        self.lock().sdk_version = version;
    }

    pub fn set_step_sensor_present(&self, present: bool) {
        self.lock().step_sensor_present = present;
    }

    /// Pin the clocks so boot-time arithmetic is deterministic.
    pub fn set_clock(&self, wall_clock: DateTime<Utc>, elapsed_since_boot: Duration) {
        let mut inner = self.lock();
        inner.wall_clock = Some(wall_clock);
        inner.elapsed_since_boot = elapsed_since_boot;
    }

    /// Number of live sensor subscriptions this host holds.
    pub fn subscription_count(&self) -> usize {
        self.lock().subscriptions.len()
    }

    /// Request codes of every permission dialog that would have been shown.
    pub fn dialog_requests(&self) -> Vec<u32> {
        self.lock().dialog_requests.clone()
    }

    /// Deliver a scripted sample to every subscribed listener.
    pub fn deliver(&self, event: &RawSensorEvent) {
        let listeners: Vec<Arc<dyn SensorEventListener>> = self
            .lock()
            .subscriptions
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener.on_sensor_changed(event);
        }
    }

    /// Report an accuracy change to every subscribed listener.
    pub fn report_accuracy(&self, sensor: &SensorHandle, accuracy: i32) {
        let listeners: Vec<Arc<dyn SensorEventListener>> = self
            .lock()
            .subscriptions
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener.on_accuracy_changed(sensor, accuracy);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SimInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorHost for SimulatedHost {
    fn sdk_version(&self) -> u32 {
        self.lock().sdk_version
    }

    fn permission_state(&self) -> PermissionState {
        self.lock().permission
    }

    fn show_permission_dialog(&self, request_code: u32) {
        self.lock().dialog_requests.push(request_code);
    }

    fn default_sensor(&self, kind: SensorKind) -> Option<SensorHandle> {
        let inner = self.lock();
        if kind == SensorKind::StepCounter && inner.step_sensor_present {
            Some(SensorHandle::new(kind, "simulated step counter"))
        } else {
            None
        }
    }

    fn subscribe(
        &self,
        sensor: &SensorHandle,
        listener: Arc<dyn SensorEventListener>,
        _rate: SamplingRate,
    ) -> Result<(), SensorError> {
        let mut inner = self.lock();
        if sensor.kind == SensorKind::StepCounter && !inner.step_sensor_present {
            return Err(SensorError::SensorUnavailable);
        }
        inner.subscriptions.push((sensor.clone(), listener));
        Ok(())
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        self.lock().wall_clock.unwrap_or_else(Utc::now)
    }

    fn elapsed_since_boot(&self) -> Duration {
        self.lock().elapsed_since_boot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingListener {
        seen: AtomicU32,
    }

    impl SensorEventListener for CountingListener {
        fn on_sensor_changed(&self, _event: &RawSensorEvent) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_deliver_reaches_subscribed_listeners() {
        let host = SimulatedHost::new();
        let sensor = host.default_sensor(SensorKind::StepCounter).unwrap();
        let listener = Arc::new(CountingListener {
            seen: AtomicU32::new(0),
        });
        host.subscribe(&sensor, listener.clone(), SamplingRate::Normal)
            .unwrap();

        host.deliver(&RawSensorEvent::step_count(7));
        host.deliver(&RawSensorEvent::step_count(8));

        assert_eq!(listener.seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_subscribe_fails_without_sensor() {
        let host = SimulatedHost::new();
        let sensor = host.default_sensor(SensorKind::StepCounter).unwrap();
        host.set_step_sensor_present(false);

        let listener = Arc::new(CountingListener {
            seen: AtomicU32::new(0),
        });
        let result = host.subscribe(&sensor, listener, SamplingRate::Normal);
        assert!(matches!(result, Err(SensorError::SensorUnavailable)));
    }

    #[test]
    fn test_dialog_requests_are_recorded() {
        let host = SimulatedHost::new();
        host.show_permission_dialog(111);
        assert_eq!(host.dialog_requests(), vec![111]);
    }
}
