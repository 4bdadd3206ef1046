//! Demonstration of the step bridge permission flow and event delivery.
//!
//! This example shows how a host would:
//! 1. Construct the bridge and register an observer
//! 2. Handle a denied permission on first initialize
//! 3. Drive the permission dialog and relay its result
//! 4. Receive cumulative step counts through a channel observer
//!
//! Run with: cargo run --example bridge_demo
//!
//! The platform is a `SimulatedHost`, so the demo runs anywhere; a real
//! integration supplies its own `SensorHost` backed by the OS.

use std::time::Duration;

use step_bridge::{
    ChannelObserver, PermissionState, RawSensorEvent, SensorKind, SimulatedHost, StepBridge,
    STEP_PERMISSION_REQUEST_CODE, VERSION,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    println!("Step Bridge {VERSION} - Demo");
    println!("============================");
    println!();

    // A device where the user has not yet granted the motion permission.
    let host = SimulatedHost::new();
    host.deny_permission();

    let mut bridge = StepBridge::default();
    let (observer, counts) = ChannelObserver::bounded(64);
    bridge.register_observer(observer);

    println!("Initializing with permission denied...");
    bridge.initialize(Some(&host));
    println!("  state: {:?}", bridge.state());
    println!();

    println!("Requesting the permission dialog...");
    bridge.request_permission(&host);
    println!("  dialog shown with request code {:?}", host.dialog_requests());

    // The user taps "allow"; the host relays the result.
    host.grant_permission();
    bridge.on_permission_result(
        &host,
        STEP_PERMISSION_REQUEST_CODE,
        &["android.permission.ACTIVITY_RECOGNITION"],
        &[PermissionState::Granted],
    );
    println!("  state after grant: {:?}", bridge.state());
    println!();

    println!("Walking...");
    for count in [12, 13, 14, 18, 25] {
        host.deliver(&RawSensorEvent::step_count(count));
    }
    // A foreign sample the bridge must filter out.
    host.deliver(&RawSensorEvent::new(
        SensorKind::Accelerometer,
        vec![0.2, 9.8, 0.1],
    ));

    while let Ok(count) = counts.recv_timeout(Duration::from_millis(10)) {
        println!("  step count: {count}");
    }
    println!();

    println!("Estimated boot time: {}", bridge.boot_time(&host));
    println!();

    let stats = bridge.stats();
    println!("Delivery stats:");
    match serde_json::to_string_pretty(&stats) {
        Ok(json) => {
            for line in json.lines() {
                println!("  {line}");
            }
        }
        Err(e) => eprintln!("could not serialize stats: {e}"),
    }
    println!();
    println!("Demo complete!");
}
