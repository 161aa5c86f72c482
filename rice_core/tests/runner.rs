mod common;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use common::{Rig, auto_cfg};
use rice_core::mocks::{FakeSwitch, RecordingDisplay, ScriptedScale, SpyPin, TestClock};
use rice_core::{Controller, Mode, RunOptions, StartupCfg, run};
use rice_traits::Clock;

fn controller(clock: &TestClock, valve: &SpyPin, auto_switch: &FakeSwitch) -> Controller {
    Controller::builder()
        .with_scale(ScriptedScale::new())
        .with_valve(valve.clone())
        .with_auto_switch(auto_switch.clone())
        .with_manual_button(FakeSwitch::new())
        .with_plus_button(FakeSwitch::new())
        .with_minus_button(FakeSwitch::new())
        .with_display(RecordingDisplay::new())
        .with_clock(Box::new(clock.clone()))
        .with_startup(StartupCfg {
            tare_samples: 0,
            initial_loading_delay_ms: 5_000,
        })
        .try_build()
        .expect("build")
}

#[test]
fn runs_tick_limit_and_closes_valve() {
    let clock = TestClock::new();
    let valve = SpyPin::new();
    let auto_switch = FakeSwitch::new();
    auto_switch.press();
    let mut ctrl = controller(&clock, &valve, &auto_switch);

    let opts = RunOptions {
        tick: Duration::from_millis(50),
        max_ticks: Some(10),
        shutdown: None,
    };
    let summary = run(&mut ctrl, &opts).expect("run");

    assert_eq!(summary.ticks, 10);
    assert_eq!(summary.final_mode, Mode::Auto);
    assert_eq!(summary.mode_changes, 0);
    assert_eq!(clock.now_ms(), 5_000 + 10 * 50);
    assert!(!valve.is_high(), "valve closed on exit");
}

#[test]
fn shutdown_flag_stops_before_first_tick() {
    let clock = TestClock::new();
    let valve = SpyPin::new();
    let mut ctrl = controller(&clock, &valve, &FakeSwitch::new());

    let opts = RunOptions {
        tick: Duration::from_millis(50),
        max_ticks: None,
        shutdown: Some(Arc::new(AtomicBool::new(true))),
    };
    let summary = run(&mut ctrl, &opts).expect("run");
    assert_eq!(summary.ticks, 0);
    assert!(!valve.is_high());
}

#[test]
fn counts_mode_changes() {
    let rig = Rig::new();
    let mut ctrl = rig.start(auto_cfg(5.0, 20_000));
    let opts = RunOptions {
        tick: Duration::from_millis(50),
        max_ticks: Some(3),
        shutdown: None,
    };
    // Auto switch released: Auto -> Weighting on the first tick.
    let summary = run(&mut ctrl, &opts).expect("run");
    assert_eq!(summary.mode_changes, 1);
    assert_eq!(summary.final_mode, Mode::Weighting);
}

#[test]
fn zero_tick_period_is_rejected() {
    let rig = Rig::new();
    let mut ctrl = rig.start(auto_cfg(5.0, 20_000));
    let opts = RunOptions {
        tick: Duration::ZERO,
        ..RunOptions::default()
    };
    assert!(run(&mut ctrl, &opts).is_err());
}
