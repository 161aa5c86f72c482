use rice_core::error::BuildError;
use rice_core::mocks::{FakeSwitch, RecordingDisplay, ScriptedScale, SpyPin};
use rice_core::{AutoCfg, Calibration, Controller, ControllerBuilder};
use rstest::rstest;

fn complete() -> ControllerBuilder {
    Controller::builder()
        .with_scale(ScriptedScale::new())
        .with_valve(SpyPin::new())
        .with_auto_switch(FakeSwitch::new())
        .with_manual_button(FakeSwitch::new())
        .with_plus_button(FakeSwitch::new())
        .with_minus_button(FakeSwitch::new())
        .with_display(RecordingDisplay::new())
}

fn build_error(b: ControllerBuilder) -> BuildError {
    let err = b.try_build().expect_err("build should fail");
    err.downcast_ref::<BuildError>()
        .cloned()
        .unwrap_or_else(|| panic!("expected BuildError, got: {err:?}"))
}

#[test]
fn complete_builder_succeeds_in_auto_mode() {
    let ctrl = complete().try_build().expect("build");
    assert_eq!(ctrl.mode(), rice_core::Mode::Auto);
    assert_eq!(ctrl.manual_target_kg(), 0);
    assert!(!ctrl.valve_open());
}

#[test]
fn missing_scale() {
    let b = Controller::builder()
        .with_valve(SpyPin::new())
        .with_auto_switch(FakeSwitch::new())
        .with_manual_button(FakeSwitch::new())
        .with_plus_button(FakeSwitch::new())
        .with_minus_button(FakeSwitch::new())
        .with_display(RecordingDisplay::new());
    assert!(matches!(build_error(b), BuildError::MissingScale));
}

#[test]
fn missing_valve() {
    let b = Controller::builder()
        .with_scale(ScriptedScale::new())
        .with_auto_switch(FakeSwitch::new())
        .with_manual_button(FakeSwitch::new())
        .with_plus_button(FakeSwitch::new())
        .with_minus_button(FakeSwitch::new())
        .with_display(RecordingDisplay::new());
    assert!(matches!(build_error(b), BuildError::MissingValve));
}

#[test]
fn missing_minus_button_is_named() {
    let b = Controller::builder()
        .with_scale(ScriptedScale::new())
        .with_valve(SpyPin::new())
        .with_auto_switch(FakeSwitch::new())
        .with_manual_button(FakeSwitch::new())
        .with_plus_button(FakeSwitch::new())
        .with_display(RecordingDisplay::new());
    match build_error(b) {
        BuildError::MissingInput(name) => assert_eq!(name, "minus button"),
        other => panic!("expected MissingInput, got: {other:?}"),
    }
}

#[test]
fn missing_display() {
    let b = Controller::builder()
        .with_scale(ScriptedScale::new())
        .with_valve(SpyPin::new())
        .with_auto_switch(FakeSwitch::new())
        .with_manual_button(FakeSwitch::new())
        .with_plus_button(FakeSwitch::new())
        .with_minus_button(FakeSwitch::new());
    assert!(matches!(build_error(b), BuildError::MissingDisplay));
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
#[case(f32::NAN)]
#[case(f32::INFINITY)]
fn rejects_bad_dispense_weight(#[case] kg: f32) {
    let b = complete().with_auto(AutoCfg {
        dispense_weight_kg: kg,
        exchange_delay_ms: 20_000,
    });
    assert!(matches!(build_error(b), BuildError::InvalidConfig(_)));
}

#[rstest]
#[case(0.0)]
#[case(f32::NAN)]
fn rejects_bad_calibration_factor(#[case] factor: f32) {
    let b = complete().with_calibration(Calibration {
        calibration_factor: factor,
        zero_counts: 0,
    });
    assert!(matches!(build_error(b), BuildError::InvalidConfig(_)));
}
