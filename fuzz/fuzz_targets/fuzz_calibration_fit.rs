#![no_main]
use libfuzzer_sys::fuzz_target;
use rice_config::{Calibration, CalibrationRow};

fuzz_target!(|pairs: Vec<(i64, f32)>| {
    let rows: Vec<CalibrationRow> = pairs
        .into_iter()
        .map(|(raw, kg)| CalibrationRow { raw, kg })
        .collect();
    if let Ok(cal) = Calibration::from_rows(&rows) {
        assert!(cal.calibration_factor.is_finite());
    }
});
