//! Raw HX711 counts to kilograms.

use rice_config::KG_PER_LB;

/// Linear load-cell calibration.
///
/// kg = -((raw - zero_counts) / calibration_factor) * KG_PER_LB
///
/// The factor is in counts per pound as produced by the usual HX711
/// calibration sketch; the sign flip makes added load read positive with the
/// stock wiring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub calibration_factor: f32,
    pub zero_counts: i32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            calibration_factor: -7050.0,
            zero_counts: 0,
        }
    }
}

impl Calibration {
    pub fn to_kg(&self, raw: i32) -> f32 {
        let lbs = (raw.saturating_sub(self.zero_counts)) as f32 / self.calibration_factor;
        -(lbs * KG_PER_LB)
    }

    /// Raw counts per kilogram of load; inverse slope of `to_kg`.
    pub fn counts_per_kg(&self) -> f32 {
        -self.calibration_factor / KG_PER_LB
    }
}
