//! Two-line screen contents for each controller state.
//!
//! Lines may exceed the display width; the display truncates.

/// A pair of display lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub line1: String,
    pub line2: String,
}

impl Screen {
    pub fn new(line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            line1: line1.into(),
            line2: line2.into(),
        }
    }
}

pub fn status(mode_name: &str, weight_kg: f32) -> Screen {
    Screen::new(format!("Mode: {mode_name}"), format!("Weight: {weight_kg:.2}"))
}

/// Shown during the first half of the exchange delay.
pub fn secure_dispenser() -> Screen {
    Screen::new("Secure your", "Dispenser")
}

/// Shown during the second half of the exchange delay.
pub fn waiting_for_next() -> Screen {
    Screen::new("Waiting For", "Next Dispenser")
}

pub fn manual_set(target_kg: u32) -> Screen {
    Screen::new(format!("Set Weight: {target_kg}"), "Press + or -")
}

pub fn manual_dispense(weight_kg: f32, target_kg: u32) -> Screen {
    Screen::new("Dispensing", format!("{weight_kg:.2}/{target_kg} kg"))
}

pub fn target_reached(target_kg: u32) -> Screen {
    Screen::new("Target Reached", format!("{target_kg} kg"))
}

pub fn loading(dispense_weight_kg: f32) -> Screen {
    Screen::new("Please Load Rice", format!("Upto {dispense_weight_kg} kg"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_formats_two_decimals() {
        let s = status("AUTO", 1.234_5);
        assert_eq!(s.line1, "Mode: AUTO");
        assert_eq!(s.line2, "Weight: 1.23");
    }

    #[test]
    fn manual_screens() {
        assert_eq!(manual_set(4), Screen::new("Set Weight: 4", "Press + or -"));
        assert_eq!(manual_dispense(2.5, 3).line2, "2.50/3 kg");
        assert_eq!(target_reached(3), Screen::new("Target Reached", "3 kg"));
    }

    #[test]
    fn loading_screen_drops_trailing_zero() {
        assert_eq!(loading(5.0).line2, "Upto 5 kg");
        assert_eq!(loading(2.5).line2, "Upto 2.5 kg");
    }
}
