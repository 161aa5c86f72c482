//! Operating modes.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Fill, close at the dispense weight, wait for a container swap.
    Auto,
    /// Show the weight; valve stays closed.
    Weighting,
    /// Adjust the manual target with the plus/minus buttons.
    ManualSet,
    /// Fill up to the manual target.
    ManualDispense,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::Auto,
        Mode::Weighting,
        Mode::ManualSet,
        Mode::ManualDispense,
    ];

    /// Display name shown on the status screen.
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Auto => "AUTO",
            Mode::Weighting => "WEIGHTING",
            Mode::ManualSet => "MANUAL SET",
            Mode::ManualDispense => "MANUAL DISPENSE",
        }
    }

    /// Modes selected with the manual-dispenser button rather than the
    /// auto switch.
    pub const fn is_manual(self) -> bool {
        matches!(self, Mode::ManualSet | Mode::ManualDispense)
    }

    /// Mode after a manual-dispenser press:
    /// `Auto | Weighting -> ManualSet -> ManualDispense -> Auto`.
    pub const fn after_manual_press(self) -> Mode {
        match self {
            Mode::Auto | Mode::Weighting => Mode::ManualSet,
            Mode::ManualSet => Mode::ManualDispense,
            Mode::ManualDispense => Mode::Auto,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
