//! Builder for `Controller`.
//!
//! Every hardware part must be supplied; configuration falls back to
//! defaults. `try_build()` reports the first missing part or invalid setting.

use rice_traits::{Clock, Display, InputPin, MonotonicClock, OutputPin, Scale};

use crate::automatic::AutoDispenser;
use crate::button::DebouncedButton;
use crate::calibration::Calibration;
use crate::config::{AutoCfg, DisplayCfg, StartupCfg, Timeouts};
use crate::controller::Controller;
use crate::error::{BuildError, Result};
use crate::mode::Mode;
use crate::valve::Valve;

impl Controller {
    /// Start building a Controller.
    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::default()
    }
}

#[derive(Default)]
pub struct ControllerBuilder {
    scale: Option<Box<dyn Scale>>,
    valve: Option<Box<dyn OutputPin>>,
    auto_switch: Option<Box<dyn InputPin>>,
    manual_button: Option<Box<dyn InputPin>>,
    plus_button: Option<Box<dyn InputPin>>,
    minus_button: Option<Box<dyn InputPin>>,
    display: Option<Box<dyn Display>>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    calibration: Option<Calibration>,
    auto: Option<AutoCfg>,
    startup: Option<StartupCfg>,
    timeouts: Option<Timeouts>,
    display_cfg: Option<DisplayCfg>,
}

impl ControllerBuilder {
    pub fn with_scale(mut self, scale: impl Scale + 'static) -> Self {
        self.scale = Some(Box::new(scale));
        self
    }

    pub fn with_valve(mut self, pin: impl OutputPin + 'static) -> Self {
        self.valve = Some(Box::new(pin));
        self
    }

    /// Maintained AUTO/WEIGHTING selector (LOW = auto).
    pub fn with_auto_switch(mut self, pin: impl InputPin + 'static) -> Self {
        self.auto_switch = Some(Box::new(pin));
        self
    }

    pub fn with_manual_button(mut self, pin: impl InputPin + 'static) -> Self {
        self.manual_button = Some(Box::new(pin));
        self
    }

    pub fn with_plus_button(mut self, pin: impl InputPin + 'static) -> Self {
        self.plus_button = Some(Box::new(pin));
        self
    }

    pub fn with_minus_button(mut self, pin: impl InputPin + 'static) -> Self {
        self.minus_button = Some(Box::new(pin));
        self
    }

    pub fn with_display(mut self, display: impl Display + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    /// Override the clock (tests use `TestClock`). Defaults to `MonotonicClock`.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = Some(calibration);
        self
    }

    pub fn with_auto(mut self, auto: AutoCfg) -> Self {
        self.auto = Some(auto);
        self
    }

    pub fn with_startup(mut self, startup: StartupCfg) -> Self {
        self.startup = Some(startup);
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = Some(timeouts);
        self
    }

    pub fn with_display_cfg(mut self, display_cfg: DisplayCfg) -> Self {
        self.display_cfg = Some(display_cfg);
        self
    }

    pub fn try_build(self) -> Result<Controller> {
        let scale = self
            .scale
            .ok_or_else(|| eyre::Report::new(BuildError::MissingScale))?;
        let valve = self
            .valve
            .ok_or_else(|| eyre::Report::new(BuildError::MissingValve))?;
        let auto_switch = self
            .auto_switch
            .ok_or_else(|| eyre::Report::new(BuildError::MissingInput("auto switch")))?;
        let manual = self
            .manual_button
            .ok_or_else(|| eyre::Report::new(BuildError::MissingInput("manual dispenser")))?;
        let plus = self
            .plus_button
            .ok_or_else(|| eyre::Report::new(BuildError::MissingInput("plus button")))?;
        let minus = self
            .minus_button
            .ok_or_else(|| eyre::Report::new(BuildError::MissingInput("minus button")))?;
        let display = self
            .display
            .ok_or_else(|| eyre::Report::new(BuildError::MissingDisplay))?;

        let auto = self.auto.unwrap_or_default();
        if !auto.dispense_weight_kg.is_finite() || auto.dispense_weight_kg <= 0.0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "dispense weight must be finite and > 0",
            )));
        }
        let calibration = self.calibration.unwrap_or_default();
        if !calibration.calibration_factor.is_finite() || calibration.calibration_factor == 0.0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "calibration factor must be finite and non-zero",
            )));
        }
        let timeouts = self.timeouts.unwrap_or_default();
        if timeouts.sensor_ms == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "sensor timeout must be >= 1 ms",
            )));
        }

        let clock: Box<dyn Clock + Send + Sync> = match self.clock {
            Some(clock) => clock,
            None => Box::new(MonotonicClock::new()),
        };

        Ok(Controller {
            scale,
            auto_switch,
            manual_button: DebouncedButton::new("manual dispenser", manual),
            plus_button: DebouncedButton::new("plus", plus),
            minus_button: DebouncedButton::new("minus", minus),
            auto: AutoDispenser::new(Valve::new(valve), &auto),
            display,
            clock,
            calibration,
            timeouts,
            startup: self.startup.unwrap_or_default(),
            display_cfg: self.display_cfg.unwrap_or_default(),
            mode: Mode::Auto,
            manual_target_kg: 0,
            last_weight_kg: 0.0,
        })
    }
}
