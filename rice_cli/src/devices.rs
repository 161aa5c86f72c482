//! Hardware assembly: simulated devices by default, rppal-backed GPIO and
//! I2C LCD with the `hardware` feature on Linux.

use eyre::Result;
use rice_config::Config;
use rice_core::{Calibration, ControllerBuilder};
use rice_traits::{Display, Scale};
use rice_ui::{Deduplicated, TerminalLcd};

/// Frames go to stdout as a boxed grid; in JSON mode they would corrupt the
/// output, so they are dropped (redraws are still traced).
fn terminal_display(cfg: &Config, json: bool) -> Box<dyn Display> {
    if json {
        Box::new(Deduplicated::new(TerminalLcd::new(std::io::sink(), cfg.display.cols)))
    } else {
        Box::new(Deduplicated::new(TerminalLcd::new(std::io::stdout(), cfg.display.cols)))
    }
}

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
mod backend {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use rice_hardware::{SimulatedScale, SimulatedSwitch, SimulatedValve};

    /// Parse an environment knob, ignoring unset or malformed values.
    fn env_knob<T: std::str::FromStr>(key: &str) -> Option<T> {
        std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
    }

    fn sim_scale(cal: &Calibration, valve_open: Rc<Cell<bool>>) -> SimulatedScale {
        let scale = SimulatedScale::new(cal.counts_per_kg(), valve_open)
            .with_zero_counts(cal.zero_counts)
            .with_fill_rate(env_knob("RICE_TEST_SIM_FILL").unwrap_or(0.05))
            .with_exchange_after(Some(env_knob("RICE_TEST_SIM_EXCHANGE_READS").unwrap_or(40)));
        if env_knob::<u8>("RICE_TEST_SIM_TIMEOUT").is_some_and(|v| v != 0) {
            scale.timing_out()
        } else {
            scale
        }
    }

    pub fn attach(
        builder: ControllerBuilder,
        cfg: &Config,
        cal: &Calibration,
        json: bool,
    ) -> Result<ControllerBuilder> {
        let valve = SimulatedValve::new();
        let scale = sim_scale(cal, valve.open_handle());
        // The operator's selector defaults to AUTO in simulation.
        let auto_switch = if env_knob::<u8>("RICE_SIM_AUTO_SWITCH").unwrap_or(1) != 0 {
            SimulatedSwitch::held()
        } else {
            SimulatedSwitch::new()
        };
        tracing::info!(backend = "sim", "devices ready");
        Ok(builder
            .with_scale(scale)
            .with_valve(valve)
            .with_auto_switch(auto_switch)
            .with_manual_button(SimulatedSwitch::new())
            .with_plus_button(SimulatedSwitch::new())
            .with_minus_button(SimulatedSwitch::new())
            .with_display(terminal_display(cfg, json)))
    }

    pub fn open_scale(_cfg: &Config, cal: &Calibration) -> Result<Box<dyn Scale>> {
        Ok(Box::new(sim_scale(cal, Rc::new(Cell::new(false)))))
    }
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
mod backend {
    use super::*;
    use eyre::WrapErr;

    use rice_hardware::gpio::{GpioInput, GpioOutput, HardwareScale};
    use rice_hardware::lcd::I2cLcd;

    pub fn attach(
        builder: ControllerBuilder,
        cfg: &Config,
        cal: &Calibration,
        json: bool,
    ) -> Result<ControllerBuilder> {
        let pins = &cfg.pins;
        let scale = open_scale(cfg, cal)?;
        let valve = GpioOutput::new(pins.valve).wrap_err("open valve pin")?;
        let auto_switch = GpioInput::pull_up(pins.auto_switch).wrap_err("open auto switch pin")?;
        let manual = GpioInput::pull_up(pins.manual_dispenser).wrap_err("open manual dispenser pin")?;
        let plus = GpioInput::pull_up(pins.plus).wrap_err("open plus button pin")?;
        let minus = GpioInput::pull_up(pins.minus).wrap_err("open minus button pin")?;

        let display: Box<dyn Display> =
            match I2cLcd::open(cfg.display.i2c_addr, cfg.display.cols, cfg.display.rows) {
                Ok(lcd) => Box::new(Deduplicated::new(lcd)),
                Err(e) => {
                    tracing::warn!(error = %e, addr = cfg.display.i2c_addr, "LCD unavailable; drawing to the terminal");
                    terminal_display(cfg, json)
                }
            };
        tracing::info!(backend = "hardware", "devices ready");
        Ok(builder
            .with_scale(scale)
            .with_valve(valve)
            .with_auto_switch(auto_switch)
            .with_manual_button(manual)
            .with_plus_button(plus)
            .with_minus_button(minus)
            .with_display(display))
    }

    pub fn open_scale(cfg: &Config, _cal: &Calibration) -> Result<Box<dyn Scale>> {
        let scale = HardwareScale::try_new(cfg.pins.loadcell_dt, cfg.pins.loadcell_sck)
            .wrap_err("open HX711")?;
        Ok(Box::new(scale))
    }
}

pub use backend::{attach, open_scale};
