//! Mode controller: the per-tick state machine tying sensor, switches,
//! valve and display together.

use std::time::Duration;

use rice_traits::{Clock, Display, InputPin, OutputPin, Scale};

use crate::automatic::{AutoDispenser, AutoPhase};
use crate::button::DebouncedButton;
use crate::calibration::Calibration;
use crate::config::{DisplayCfg, StartupCfg, Timeouts};
use crate::error::CoreError;
use crate::hw_error::map_hw_error;
use crate::mode::Mode;
use crate::screens::{self, Screen};
use crate::status::TickReport;

/// All controller state, owned by the loop that drives it.
pub struct Controller {
    pub(crate) scale: Box<dyn Scale>,
    pub(crate) auto_switch: Box<dyn InputPin>,
    pub(crate) manual_button: DebouncedButton<Box<dyn InputPin>>,
    pub(crate) plus_button: DebouncedButton<Box<dyn InputPin>>,
    pub(crate) minus_button: DebouncedButton<Box<dyn InputPin>>,
    pub(crate) auto: AutoDispenser<Box<dyn OutputPin>>,
    pub(crate) display: Box<dyn Display>,
    pub(crate) clock: Box<dyn Clock + Send + Sync>,
    pub(crate) calibration: Calibration,
    pub(crate) timeouts: Timeouts,
    pub(crate) startup: StartupCfg,
    pub(crate) display_cfg: DisplayCfg,
    pub(crate) mode: Mode,
    pub(crate) manual_target_kg: u32,
    pub(crate) last_weight_kg: f32,
}

impl core::fmt::Debug for Controller {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("mode", &self.mode)
            .field("manual_target_kg", &self.manual_target_kg)
            .field("last_weight_kg", &self.last_weight_kg)
            .field("valve", &self.auto.valve().state())
            .finish()
    }
}

/// Inputs sampled at the start of a tick.
struct Inputs {
    weight_kg: f32,
    auto_switch_low: bool,
    manual_pressed: bool,
    plus_pressed: bool,
    minus_pressed: bool,
}

impl Controller {
    /// Power-up sequence: tare, loading prompt, loading delay, open the valve.
    pub fn start(&mut self) {
        self.tare();
        let loading = screens::loading(self.auto.dispense_weight_kg());
        self.show(&loading);
        tracing::info!(
            delay_ms = self.startup.initial_loading_delay_ms,
            "waiting for rice to be loaded"
        );
        self.clock
            .sleep(Duration::from_millis(self.startup.initial_loading_delay_ms));
        self.auto.start_filling();
        tracing::info!(mode = %self.mode, "controller started");
    }

    /// Average `tare_samples` reads into the zero offset.
    fn tare(&mut self) {
        let samples = self.startup.tare_samples;
        if samples == 0 {
            return;
        }
        let timeout = self.sensor_timeout();
        let mut sum: i64 = 0;
        let mut good: i64 = 0;
        for _ in 0..samples {
            match self.scale.read(timeout) {
                Ok(raw) => {
                    sum += i64::from(raw);
                    good += 1;
                }
                Err(e) => tracing::warn!(error = %map_hw_error(&*e), "tare read failed"),
            }
        }
        if good == 0 {
            tracing::warn!(
                zero_counts = self.calibration.zero_counts,
                "no tare readings; keeping configured zero"
            );
            return;
        }
        // Mean of i32 values always fits in i32.
        let zero = (sum as f64 / good as f64).round() as i32;
        self.calibration.zero_counts = zero;
        tracing::info!(zero_counts = zero, samples = good, "scale tared");
    }

    /// Run one control tick.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now_ms();
        let inputs = self.read_inputs();
        let weight = inputs.weight_kg;
        let start_mode = self.mode;

        if matches!(start_mode, Mode::Auto | Mode::Weighting) {
            let screen = self.status_screen(weight, now);
            self.show(&screen);
        }

        let mut next = start_mode;
        if !next.is_manual() {
            next = if inputs.auto_switch_low {
                Mode::Auto
            } else {
                Mode::Weighting
            };
        }
        if inputs.manual_pressed {
            next = next.after_manual_press();
        }

        let mut transition = None;
        if next != start_mode {
            tracing::info!(from = %start_mode, to = %next, "mode changed");
            self.auto.valve_mut().close();
            self.auto.reset();
            // The target set in ManualSet is what ManualDispense fills to.
            if !(start_mode == Mode::ManualSet && next == Mode::ManualDispense) {
                self.manual_target_kg = 0;
            }
            self.mode = next;
            transition = Some((start_mode, next));
        }

        match self.mode {
            Mode::Auto => self.auto.process(weight, now),
            Mode::Weighting => {}
            Mode::ManualSet => {
                self.adjust_target(inputs.plus_pressed, inputs.minus_pressed);
                let screen = screens::manual_set(self.manual_target_kg);
                self.show(&screen);
            }
            Mode::ManualDispense => {
                let target = self.manual_target_kg;
                self.show(&screens::manual_dispense(weight, target));
                if weight >= target as f32 {
                    self.auto.valve_mut().close();
                    self.mode = Mode::ManualSet;
                    tracing::info!(weight_kg = weight, target_kg = target, "manual target reached");
                    self.show(&screens::target_reached(target));
                    transition = Some((start_mode, Mode::ManualSet));
                } else if transition.is_none() {
                    self.auto.valve_mut().open();
                }
            }
        }

        let auto_phase = (self.mode == Mode::Auto).then(|| self.auto.phase(now));
        tracing::trace!(mode = %self.mode, weight_kg = weight, "tick");
        TickReport {
            mode: self.mode,
            weight_kg: weight,
            transition: transition.filter(|(from, to)| from != to),
            valve_open: self.auto.valve().is_open(),
            auto_phase,
        }
    }

    /// Close the valve before the loop exits.
    pub fn shutdown(&mut self) {
        self.auto.valve_mut().close();
        tracing::info!("controller stopped; valve closed");
    }

    fn read_inputs(&mut self) -> Inputs {
        let weight_kg = self.read_weight();
        let auto_switch_low = match self.auto_switch.read() {
            Ok(level) => level.is_low(),
            Err(e) => {
                tracing::warn!(error = %map_hw_error(&*e), "auto switch read failed; treating as released");
                false
            }
        };
        Inputs {
            weight_kg,
            auto_switch_low,
            manual_pressed: self.manual_button.is_pressed(),
            plus_pressed: self.plus_button.is_pressed(),
            minus_pressed: self.minus_button.is_pressed(),
        }
    }

    fn read_weight(&mut self) -> f32 {
        match self.scale.read(self.sensor_timeout()) {
            Ok(raw) => {
                self.last_weight_kg = self.calibration.to_kg(raw);
            }
            Err(e) => {
                tracing::warn!(
                    error = %map_hw_error(&*e),
                    last_weight_kg = self.last_weight_kg,
                    "scale read failed; reusing last weight"
                );
            }
        }
        self.last_weight_kg
    }

    fn adjust_target(&mut self, plus: bool, minus: bool) {
        let before = self.manual_target_kg;
        if plus {
            self.manual_target_kg = before.saturating_add(1);
        } else if minus {
            self.manual_target_kg = before.saturating_sub(1);
        }
        if self.manual_target_kg != before {
            tracing::debug!(from = before, to = self.manual_target_kg, "manual target adjusted");
        }
    }

    fn status_screen(&self, weight_kg: f32, now: u32) -> Screen {
        if self.display_cfg.exchange_prompts && self.mode == Mode::Auto {
            if let AutoPhase::WaitingForExchange { elapsed_ms } = self.auto.phase(now) {
                return if elapsed_ms < self.auto.exchange_delay_ms() / 2 {
                    screens::secure_dispenser()
                } else {
                    screens::waiting_for_next()
                };
            }
        }
        screens::status(self.mode.name(), weight_kg)
    }

    fn show(&mut self, screen: &Screen) {
        if let Err(e) = self.display.show(&screen.line1, &screen.line2) {
            let err = CoreError::Display(e.to_string());
            tracing::warn!(error = %err, "display update failed");
        }
    }

    fn sensor_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.sensor_ms)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn manual_target_kg(&self) -> u32 {
        self.manual_target_kg
    }

    pub fn valve_open(&self) -> bool {
        self.auto.valve().is_open()
    }

    /// Last successfully read weight in kg.
    pub fn last_weight(&self) -> f32 {
        self.last_weight_kg
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn clock(&self) -> &(dyn Clock + Send + Sync) {
        &*self.clock
    }
}
