//! Automatic dispensing: fill until full, close, wait for a container swap,
//! reopen.

use rice_traits::OutputPin;

use crate::config::AutoCfg;
use crate::valve::Valve;

/// Where the automatic cycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoPhase {
    /// Valve open, container filling.
    Filling,
    /// Valve closed; `elapsed_ms` since the last full reading.
    WaitingForExchange { elapsed_ms: u32 },
}

/// Weight-triggered close plus timed reopen.
///
/// Invariant: while waiting for exchange the valve is closed and
/// `exchange_started_at` holds the time of the most recent reading at or
/// above the dispense weight.
pub struct AutoDispenser<P: OutputPin> {
    valve: Valve<P>,
    dispense_weight_kg: f32,
    exchange_delay_ms: u32,
    waiting_for_exchange: bool,
    exchange_started_at: u32,
    // Set by reset(): the next process() leaves the valve closed.
    hold_closed: bool,
}

impl<P: OutputPin> AutoDispenser<P> {
    pub fn new(valve: Valve<P>, cfg: &AutoCfg) -> Self {
        Self {
            valve,
            dispense_weight_kg: cfg.dispense_weight_kg,
            exchange_delay_ms: cfg.exchange_delay_ms,
            waiting_for_exchange: false,
            exchange_started_at: 0,
            hold_closed: false,
        }
    }

    /// Open the valve and start filling (power-up).
    pub fn start_filling(&mut self) {
        self.waiting_for_exchange = false;
        self.hold_closed = false;
        self.valve.open();
    }

    /// One automatic-mode tick.
    ///
    /// The delay check runs before the weight check: a tick may reopen the
    /// valve and close it again straight away if the new container already
    /// reads full.
    pub fn process(&mut self, weight_kg: f32, now_ms: u32) {
        if self.waiting_for_exchange
            && now_ms.wrapping_sub(self.exchange_started_at) > self.exchange_delay_ms
        {
            tracing::info!(delay_ms = self.exchange_delay_ms, "exchange delay elapsed");
            self.valve.open();
            self.waiting_for_exchange = false;
        }

        if weight_kg >= self.dispense_weight_kg {
            if !self.waiting_for_exchange {
                tracing::info!(
                    weight_kg,
                    dispense_weight_kg = self.dispense_weight_kg,
                    "dispense weight reached; waiting for exchange"
                );
            }
            self.valve.close();
            self.waiting_for_exchange = true;
            self.exchange_started_at = now_ms;
        } else if !self.waiting_for_exchange && !self.hold_closed {
            self.valve.open();
        }
        self.hold_closed = false;
    }

    /// Abandon the current cycle: stop waiting, zero the timer, close the valve.
    pub fn reset(&mut self) {
        self.waiting_for_exchange = false;
        self.exchange_started_at = 0;
        self.hold_closed = true;
        self.valve.close();
    }

    pub fn phase(&self, now_ms: u32) -> AutoPhase {
        if self.waiting_for_exchange {
            AutoPhase::WaitingForExchange {
                elapsed_ms: now_ms.wrapping_sub(self.exchange_started_at),
            }
        } else {
            AutoPhase::Filling
        }
    }

    pub fn is_waiting_for_exchange(&self) -> bool {
        self.waiting_for_exchange
    }

    pub fn exchange_delay_ms(&self) -> u32 {
        self.exchange_delay_ms
    }

    pub fn dispense_weight_kg(&self) -> f32 {
        self.dispense_weight_kg
    }

    pub fn valve(&self) -> &Valve<P> {
        &self.valve
    }

    pub fn valve_mut(&mut self) -> &mut Valve<P> {
        &mut self.valve
    }
}
