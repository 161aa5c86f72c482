#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core rice valve control logic (hardware-agnostic).
//!
//! All hardware goes through the `rice_traits` seams: `Scale` for the load
//! cell, `InputPin`/`OutputPin` for switches and the valve, `Display` for the
//! two-line LCD and `Clock` for time.
//!
//! ## Architecture
//!
//! - **Button**: edge-triggered presses on active-low inputs (`button`)
//! - **Valve**: idempotent open/close over an output pin (`valve`)
//! - **Automatic dispensing**: close at the dispense weight, reopen after the
//!   exchange delay (`automatic`)
//! - **Mode controller**: per-tick state machine over AUTO, WEIGHTING,
//!   MANUAL SET and MANUAL DISPENSE (`controller`, `mode`)
//! - **Runner**: fixed-period loop with shutdown flag (`runner`)
//!
//! ## Time
//!
//! Time is a wrapping `u32` millisecond counter. Every elapsed-time
//! comparison uses `wrapping_sub`, so timers keep working across rollover.

pub mod automatic;
pub mod builder;
pub mod button;
pub mod calibration;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod error;
pub mod hw_error;
pub mod mocks;
pub mod mode;
pub mod runner;
pub mod screens;
pub mod status;
pub mod valve;

pub use automatic::{AutoDispenser, AutoPhase};
pub use builder::ControllerBuilder;
pub use button::DebouncedButton;
pub use calibration::Calibration;
pub use config::{AutoCfg, DisplayCfg, StartupCfg, Timeouts};
pub use controller::Controller;
pub use error::{BuildError, CoreError, Report, Result};
pub use mode::Mode;
pub use runner::{RunOptions, RunSummary, run};
pub use status::TickReport;
pub use valve::{Valve, ValveState};
