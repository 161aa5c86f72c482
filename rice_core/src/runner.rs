//! Fixed-period loop around `Controller::tick`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::controller::Controller;
use crate::error::{BuildError, Result};
use crate::mode::Mode;

/// How long and how fast to run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Sleep between ticks.
    pub tick: Duration,
    /// Stop after this many ticks; `None` runs until shutdown.
    pub max_ticks: Option<u64>,
    /// Checked before every tick; set from a signal handler.
    pub shutdown: Option<Arc<AtomicBool>>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(50),
            max_ticks: None,
            shutdown: None,
        }
    }
}

/// What happened during a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub mode_changes: u64,
    pub final_mode: Mode,
    pub last_weight_kg: f32,
}

/// Run the startup sequence, then tick until shutdown or `max_ticks`.
///
/// The valve is closed on every exit path that returns.
pub fn run(controller: &mut Controller, opts: &RunOptions) -> Result<RunSummary> {
    if opts.tick.is_zero() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "tick period must be > 0",
        )));
    }

    controller.start();

    let mut ticks = 0u64;
    let mut mode_changes = 0u64;
    loop {
        if opts
            .shutdown
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            tracing::info!(ticks, "shutdown requested");
            break;
        }
        if opts.max_ticks.is_some_and(|max| ticks >= max) {
            tracing::debug!(ticks, "tick limit reached");
            break;
        }

        let report = controller.tick();
        ticks += 1;
        if report.changed_mode() {
            mode_changes += 1;
        }
        controller.clock().sleep(opts.tick);
    }

    controller.shutdown();
    Ok(RunSummary {
        ticks,
        mode_changes,
        final_mode: controller.mode(),
        last_weight_kg: controller.last_weight(),
    })
}
