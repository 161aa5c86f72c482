//! Per-tick report returned by `Controller::tick`.

use crate::automatic::AutoPhase;
use crate::mode::Mode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Mode after the tick.
    pub mode: Mode,
    /// Weight used for the tick's decisions.
    pub weight_kg: f32,
    /// `(from, to)` when the mode changed this tick, including the
    /// ManualDispense -> ManualSet completion.
    pub transition: Option<(Mode, Mode)>,
    pub valve_open: bool,
    /// Automatic cycle phase; `None` outside `Auto`.
    pub auto_phase: Option<AutoPhase>,
}

impl TickReport {
    pub fn changed_mode(&self) -> bool {
        self.transition.is_some()
    }
}
