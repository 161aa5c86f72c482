#![allow(dead_code)]

use rice_core::mocks::{FakeSwitch, RecordingDisplay, ScriptedScale, SpyPin, TestClock};
use rice_core::{AutoCfg, Calibration, Controller, DisplayCfg, StartupCfg, TickReport};

/// Every device a controller needs, with handles kept by the test.
pub struct Rig {
    pub scale: ScriptedScale,
    pub valve: SpyPin,
    pub auto_switch: FakeSwitch,
    pub manual: FakeSwitch,
    pub plus: FakeSwitch,
    pub minus: FakeSwitch,
    pub display: RecordingDisplay,
    pub clock: TestClock,
    pub cal: Calibration,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_clock(TestClock::new())
    }

    pub fn with_clock(clock: TestClock) -> Self {
        Self {
            scale: ScriptedScale::new(),
            valve: SpyPin::new(),
            auto_switch: FakeSwitch::new(),
            manual: FakeSwitch::new(),
            plus: FakeSwitch::new(),
            minus: FakeSwitch::new(),
            display: RecordingDisplay::new(),
            clock,
            cal: Calibration::default(),
        }
    }

    /// Controller with no tare and no loading delay, already started.
    pub fn start(&self, auto: AutoCfg) -> Controller {
        self.start_with(auto, DisplayCfg::default())
    }

    pub fn start_with(&self, auto: AutoCfg, display_cfg: DisplayCfg) -> Controller {
        let mut ctrl = Controller::builder()
            .with_scale(self.scale.clone())
            .with_valve(self.valve.clone())
            .with_auto_switch(self.auto_switch.clone())
            .with_manual_button(self.manual.clone())
            .with_plus_button(self.plus.clone())
            .with_minus_button(self.minus.clone())
            .with_display(self.display.clone())
            .with_clock(Box::new(self.clock.clone()))
            .with_calibration(self.cal)
            .with_auto(auto)
            .with_startup(StartupCfg {
                tare_samples: 0,
                initial_loading_delay_ms: 0,
            })
            .with_display_cfg(display_cfg)
            .try_build()
            .expect("build controller");
        ctrl.start();
        ctrl
    }

    pub fn push_kg(&self, kg: f32) {
        self.scale.push_kg(kg, &self.cal);
    }

    pub fn last_frame(&self) -> (String, String) {
        self.display.last().expect("display was drawn")
    }
}

pub fn auto_cfg(weight_kg: f32, delay_ms: u32) -> AutoCfg {
    AutoCfg {
        dispense_weight_kg: weight_kg,
        exchange_delay_ms: delay_ms,
    }
}

/// Press for one tick, then release for one tick. Returns the press tick.
pub fn tap(ctrl: &mut Controller, button: &FakeSwitch) -> TickReport {
    button.press();
    let report = ctrl.tick();
    button.release();
    ctrl.tick();
    report
}
