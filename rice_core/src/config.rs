//! Runtime configuration used by the `Controller`.
//!
//! Separate from the TOML schema in `rice_config`; see `conversions` for the
//! mapping.

/// Automatic dispensing thresholds.
#[derive(Debug, Clone)]
pub struct AutoCfg {
    /// Container counts as full once weight reaches this many kg.
    pub dispense_weight_kg: f32,
    /// Valve stays closed this long after the last full reading.
    pub exchange_delay_ms: u32,
}

impl Default for AutoCfg {
    fn default() -> Self {
        Self {
            dispense_weight_kg: 5.0,
            exchange_delay_ms: 20_000,
        }
    }
}

/// Power-up sequence.
#[derive(Debug, Clone)]
pub struct StartupCfg {
    /// Reads averaged into the tare baseline; 0 keeps the configured zero.
    pub tare_samples: u32,
    /// Blocking delay while the operator loads rice before the valve opens.
    pub initial_loading_delay_ms: u64,
}

impl Default for StartupCfg {
    fn default() -> Self {
        Self {
            tare_samples: 10,
            initial_loading_delay_ms: 5_000,
        }
    }
}

/// Timeouts.
#[derive(Debug, Clone)]
pub struct Timeouts {
    /// Max sensor wait per read (ms).
    pub sensor_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { sensor_ms: 150 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DisplayCfg {
    /// Swap the status screen for operator prompts while waiting for a
    /// container exchange.
    pub exchange_prompts: bool,
}
