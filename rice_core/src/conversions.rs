//! `From` implementations bridging `rice_config` types to `rice_core` types.

use crate::calibration::Calibration;
use crate::config::{AutoCfg, DisplayCfg, StartupCfg, Timeouts};

impl From<&rice_config::DispenseCfg> for AutoCfg {
    fn from(c: &rice_config::DispenseCfg) -> Self {
        Self {
            dispense_weight_kg: c.weight_kg,
            exchange_delay_ms: c.exchange_delay_ms,
        }
    }
}

impl From<&rice_config::Config> for StartupCfg {
    fn from(c: &rice_config::Config) -> Self {
        Self {
            tare_samples: c.scale.tare_samples,
            initial_loading_delay_ms: c.dispense.initial_loading_delay_ms,
        }
    }
}

impl From<&rice_config::ScaleCfg> for Timeouts {
    fn from(c: &rice_config::ScaleCfg) -> Self {
        Self {
            sensor_ms: c.read_timeout_ms,
        }
    }
}

impl From<&rice_config::DisplayCfg> for DisplayCfg {
    fn from(c: &rice_config::DisplayCfg) -> Self {
        Self {
            exchange_prompts: c.exchange_prompts,
        }
    }
}

impl From<&rice_config::ScaleCfg> for Calibration {
    fn from(c: &rice_config::ScaleCfg) -> Self {
        Self {
            calibration_factor: c.calibration_factor,
            zero_counts: c.zero_counts,
        }
    }
}

impl From<&rice_config::Calibration> for Calibration {
    fn from(c: &rice_config::Calibration) -> Self {
        Self {
            calibration_factor: c.calibration_factor,
            zero_counts: c.zero_counts,
        }
    }
}
