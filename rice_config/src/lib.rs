#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and calibration parsing for the rice valve controller.
//!
//! - `Config` and its sections are deserialized from TOML; every section has
//!   defaults matching the stock board wiring, so an empty file is valid.
//! - `validate()` rejects values the control loop cannot run with.
//! - The calibration CSV loader fits the HX711 factor from known weights.
use serde::Deserialize;

/// Pounds to kilograms; the calibration factor is expressed in counts per lb.
pub const KG_PER_LB: f32 = 0.453_592;

/// BCM lines of I2C bus 1 (SDA, SCL), owned by the LCD backpack.
pub const I2C_PINS: [u8; 2] = [2, 3];

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Pins {
    pub loadcell_dt: u8,
    pub loadcell_sck: u8,
    pub valve: u8,
    /// Held low selects automatic dispensing, high selects weighing.
    pub auto_switch: u8,
    pub manual_dispenser: u8,
    pub plus: u8,
    pub minus: u8,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            loadcell_dt: 5,
            loadcell_sck: 6,
            valve: 7,
            auto_switch: 8,
            manual_dispenser: 12,
            plus: 10,
            minus: 11,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScaleCfg {
    /// Raw counts per pound, signed as wired (the stock cell reads negative).
    pub calibration_factor: f32,
    /// Raw reading of the empty platform; replaced by tare at startup.
    pub zero_counts: i32,
    /// Reads averaged by the startup tare (0 disables tare).
    pub tare_samples: u32,
    /// Max time to wait for HX711 data-ready per read.
    pub read_timeout_ms: u64,
}

impl Default for ScaleCfg {
    fn default() -> Self {
        Self {
            calibration_factor: -7050.0,
            zero_counts: 0,
            tare_samples: 10,
            read_timeout_ms: 150,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DispenseCfg {
    /// Weight in kg at which a container counts as full in automatic mode.
    pub weight_kg: f32,
    /// Time the valve stays closed for the operator to swap containers.
    pub exchange_delay_ms: u32,
    /// Blocking delay at startup before the valve first opens.
    pub initial_loading_delay_ms: u64,
}

impl Default for DispenseCfg {
    fn default() -> Self {
        Self {
            weight_kg: 5.0,
            exchange_delay_ms: 20_000,
            initial_loading_delay_ms: 5_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoopCfg {
    pub tick_ms: u64,
}

impl Default for LoopCfg {
    fn default() -> Self {
        Self { tick_ms: 50 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayCfg {
    pub i2c_addr: u8,
    pub cols: u8,
    pub rows: u8,
    /// Show "Secure your Dispenser" / "Waiting For Next Dispenser" while
    /// automatic mode waits for a container swap.
    pub exchange_prompts: bool,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            i2c_addr: 0x27,
            cols: 16,
            rows: 2,
            exchange_prompts: false,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub pins: Pins,
    pub scale: ScaleCfg,
    pub dispense: DispenseCfg,
    #[serde(rename = "loop")]
    pub tick: LoopCfg,
    pub display: DisplayCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Scale
        let factor = self.scale.calibration_factor;
        if !factor.is_finite() || factor == 0.0 {
            eyre::bail!("scale.calibration_factor must be finite and non-zero");
        }
        if self.scale.read_timeout_ms == 0 {
            eyre::bail!("scale.read_timeout_ms must be >= 1");
        }
        if self.scale.tare_samples > 1000 {
            eyre::bail!("scale.tare_samples is unreasonably large (>1000)");
        }

        // Dispense
        let w = self.dispense.weight_kg;
        if !w.is_finite() || w <= 0.0 {
            eyre::bail!("dispense.weight_kg must be > 0");
        }
        if w > 1000.0 {
            eyre::bail!("dispense.weight_kg is unreasonably large (>1000 kg)");
        }
        if self.dispense.exchange_delay_ms > 60 * 60 * 1000 {
            eyre::bail!("dispense.exchange_delay_ms is unreasonably large (>1h)");
        }
        if self.dispense.initial_loading_delay_ms > 10 * 60 * 1000 {
            eyre::bail!("dispense.initial_loading_delay_ms is unreasonably large (>10min)");
        }

        // Loop
        if self.tick.tick_ms == 0 {
            eyre::bail!("loop.tick_ms must be >= 1");
        }
        if self.tick.tick_ms > 10_000 {
            eyre::bail!("loop.tick_ms is unreasonably large (>10s)");
        }

        // Display
        if self.display.cols == 0 || self.display.cols > 40 {
            eyre::bail!("display.cols must be in 1..=40");
        }
        if self.display.rows < 2 || self.display.rows > 4 {
            eyre::bail!("display.rows must be in 2..=4");
        }
        if !(0x03..=0x77).contains(&self.display.i2c_addr) {
            eyre::bail!("display.i2c_addr must be a 7-bit address in 0x03..=0x77");
        }

        // Pins: every line needs its own GPIO
        let p = &self.pins;
        let named = [
            ("loadcell_dt", p.loadcell_dt),
            ("loadcell_sck", p.loadcell_sck),
            ("valve", p.valve),
            ("auto_switch", p.auto_switch),
            ("manual_dispenser", p.manual_dispenser),
            ("plus", p.plus),
            ("minus", p.minus),
        ];
        for (name, pin) in &named {
            if I2C_PINS.contains(pin) {
                eyre::bail!("pins.{name} uses GPIO {pin}, reserved for the LCD I2C bus");
            }
        }
        for (i, (name_a, pin_a)) in named.iter().enumerate() {
            for (name_b, pin_b) in &named[i + 1..] {
                if pin_a == pin_b {
                    eyre::bail!("pins.{name_a} and pins.{name_b} share GPIO {pin_a}");
                }
            }
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
        }

        Ok(())
    }
}

/// Calibration CSV schema.
///
/// Expected headers:
/// raw,kg
///
/// Example:
/// raw,kg
/// 0,0.0
/// 31085,2.0
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CalibrationRow {
    pub raw: i64,
    pub kg: f32,
}

/// Fitted load-cell calibration in the controller's native form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Raw counts per pound (sign as wired).
    pub calibration_factor: f32,
    /// Raw reading at zero load.
    pub zero_counts: i32,
}

impl Calibration {
    /// Least-squares fit of `kg = a * raw + b` over all rows, converted to
    /// `kg = -((raw - zero) / factor) * KG_PER_LB`.
    pub fn from_rows(rows: &[CalibrationRow]) -> eyre::Result<Self> {
        if rows.len() < 2 {
            eyre::bail!("calibration requires at least two rows, got {}", rows.len());
        }

        let n = rows.len() as f64;
        let mean_x = rows.iter().map(|r| r.raw as f64).sum::<f64>() / n;
        let mean_y = rows.iter().map(|r| f64::from(r.kg)).sum::<f64>() / n;
        let (mut sxx, mut sxy) = (0.0f64, 0.0f64);
        for r in rows {
            let dx = r.raw as f64 - mean_x;
            sxx += dx * dx;
            sxy += dx * (f64::from(r.kg) - mean_y);
        }
        if !sxx.is_finite() || sxx == 0.0 {
            eyre::bail!("calibration cannot determine slope (all raw values equal)");
        }
        let slope = sxy / sxx;
        if !slope.is_finite() || slope == 0.0 {
            eyre::bail!("calibration produced zero or non-finite slope");
        }
        let intercept = mean_y - slope * mean_x;

        // kg = -(raw - zero) * KG_PER_LB / factor  =>  slope = -KG_PER_LB / factor
        let factor = -f64::from(KG_PER_LB) / slope;
        let zero = -intercept / slope;
        let factor = factor as f32;
        if !factor.is_finite() || factor == 0.0 || !zero.is_finite() {
            eyre::bail!("calibration produced invalid factor or tare baseline");
        }
        if zero.abs() > f64::from(i32::MAX) {
            eyre::bail!("calibration tare baseline out of range");
        }

        Ok(Calibration {
            calibration_factor: factor,
            zero_counts: zero.round() as i32,
        })
    }
}

impl TryFrom<&[CalibrationRow]> for Calibration {
    type Error = eyre::Report;
    fn try_from(rows: &[CalibrationRow]) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

pub fn load_calibration_csv(path: &std::path::Path) -> eyre::Result<Calibration> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open calibration CSV {:?}: {}", path, e))?;

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<&str> = headers.iter().collect();
    if actual != ["raw", "kg"] {
        eyre::bail!(
            "calibration CSV must have headers 'raw,kg', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<CalibrationRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => eyre::bail!("invalid CSV row {}: {}", idx + 2, e),
        }
    }

    Calibration::try_from(rows.as_slice())
}
