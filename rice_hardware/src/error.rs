use thiserror::Error;

/// Failures from the GPIO, HX711 and LCD drivers.
#[derive(Debug, Error)]
pub enum HwError {
    /// GPIO controller could not be opened (permissions, not a Pi).
    #[error("gpio unavailable: {0}")]
    Gpio(String),
    #[error("gpio {pin}: {reason}")]
    Pin { pin: u8, reason: String },
    #[error("lcd at i2c 0x{addr:02x}: {reason}")]
    Lcd { addr: u8, reason: String },
    #[error("scale timeout")]
    Timeout,
    #[error("hx711 data-ready timeout")]
    DataReadyTimeout,
}

pub type Result<T> = std::result::Result<T, HwError>;
