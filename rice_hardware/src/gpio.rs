//! rppal-backed implementations of the controller's hardware seams.
use std::time::Duration;

use rice_traits::{BoxError, InputPin, Level, OutputPin, Scale};
use rppal::gpio::Gpio;

use crate::error::{HwError, Result};
use crate::hx711::Hx711;

const MAX_TIMEOUT_RETRIES: u32 = 3;

pub struct HardwareScale {
    hx711: Hx711,
}

impl HardwareScale {
    pub fn try_new(dout_pin: u8, sck_pin: u8) -> Result<Self> {
        Ok(Self {
            hx711: Hx711::open(dout_pin, sck_pin)?,
        })
    }
}

impl Scale for HardwareScale {
    fn read(&mut self, timeout: Duration) -> std::result::Result<i32, BoxError> {
        let mut attempts = 0;
        loop {
            match self.hx711.read_with_timeout(timeout) {
                Ok(raw) => return Ok(raw),
                Err(HwError::DataReadyTimeout) if attempts < MAX_TIMEOUT_RETRIES => {
                    attempts += 1;
                    tracing::warn!(retries = attempts, "scale timeout, retrying");
                }
                Err(e) => return Err(Box::new(e)),
            }
        }
    }
}

/// Switch input with the internal pull-up enabled (idle HIGH, pressed LOW).
pub struct GpioInput {
    pin: rppal::gpio::InputPin,
}

impl GpioInput {
    pub fn pull_up(pin: u8) -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(format!("open gpio: {e}")))?;
        let pin = gpio
            .get(pin)
            .map_err(|e| HwError::Pin { pin, reason: format!("open input: {e}") })?
            .into_input_pullup();
        Ok(Self { pin })
    }
}

impl InputPin for GpioInput {
    fn read(&mut self) -> std::result::Result<Level, BoxError> {
        Ok(if self.pin.is_high() {
            Level::High
        } else {
            Level::Low
        })
    }
}

/// Push-pull output; construction leaves the line level untouched.
pub struct GpioOutput {
    pin: rppal::gpio::OutputPin,
}

impl GpioOutput {
    pub fn new(pin: u8) -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(format!("open gpio: {e}")))?;
        let pin = gpio
            .get(pin)
            .map_err(|e| HwError::Pin { pin, reason: format!("open output: {e}") })?
            .into_output();
        Ok(Self { pin })
    }
}

impl OutputPin for GpioOutput {
    fn set_high(&mut self) -> std::result::Result<(), BoxError> {
        self.pin.set_high();
        Ok(())
    }

    fn set_low(&mut self) -> std::result::Result<(), BoxError> {
        self.pin.set_low();
        Ok(())
    }
}
