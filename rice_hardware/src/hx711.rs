//! Bit-banged HX711 load-cell ADC over two rppal GPIO lines.
use std::time::Duration;
use tracing::trace;

use rppal::gpio::{Gpio, InputPin, OutputPin};

use crate::error::{HwError, Result};
use crate::util::wait_for_low;

/// Channel A, gain 128: one extra clock pulse after the 24 data bits.
pub const GAIN_128_PULSES: u8 = 1;

const DATA_READY_POLL: Duration = Duration::from_micros(200);

pub struct Hx711 {
    dout: InputPin,
    sck: OutputPin,
    gain_pulses: u8,
}

impl Hx711 {
    pub fn open(dout_pin: u8, sck_pin: u8) -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(format!("open hx711: {e}")))?;
        let dout = gpio
            .get(dout_pin)
            .map_err(|e| HwError::Pin { pin: dout_pin, reason: format!("open hx711 dout: {e}") })?
            .into_input();
        let mut sck = gpio
            .get(sck_pin)
            .map_err(|e| HwError::Pin { pin: sck_pin, reason: format!("open hx711 sck: {e}") })?
            .into_output();
        // Holding SCK high for >60us powers the chip down.
        sck.set_low();
        Ok(Self {
            dout,
            sck,
            gain_pulses: GAIN_128_PULSES,
        })
    }

    pub fn read_with_timeout(&mut self, timeout: Duration) -> Result<i32> {
        let dout = &self.dout;
        wait_for_low(|| dout.is_high(), timeout, DATA_READY_POLL)?;

        let mut value: i32 = 0;
        for _ in 0..24 {
            self.sck.set_high();
            std::hint::spin_loop();
            value = (value << 1) | i32::from(self.dout.is_high());
            self.sck.set_low();
            std::hint::spin_loop();
        }

        // Extra pulses select channel/gain for the next conversion.
        for _ in 0..self.gain_pulses {
            self.sck.set_high();
            std::hint::spin_loop();
            self.sck.set_low();
            std::hint::spin_loop();
        }

        // 24-bit two's complement
        if (value & 0x80_0000) != 0 {
            value |= !0xFF_FFFF;
        }
        trace!(raw = value, "hx711 raw read");
        Ok(value)
    }
}
