//! HD44780 character LCD behind a PCF8574 I2C backpack (4-bit mode).
use std::thread::sleep;
use std::time::Duration;

use rice_traits::{BoxError, Display};
use rppal::i2c::I2c;

use crate::error::{HwError, Result};

const BACKLIGHT: u8 = 0x08;
const ENABLE: u8 = 0x04;
const RS_DATA: u8 = 0x01;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_INCREMENT: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

pub struct I2cLcd {
    i2c: I2c,
    addr: u8,
    cols: u8,
    rows: u8,
}

impl I2cLcd {
    pub fn open(addr: u8, cols: u8, rows: u8) -> Result<Self> {
        let lcd_err = |reason: String| HwError::Lcd { addr, reason };
        let mut i2c = I2c::new().map_err(|e| lcd_err(format!("open i2c bus: {e}")))?;
        i2c.set_slave_address(u16::from(addr))
            .map_err(|e| lcd_err(format!("select address: {e}")))?;
        let mut lcd = Self {
            i2c,
            addr,
            cols,
            rows,
        };
        lcd.init()?;
        Ok(lcd)
    }

    fn init(&mut self) -> Result<()> {
        sleep(Duration::from_millis(50));
        // Force 8-bit mode three times, then drop to 4-bit.
        for _ in 0..3 {
            self.pulse(0x30 | BACKLIGHT)?;
            sleep(Duration::from_millis(5));
        }
        self.pulse(0x20 | BACKLIGHT)?;
        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_ENTRY_INCREMENT)?;
        self.clear()
    }

    fn clear(&mut self) -> Result<()> {
        self.command(CMD_CLEAR)?;
        sleep(Duration::from_millis(2));
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<()> {
        let row = usize::from(row.min(self.rows.saturating_sub(1)));
        self.command(CMD_SET_DDRAM | (col + ROW_OFFSETS[row]))
    }

    fn command(&mut self, byte: u8) -> Result<()> {
        self.write_byte(byte, 0)
    }

    fn write_byte(&mut self, byte: u8, mode: u8) -> Result<()> {
        self.pulse((byte & 0xF0) | mode | BACKLIGHT)?;
        self.pulse(((byte << 4) & 0xF0) | mode | BACKLIGHT)
    }

    fn pulse(&mut self, bits: u8) -> Result<()> {
        self.raw(bits | ENABLE)?;
        sleep(Duration::from_micros(1));
        self.raw(bits & !ENABLE)?;
        sleep(Duration::from_micros(50));
        Ok(())
    }

    fn raw(&mut self, byte: u8) -> Result<()> {
        self.i2c
            .write(&[byte])
            .map(|_| ())
            .map_err(|e| HwError::Lcd {
                addr: self.addr,
                reason: e.to_string(),
            })
    }

    fn print_row(&mut self, row: u8, text: &str) -> Result<()> {
        self.set_cursor(0, row)?;
        for b in text.bytes().take(usize::from(self.cols)) {
            self.write_byte(b, RS_DATA)?;
        }
        Ok(())
    }
}

impl Display for I2cLcd {
    fn show(&mut self, line1: &str, line2: &str) -> std::result::Result<(), BoxError> {
        self.clear()?;
        self.print_row(0, line1)?;
        self.print_row(1, line2)?;
        Ok(())
    }
}
