//! Hardware seams for the rice valve controller.
//!
//! Everything the control loop touches goes through these traits so the core
//! stays testable on a host and the hardware crate can swap real GPIO for
//! simulated devices.
pub mod clock;

pub use clock::{Clock, MonotonicClock, TestClock};

/// Error type crossing the trait boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Digital line level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    #[inline]
    pub fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }

    #[inline]
    pub fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

/// Load-cell front end returning raw ADC counts.
pub trait Scale {
    fn read(&mut self, timeout: std::time::Duration) -> Result<i32, BoxError>;
}

/// Digital input (switches, buttons).
pub trait InputPin {
    fn read(&mut self) -> Result<Level, BoxError>;
}

/// Digital output (valve solenoid driver).
pub trait OutputPin {
    fn set_high(&mut self) -> Result<(), BoxError>;
    fn set_low(&mut self) -> Result<(), BoxError>;
}

/// Two-line character display.
pub trait Display {
    fn show(&mut self, line1: &str, line2: &str) -> Result<(), BoxError>;
}

impl<T: Scale + ?Sized> Scale for Box<T> {
    fn read(&mut self, timeout: std::time::Duration) -> Result<i32, BoxError> {
        (**self).read(timeout)
    }
}

impl<T: InputPin + ?Sized> InputPin for Box<T> {
    fn read(&mut self) -> Result<Level, BoxError> {
        (**self).read()
    }
}

impl<T: OutputPin + ?Sized> OutputPin for Box<T> {
    fn set_high(&mut self) -> Result<(), BoxError> {
        (**self).set_high()
    }
    fn set_low(&mut self) -> Result<(), BoxError> {
        (**self).set_low()
    }
}

impl<T: Display + ?Sized> Display for Box<T> {
    fn show(&mut self, line1: &str, line2: &str) -> Result<(), BoxError> {
        (**self).show(line1, line2)
    }
}
