//! Edge-triggered push button on an active-low input.

use rice_traits::{InputPin, Level};

use crate::hw_error::map_hw_error;

/// Reports one press per HIGH→LOW transition of a pull-up input.
///
/// The last observed level starts LOW, so a line that is already held at
/// power-up does not count as a press until it is released and pressed again.
/// `is_pressed` must be polled exactly once per tick: every call records the
/// level, so a second call in the same tick consumes the edge.
pub struct DebouncedButton<P: InputPin> {
    name: &'static str,
    pin: P,
    last: Level,
}

impl<P: InputPin> DebouncedButton<P> {
    pub fn new(name: &'static str, pin: P) -> Self {
        Self {
            name,
            pin,
            last: Level::Low,
        }
    }

    pub fn is_pressed(&mut self) -> bool {
        let level = match self.pin.read() {
            Ok(level) => level,
            Err(e) => {
                tracing::warn!(button = self.name, error = %map_hw_error(&*e), "button read failed; treating as released");
                Level::High
            }
        };
        let pressed = self.last.is_high() && level.is_low();
        self.last = level;
        if pressed {
            tracing::debug!(button = self.name, "pressed");
        }
        pressed
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rice_traits::BoxError;
    use std::collections::VecDeque;

    struct Levels(VecDeque<Level>);

    impl InputPin for Levels {
        fn read(&mut self) -> Result<Level, BoxError> {
            self.0.pop_front().ok_or_else(|| "exhausted".into())
        }
    }

    fn run(levels: &[Level]) -> Vec<bool> {
        let mut b = DebouncedButton::new("test", Levels(levels.iter().copied().collect()));
        levels.iter().map(|_| b.is_pressed()).collect()
    }

    use Level::{High as H, Low as L};

    #[test]
    fn fires_once_per_falling_edge() {
        assert_eq!(
            run(&[H, L, L, L, H, H, L, H]),
            [false, true, false, false, false, false, true, false]
        );
    }

    #[test]
    fn starting_low_is_not_a_press() {
        assert_eq!(run(&[L, L, H, L]), [false, false, false, true]);
    }

    #[test]
    fn release_never_fires() {
        assert_eq!(run(&[H, H, H]), [false, false, false]);
    }

    #[test]
    fn read_error_counts_as_released() {
        let mut b = DebouncedButton::new("flaky", Levels(VecDeque::from([H, L])));
        assert!(!b.is_pressed());
        assert!(b.is_pressed());
        // Pin exhausted: every further read errors.
        assert!(!b.is_pressed());
        assert_eq!(b.last, Level::High);
    }
}
