#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Display-side helpers: redraw suppression and a terminal 16x2 renderer.
//!
//! The control loop requests a frame every tick; `Deduplicated` forwards it
//! to the device only when either line changed, which is what keeps a real
//! character LCD from flickering.
use std::io::Write;

use rice_traits::{BoxError, Display};

/// Pad or cut `text` to exactly `cols` characters.
pub fn fit(text: &str, cols: usize) -> String {
    let mut out: String = text.chars().take(cols).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', cols - len));
    out
}

/// Suppresses redraws of a frame identical to the last one shown.
///
/// Lines are compared field by field, so moving text from one line to the
/// other is always redrawn even when the concatenation is unchanged.
pub struct Deduplicated<D> {
    inner: D,
    last: Option<(String, String)>,
    redraws: u64,
}

impl<D: Display> Deduplicated<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            last: None,
            redraws: 0,
        }
    }

    /// Frames actually forwarded to the device.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Last frame shown, if any.
    pub fn current(&self) -> Option<(&str, &str)> {
        self.last.as_ref().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Display> Display for Deduplicated<D> {
    fn show(&mut self, line1: &str, line2: &str) -> Result<(), BoxError> {
        if let Some((a, b)) = &self.last
            && a == line1
            && b == line2
        {
            return Ok(());
        }
        // Only remember frames that reached the device, so a failed draw retries.
        self.inner.show(line1, line2)?;
        self.last = Some((line1.to_owned(), line2.to_owned()));
        self.redraws += 1;
        tracing::trace!(line1, line2, "display redraw");
        Ok(())
    }
}

/// Renders frames as a boxed character grid on any writer (stdout in the
/// simulator).
pub struct TerminalLcd<W: Write> {
    out: W,
    cols: usize,
}

impl<W: Write> TerminalLcd<W> {
    pub fn new(out: W, cols: u8) -> Self {
        Self {
            out,
            cols: usize::from(cols.max(1)),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Display for TerminalLcd<W> {
    fn show(&mut self, line1: &str, line2: &str) -> Result<(), BoxError> {
        let border = format!("+{}+", "-".repeat(self.cols));
        writeln!(self.out, "{border}")?;
        writeln!(self.out, "|{}|", fit(line1, self.cols))?;
        writeln!(self.out, "|{}|", fit(line2, self.cols))?;
        writeln!(self.out, "{border}")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Default)]
    struct Frames(Vec<(String, String)>);

    impl Display for Frames {
        fn show(&mut self, line1: &str, line2: &str) -> Result<(), BoxError> {
            self.0.push((line1.to_owned(), line2.to_owned()));
            Ok(())
        }
    }

    struct Broken;

    impl Display for Broken {
        fn show(&mut self, _: &str, _: &str) -> Result<(), BoxError> {
            Err("i2c nack".into())
        }
    }

    #[rstest]
    #[case("Mode: AUTO", 16, "Mode: AUTO      ")]
    #[case("Please Load Rice!", 16, "Please Load Rice")]
    #[case("", 4, "    ")]
    fn fit_pads_and_truncates(#[case] text: &str, #[case] cols: usize, #[case] want: &str) {
        assert_eq!(fit(text, cols), want);
    }

    #[test]
    fn identical_frames_draw_once() {
        let mut d = Deduplicated::new(Frames::default());
        for _ in 0..5 {
            d.show("Mode: WEIGHTING", "Weight: 0.00").unwrap();
        }
        assert_eq!(d.redraws(), 1);
        assert_eq!(d.inner().0.len(), 1);
    }

    #[test]
    fn any_line_change_redraws() {
        let mut d = Deduplicated::new(Frames::default());
        d.show("Mode: AUTO", "Weight: 0.00").unwrap();
        d.show("Mode: AUTO", "Weight: 0.01").unwrap();
        d.show("Mode: WEIGHTING", "Weight: 0.01").unwrap();
        assert_eq!(d.redraws(), 3);
        assert_eq!(d.current(), Some(("Mode: WEIGHTING", "Weight: 0.01")));
    }

    #[test]
    fn shifted_text_with_equal_concatenation_redraws() {
        let mut d = Deduplicated::new(Frames::default());
        d.show("AB", "CD").unwrap();
        d.show("ABC", "D").unwrap();
        assert_eq!(d.redraws(), 2);
    }

    #[test]
    fn failed_draw_is_retried() {
        let mut d = Deduplicated::new(Broken);
        assert!(d.show("a", "b").is_err());
        assert!(d.show("a", "b").is_err());
        assert_eq!(d.redraws(), 0);
        assert_eq!(d.current(), None);
    }

    #[test]
    fn terminal_lcd_draws_boxed_grid() {
        let mut lcd = TerminalLcd::new(Vec::new(), 8);
        lcd.show("Set", "Press +").unwrap();
        let text = String::from_utf8(lcd.into_inner()).unwrap();
        assert_eq!(
            text,
            "+--------+\n|Set     |\n|Press + |\n+--------+\n"
        );
    }
}
