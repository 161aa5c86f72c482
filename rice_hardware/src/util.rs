use std::time::{Duration, Instant};

use crate::error::{HwError, Result};

/// Block until `line_is_high` reports the line pulled low or `timeout` expires.
///
/// Polls every `poll_interval`; the HX711 signals data-ready by pulling DOUT low.
pub fn wait_for_low(
    mut line_is_high: impl FnMut() -> bool,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if !line_is_high() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(HwError::DataReadyTimeout);
        }
        std::thread::sleep(poll_interval);
    }
}
