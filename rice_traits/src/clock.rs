use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Millisecond clock abstraction for the control loop.
///
/// - now_ms(): wrapping 32-bit millisecond counter (rolls over after ~49.7 days)
/// - sleep(): sleeps for the provided duration (implementations may simulate)
/// - elapsed_ms(): wraparound-safe milliseconds since an earlier `now_ms()`
pub trait Clock {
    fn now_ms(&self) -> u32;
    fn sleep(&self, d: Duration);

    /// Milliseconds elapsed since `since`, correct across counter rollover.
    #[inline]
    fn elapsed_ms(&self, since: u32) -> u32 {
        self.now_ms().wrapping_sub(since)
    }
}

/// Real-time clock counting milliseconds from its construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now_ms(&self) -> u32 {
        // Truncation is the rollover.
        self.origin.elapsed().as_millis() as u32
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

/// Deterministic clock whose time is advanced manually.
///
/// Clones share the same counter, so a test can keep a handle while the
/// controller owns another. sleep(d) advances time without blocking.
#[derive(Debug, Clone, Default)]
pub struct TestClock {
    ms: Arc<Mutex<u32>>,
}

impl TestClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at an arbitrary counter value (e.g. just before rollover).
    pub fn starting_at(ms: u32) -> Self {
        Self {
            ms: Arc::new(Mutex::new(ms)),
        }
    }

    /// Advance the counter by `ms`, wrapping like the hardware timer.
    pub fn advance(&self, ms: u32) {
        if let Ok(mut cur) = self.ms.lock() {
            *cur = cur.wrapping_add(ms);
        }
    }

    /// Set the absolute counter value.
    pub fn set(&self, ms: u32) {
        if let Ok(mut cur) = self.ms.lock() {
            *cur = ms;
        }
    }
}

impl Clock for TestClock {
    fn now_ms(&self) -> u32 {
        self.ms.lock().map(|g| *g).unwrap_or(0)
    }

    fn sleep(&self, d: Duration) {
        self.advance(d.as_millis() as u32);
    }
}
