//! Sequencing hold times.
//!
//! Every hold is a `[min, max]` window in microseconds taken from the
//! sensor datasheet. The actual sleep is picked inside the window with a
//! small pseudo-random jitter so repeated sequences do not lock-step with
//! other periodic activity on the bus.

use embedded_hal::delay::DelayNs;

/// An inclusive sleep window in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepWindow {
    pub min_us: u32,
    pub max_us: u32,
}

impl SleepWindow {
    pub const fn new(min_us: u32, max_us: u32) -> Self {
        Self { min_us, max_us }
    }

    pub const fn contains(&self, us: u32) -> bool {
        us >= self.min_us && us <= self.max_us
    }
}

/// Reset held low during a reset pulse.
pub const RESET_LOW_HOLD: SleepWindow = SleepWindow::new(5000, 5100);
/// Reset held high between and after the low phases.
pub const RESET_HIGH_HOLD: SleepWindow = SleepWindow::new(100, 200);
/// Rail settle time around power-up and power-down.
pub const POWER_SETTLE: SleepWindow = SleepWindow::new(100, 1000);

/// How long a sensor interrupt keeps the host awake (ms).
pub const TTW_HOLD_MS: u32 = 400;

// ── Jitter ────────────────────────────────────────────────────

/// xorshift32 generator for hold jitter. Not a security primitive.
#[derive(Debug, Clone)]
pub struct Jitter(u32);

impl Jitter {
    pub const fn new(seed: u32) -> Self {
        // xorshift has a fixed point at zero.
        Self(if seed == 0 { 0x9E37_79B9 } else { seed })
    }

    fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    /// Pick a duration inside `window`.
    pub fn pick(&mut self, window: SleepWindow) -> u32 {
        let span = window.max_us.saturating_sub(window.min_us);
        if span == 0 {
            return window.min_us;
        }
        window.min_us + self.next() % (span + 1)
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Self::new(0x5EED_F1C0)
    }
}

/// Block for a jittered duration inside `window`. Returns the chosen hold.
pub fn sleep_in(delay: &mut impl DelayNs, jitter: &mut Jitter, window: SleepWindow) -> u32 {
    let us = jitter.pick(window);
    delay.delay_us(us);
    us
}
