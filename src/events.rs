//! Interrupt-side shared state.
//!
//! Everything the interrupt handler touches lives here, outside the
//! controller lock:
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │ config cmd  │────▶│  wake flag       │◀────│                  │
//! │             │     │  (AtomicBool)    │     │  IrqHandler      │
//! │ reader      │◀────│  counter+signal  │◀────│  (irq context)   │
//! └─────────────┘     └──────────────────┘     └──────────────────┘
//! ```
//!
//! The notification is an `embassy-sync` signal: the handler overwrites
//! it with the latest interrupt count and any blocked reader wakes up.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

pub struct IrqEvents {
    wake_enabled: AtomicBool,
    count: AtomicU32,
    notify: Signal<CriticalSectionRawMutex, u32>,
}

impl Default for IrqEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl IrqEvents {
    pub const fn new() -> Self {
        Self {
            wake_enabled: AtomicBool::new(false),
            count: AtomicU32::new(0),
            notify: Signal::new(),
        }
    }

    // ── Wake flag ─────────────────────────────────────────────

    pub fn set_wake_enabled(&self, enabled: bool) {
        self.wake_enabled.store(enabled, Ordering::Release);
    }

    pub fn wake_enabled(&self) -> bool {
        self.wake_enabled.load(Ordering::Acquire)
    }

    // ── Notification ──────────────────────────────────────────

    /// Count one interrupt and wake readers. Safe from interrupt context.
    pub fn record(&self) -> u32 {
        let n = self.count.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        self.notify.signal(n);
        n
    }

    /// Interrupts seen since attach.
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }

    /// Consume a pending notification without blocking.
    pub fn try_take(&self) -> Option<u32> {
        self.notify.try_take()
    }

    /// Wait for the next notification. Returns the interrupt count.
    pub async fn wait(&self) -> u32 {
        self.notify.wait().await
    }
}
