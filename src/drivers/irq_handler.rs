//! Sensor interrupt handler.
//!
//! This type is the only code that runs in interrupt context. It holds no
//! reference to the resource controller, so it cannot take the controller
//! lock: it reads the atomic wake flag, asserts a timed wake if allowed,
//! bumps the notification and returns. Nothing here allocates or blocks.

use std::sync::Arc;

use crate::app::ports::WakeSourcePort;
use crate::events::IrqEvents;

/// What the handler reports back to the interrupt core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqReturn {
    Handled,
}

/// Interrupt context entry point, cloned out of the device at attach.
pub struct IrqHandler<W: WakeSourcePort> {
    events: Arc<IrqEvents>,
    wake: Arc<W>,
    hold_ms: u32,
}

impl<W: WakeSourcePort> Clone for IrqHandler<W> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            wake: Arc::clone(&self.wake),
            hold_ms: self.hold_ms,
        }
    }
}

impl<W: WakeSourcePort> IrqHandler<W> {
    pub(crate) fn new(events: Arc<IrqEvents>, wake: Arc<W>, hold_ms: u32) -> Self {
        Self {
            events,
            wake,
            hold_ms,
        }
    }

    /// Service one sensor interrupt.
    pub fn handle(&self) -> IrqReturn {
        if self.events.wake_enabled() {
            self.wake.stay_awake(self.hold_ms);
        }
        self.events.record();
        IrqReturn::Handled
    }
}
