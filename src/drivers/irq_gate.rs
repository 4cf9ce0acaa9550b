//! Idempotent interrupt gate.
//!
//! The OS enable/disable primitives behind [`IrqLinePort`] nest: each
//! disable must be paired with exactly one enable. The gate owns the single
//! last-applied state for the line and forwards only real changes.

use log::debug;

use crate::app::ports::IrqLinePort;

#[derive(Debug)]
pub struct IrqGate {
    enabled: bool,
}

impl Default for IrqGate {
    fn default() -> Self {
        Self::new()
    }
}

impl IrqGate {
    /// A freshly requested line is enabled.
    pub const fn new() -> Self {
        Self { enabled: true }
    }

    /// Drive the line to `target`. Returns `true` if a primitive was issued.
    pub fn apply(&mut self, line: &mut impl IrqLinePort, target: bool) -> bool {
        if target == self.enabled {
            return false;
        }
        if target {
            line.enable_irq();
        } else {
            line.disable_irq();
        }
        self.enabled = target;
        debug!("irq gate -> {}", if target { "enabled" } else { "disabled" });
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
