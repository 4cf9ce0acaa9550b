//! Screen / proximity interrupt policy.
//!
//! With the display off, the sensor may only interrupt the host while
//! nothing covers it, which keeps a pocketed device from waking itself.
//! With the display on the interrupt is always enabled, whatever the
//! proximity sensor last reported.
//!
//! | display blanked | covered | IRQ      |
//! |-----------------|---------|----------|
//! | yes             | yes     | disabled |
//! | yes             | no      | enabled  |
//! | no              | any     | enabled  |
//!
//! Note the asymmetry: unblanking re-enables the interrupt even if the
//! proximity sensor still reports covered and never updates again.

/// Target interrupt state for the given inputs.
pub const fn irq_target(display_blanked: bool, covered: bool) -> bool {
    !(display_blanked && covered)
}

/// The two policy inputs, as last reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenProximity {
    pub display_blanked: bool,
    pub covered: bool,
}

impl ScreenProximity {
    /// Record a display transition and return the new target.
    pub fn on_display(&mut self, blanked: bool) -> bool {
        self.display_blanked = blanked;
        self.target()
    }

    /// Record a proximity report and return the new target.
    pub fn on_proximity(&mut self, covered: bool) -> bool {
        self.covered = covered;
        self.target()
    }

    pub fn target(&self) -> bool {
        irq_target(self.display_blanked, self.covered)
    }
}
