//! Runtime diagnostics.
//!
//! A [`Status`] snapshot collects the controller state, the policy inputs
//! and the interrupt-side counters in one place. It is collected on demand
//! (`status` in the simulator) and serialises to JSON for log scraping.

use serde::Serialize;

use crate::error::{Error, Result};

/// Point-in-time view of one attached device.
///
/// Fields are read one lock acquisition at a time, so a snapshot taken
/// while another context is mid-transition may mix before and after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub prepared: bool,
    pub irq_enabled: bool,
    pub wake_enabled: bool,
    pub display_blanked: bool,
    pub proximity_covered: bool,
    pub wait_finger_down: bool,
    /// Name of the last pin configuration applied successfully.
    pub last_pin: Option<&'static str>,
    pub irq_count: u32,
}

impl Status {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|_| Error::Config("status encode failed"))
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "prepared={} irq={} wake={} blanked={} covered={} fdw={} pin={} irqs={}",
            self.prepared,
            if self.irq_enabled { "on" } else { "off" },
            self.wake_enabled,
            self.display_blanked,
            self.proximity_covered,
            self.wait_finger_down,
            self.last_pin.unwrap_or("-"),
            self.irq_count,
        )
    }
}
