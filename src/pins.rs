//! Pin-control configuration names and GPIO labels for the sensor.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding configuration names. The names match the pin-control states
//! the platform description declares for the sensor node.

/// The named pin-control configurations the driver selects.
///
/// Exactly one reset-related configuration is active at any time; the
/// backend decides what each name does electrically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinCtl {
    /// Reset line driven low (sensor held in reset).
    ResetLow,
    /// Reset line released high.
    ResetHigh,
    /// Interrupt line routed to the host interrupt controller.
    IrqActive,
}

impl PinCtl {
    /// Every configuration that must resolve at attach.
    pub const ALL: [PinCtl; 3] = [Self::ResetLow, Self::ResetHigh, Self::IrqActive];

    /// Backend-visible configuration name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ResetLow => "fpc1020_reset_reset",
            Self::ResetHigh => "fpc1020_reset_active",
            Self::IrqActive => "fpc1020_irq_active",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

// ---------------------------------------------------------------------------
// GPIO labels
// ---------------------------------------------------------------------------

/// Label of the sensor interrupt GPIO.
pub const IRQ_GPIO_LABEL: &str = "fpc,gpio_irq";
/// Label of the sensor reset GPIO.
pub const RST_GPIO_LABEL: &str = "fpc,gpio_rst";

/// Name the interrupt line is requested under.
pub const DEVICE_NAME: &str = "fpc1020";
