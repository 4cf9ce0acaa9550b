//! Port traits: the boundary between the resource controller and the
//! platform it runs on.
//!
//! ```text
//!   Backend adapter ──▶ Port trait ──▶ ResourceController (domain)
//! ```
//!
//! Pin-control, regulator and interrupt backends implement these traits.
//! The controller consumes them via generics, so sequencing logic never
//! touches a register directly and every ordering rule is testable with a
//! recording mock.

use embedded_hal::delay::DelayNs;

use crate::drivers::regulator::Rail;
use crate::error::HwError;
use crate::pins::PinCtl;

// ───────────────────────────────────────────────────────────────
// Pin-control port
// ───────────────────────────────────────────────────────────────

/// Named pin-configuration selection.
pub trait PinCtlPort {
    /// Obtain the pin controller for the device.
    ///
    /// Returns [`HwError::Deferred`] while the controller driver has not
    /// bound yet.
    fn acquire(&mut self) -> Result<(), HwError>;

    /// Resolve a configuration by name. Called once per state at attach.
    fn lookup(&mut self, state: PinCtl) -> Result<(), HwError>;

    /// Apply a configuration. Side-effecting on the hardware.
    fn select(&mut self, state: PinCtl) -> Result<(), HwError>;
}

// ───────────────────────────────────────────────────────────────
// Regulator port
// ───────────────────────────────────────────────────────────────

/// Power-rail control.
pub trait RailPort {
    /// Obtain a handle to `rail`. [`HwError::Missing`] if it is not wired.
    fn acquire(&mut self, rail: Rail) -> Result<(), HwError>;

    /// Number of selectable voltages; zero or negative for fixed rails.
    fn count_voltages(&self, rail: Rail) -> i32;

    fn set_voltage(&mut self, rail: Rail, min_uv: u32, max_uv: u32) -> Result<(), HwError>;

    /// Declare the expected load in µA.
    fn set_load(&mut self, rail: Rail, ua: u32) -> Result<(), HwError>;

    fn enable(&mut self, rail: Rail) -> Result<(), HwError>;

    fn disable(&mut self, rail: Rail) -> Result<(), HwError>;

    fn is_enabled(&self, rail: Rail) -> bool;
}

// ───────────────────────────────────────────────────────────────
// GPIO / interrupt port
// ───────────────────────────────────────────────────────────────

/// Interrupt trigger configuration requested at attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrqFlags {
    pub rising_edge: bool,
    pub oneshot: bool,
}

impl IrqFlags {
    /// Rising edge, one-shot: what the sensor's interrupt output needs.
    pub const SENSOR: Self = Self {
        rising_edge: true,
        oneshot: true,
    };
}

/// GPIO ownership plus the OS interrupt primitives for the sensor line.
///
/// `enable_irq` / `disable_irq` are typically backed by a nesting depth
/// counter, so callers must never issue them redundantly.
pub trait IrqLinePort {
    /// Claim a GPIO under `label`.
    fn request_gpio(&mut self, gpio: u32, label: &'static str) -> Result<(), HwError>;

    /// Return a GPIO claimed with [`request_gpio`](Self::request_gpio).
    fn free_gpio(&mut self, gpio: u32);

    /// Current logic level of a claimed GPIO. No side effects.
    fn level(&mut self, gpio: u32) -> Result<bool, HwError>;

    /// Request the interrupt behind `gpio`. The integrator routes it to
    /// [`IrqHandler::handle`](crate::drivers::irq_handler::IrqHandler::handle).
    fn request_irq(&mut self, gpio: u32, flags: IrqFlags, name: &'static str)
    -> Result<(), HwError>;

    fn free_irq(&mut self);

    fn enable_irq(&mut self);

    fn disable_irq(&mut self);

    /// Allow the line to bring the host out of suspend.
    fn enable_irq_wake(&mut self) -> Result<(), HwError>;

    /// Mark the device itself as wakeup capable.
    fn set_wakeup_capable(&mut self, capable: bool);
}

/// Everything the controller needs from the platform, behind one lock.
pub trait Platform: PinCtlPort + RailPort + IrqLinePort + DelayNs + Send {}

impl<T> Platform for T where T: PinCtlPort + RailPort + IrqLinePort + DelayNs + Send {}

// ───────────────────────────────────────────────────────────────
// Wake source port (interrupt context)
// ───────────────────────────────────────────────────────────────

/// Timed wake assertion.
///
/// Called from interrupt context: implementations must not block,
/// allocate or take locks that configuration paths hold.
pub trait WakeSourcePort: Send + Sync {
    /// Keep the host awake for `hold_ms` from now.
    fn stay_awake(&self, hold_ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Display blank subscription port
// ───────────────────────────────────────────────────────────────

/// Registration with the display blank notifier.
///
/// The notifier owns delivery: once registered it calls
/// [`Fpc1020Device::on_fb_event`](super::device::Fpc1020Device::on_fb_event)
/// once per transition.
pub trait BlankSubscriptionPort: Send {
    fn register(&mut self) -> Result<(), HwError>;

    fn unregister(&mut self);
}
