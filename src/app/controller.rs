//! Resource controller, the electrical core of the driver.
//!
//! [`ResourceController`] owns the platform backend, the power state,
//! the interrupt gate and the policy inputs behind a single lock.
//! Every entry point takes that lock for its whole sequence, so a rail
//! step can never interleave with an interrupt-gate decision.
//!
//! ```text
//!  blank notifier ──┐
//!  proximity write ─┼──▶ ┌──────────── lock ────────────┐
//!  attribute cmds ──┘    │ PowerState · IrqGate · Policy │──▶ Platform ports
//!                        └───────────────────────────────┘
//! ```
//!
//! Holds inside the lock are real hardware settle times. None of this runs
//! in interrupt context.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::drivers::irq_gate::IrqGate;
use crate::drivers::pinctrl::PinControl;
use crate::drivers::regulator::{Rail, rail_setup};
use crate::error::{Error, Result};
use crate::pins::PinCtl;
use crate::policy::ScreenProximity;
use crate::timing::{self, Jitter, POWER_SETTLE, RESET_HIGH_HOLD, RESET_LOW_HOLD};

use super::ports::{IrqLinePort, Platform};

// ───────────────────────────────────────────────────────────────
// ResourceController
// ───────────────────────────────────────────────────────────────

pub struct ResourceController<P: Platform> {
    inner: Mutex<Inner<P>>,
}

struct Inner<P> {
    hw: P,
    irq_gpio: u32,
    prepared: bool,
    gate: IrqGate,
    policy: ScreenProximity,
    pins: PinControl,
    jitter: Jitter,
}

impl<P: Platform> ResourceController<P> {
    /// Take ownership of an attached platform.
    ///
    /// Initial state: unprepared, IRQ enabled, display on, uncovered.
    /// `pins` carries whatever attach already selected.
    pub fn new(hw: P, irq_gpio: u32, pins: PinControl) -> Self {
        Self {
            inner: Mutex::new(Inner {
                hw,
                irq_gpio,
                prepared: false,
                gate: IrqGate::new(),
                policy: ScreenProximity::default(),
                pins,
                jitter: Jitter::default(),
            }),
        }
    }

    /// Acquire the controller lock.
    ///
    /// A panic inside a previous holder leaves the state as consistent as
    /// the last completed backend call, so poisoning is not propagated.
    pub fn lock(&self) -> Locked<'_, P> {
        Locked(self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }

    // ── Locked entry points ───────────────────────────────────

    /// Run the reset pulse.
    pub fn reset(&self) {
        self.lock().hw_reset();
    }

    /// Power the sensor up or down. Idempotent.
    pub fn set_powered(&self, on: bool) -> bool {
        self.lock().set_powered(on)
    }

    /// Drive the interrupt gate directly. Idempotent.
    pub fn set_irq_enabled(&self, enabled: bool) -> bool {
        self.lock().set_irq_enabled(enabled)
    }

    /// Display transition from the blank notifier.
    pub fn on_display_blank(&self, blanked: bool) {
        let mut c = self.lock();
        let target = c.0.policy.on_display(blanked);
        c.set_irq_enabled(target);
    }

    /// Proximity report from the attribute surface.
    pub fn set_proximity(&self, covered: bool) {
        let mut c = self.lock();
        let target = c.0.policy.on_proximity(covered);
        c.set_irq_enabled(target);
    }

    /// Select a pin configuration on request.
    pub fn select_pin(&self, state: PinCtl) -> Result<()> {
        let mut c = self.lock();
        let Inner { hw, pins, .. } = &mut *c.0;
        pins.select(hw, state).map_err(Error::from)
    }

    /// Switch one rail directly, bypassing the power state.
    pub fn set_rail(&self, rail: Rail, enable: bool) -> Result<()> {
        let mut c = self.lock();
        rail_setup(&mut c.0.hw, rail, enable).map_err(Error::from)
    }

    /// Raw interrupt line level.
    pub fn irq_level(&self) -> Result<bool> {
        let mut c = self.lock();
        let gpio = c.0.irq_gpio;
        c.0.hw.level(gpio).map_err(Error::from)
    }

    /// Rails off in power-down order, whatever the power state says.
    pub fn force_power_off(&self) {
        self.lock().force_power_off();
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_prepared(&self) -> bool {
        self.lock().0.prepared
    }

    pub fn is_irq_enabled(&self) -> bool {
        self.lock().0.gate.is_enabled()
    }

    pub fn policy_inputs(&self) -> ScreenProximity {
        self.lock().0.policy
    }

    pub fn last_pin(&self) -> Option<PinCtl> {
        self.lock().0.pins.last()
    }

    /// Inspect the backend under the lock.
    pub fn with_platform<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.lock().0.hw)
    }

    pub fn with_platform_mut<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        f(&mut self.lock().0.hw)
    }

    /// Give the backend back. Only used by detach.
    pub fn into_platform(self) -> P {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .hw
    }
}

// ───────────────────────────────────────────────────────────────
// Locked: operations that require the controller lock
// ───────────────────────────────────────────────────────────────

/// Proof that the controller lock is held.
///
/// The reset pulse is only reachable through this guard: callers that
/// need several steps atomically (attach, the attribute surface) take the
/// lock once and sequence under it.
pub struct Locked<'a, P>(MutexGuard<'a, Inner<P>>);

impl<P: Platform> Locked<'_, P> {
    /// Four-phase reset pulse: low, high, low, high.
    ///
    /// Pin-select failures are logged and the pulse carries on; the
    /// sensor datasheet windows are kept regardless.
    pub fn hw_reset(&mut self) {
        let Inner {
            hw,
            irq_gpio,
            pins,
            jitter,
            ..
        } = &mut *self.0;

        let before = hw.level(*irq_gpio);
        debug!("hw_reset: irq line before = {:?}", before);

        for _ in 0..2 {
            let _ = pins.select(hw, PinCtl::ResetLow);
            timing::sleep_in(hw, jitter, RESET_LOW_HOLD);
            let _ = pins.select(hw, PinCtl::ResetHigh);
            timing::sleep_in(hw, jitter, RESET_HIGH_HOLD);
        }

        let after = hw.level(*irq_gpio);
        debug!("hw_reset: irq line after = {:?}", after);
    }

    /// Power sequencing. Returns `true` if the state changed.
    ///
    /// Up: reset low, rails SPI → IO → analog, settle, reset high.
    /// Down: reset low, settle, rails analog → IO → SPI.
    /// Rail failures are logged by [`rail_setup`] and never abort the
    /// sequence.
    pub fn set_powered(&mut self, on: bool) -> bool {
        if on == self.0.prepared {
            return false;
        }

        let Inner {
            hw, pins, jitter, ..
        } = &mut *self.0;

        if on {
            let _ = pins.select(hw, PinCtl::ResetLow);
            for rail in Rail::POWER_UP {
                let _ = rail_setup(hw, rail, true);
            }
            timing::sleep_in(hw, jitter, POWER_SETTLE);
            let _ = pins.select(hw, PinCtl::ResetHigh);
        } else {
            let _ = pins.select(hw, PinCtl::ResetLow);
            timing::sleep_in(hw, jitter, POWER_SETTLE);
            for rail in Rail::POWER_DOWN {
                let _ = rail_setup(hw, rail, false);
            }
        }

        self.0.prepared = on;
        info!("sensor {}", if on { "prepared" } else { "unprepared" });
        true
    }

    /// Gate the interrupt line. Returns `true` if a primitive was issued.
    pub fn set_irq_enabled(&mut self, enabled: bool) -> bool {
        let Inner { hw, gate, .. } = &mut *self.0;
        gate.apply(hw, enabled)
    }

    /// Unprepare sequence without the `prepared` short-circuit: reset
    /// low, settle, rails analog → IO → SPI.
    fn force_power_off(&mut self) {
        if self.0.prepared {
            warn!("forcing rails off while prepared");
        }
        let Inner {
            hw, pins, jitter, ..
        } = &mut *self.0;

        let _ = pins.select(hw, PinCtl::ResetLow);
        timing::sleep_in(hw, jitter, POWER_SETTLE);
        for rail in Rail::POWER_DOWN {
            let _ = rail_setup(hw, rail, false);
        }
        self.0.prepared = false;
    }

    /// Assert reset unless the sensor is powered.
    pub fn hold_reset_if_unprepared(&mut self) {
        if !self.0.prepared {
            let Inner { hw, pins, .. } = &mut *self.0;
            let _ = pins.select(hw, PinCtl::ResetLow);
        }
    }

    pub fn is_prepared(&self) -> bool {
        self.0.prepared
    }
}
