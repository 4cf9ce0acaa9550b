//! In-memory platform backend.
//!
//! Implements every platform port against plain fields and journals each
//! side-effecting call, so the controller's ordering rules can be checked
//! call by call. Read-only queries (`is_enabled`, `count_voltages`) are
//! not journaled; line level reads are, since the reset pulse brackets
//! itself with them.
//!
//! Failures are injected per rail or per pin configuration and surface as
//! `HwError::Failed(-5)`.
//!
//! The journal keeps at most [`JOURNAL_CAP`] entries; past that the oldest
//! half is dropped.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::app::ports::{
    BlankSubscriptionPort, IrqFlags, IrqLinePort, PinCtlPort, RailPort, WakeSourcePort,
};
use crate::drivers::regulator::Rail;
use crate::error::HwError;
use crate::pins::PinCtl;

const EIO: i32 = -5;
const EBUSY: i32 = -16;

/// Upper bound on retained journal entries.
pub const JOURNAL_CAP: usize = 4096;

/// One side-effecting backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    Lookup(PinCtl),
    Select(PinCtl),
    SetVoltage(Rail, u32, u32),
    SetLoad(Rail, u32),
    RailEnable(Rail),
    RailDisable(Rail),
    /// Delay in µs.
    Sleep(u32),
    RequestGpio(u32),
    FreeGpio(u32),
    ReadLevel(u32),
    RequestIrq(u32),
    FreeIrq,
    IrqEnable,
    IrqDisable,
    IrqWake,
    WakeupCapable(bool),
}

#[derive(Debug, Clone, Copy)]
struct SimRail {
    present: bool,
    adjustable: bool,
    on: bool,
    fail_load: bool,
    fail_enable: bool,
}

impl SimRail {
    const fn new() -> Self {
        Self {
            present: true,
            adjustable: false,
            on: false,
            fail_load: false,
            fail_enable: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SimPin {
    present: bool,
    fail_select: bool,
}

const fn rail_idx(rail: Rail) -> usize {
    match rail {
        Rail::VddAna => 0,
        Rail::VccSpi => 1,
        Rail::VddIo => 2,
    }
}

const fn pin_idx(state: PinCtl) -> usize {
    match state {
        PinCtl::ResetLow => 0,
        PinCtl::ResetHigh => 1,
        PinCtl::IrqActive => 2,
    }
}

// ───────────────────────────────────────────────────────────────
// SimPlatform
// ───────────────────────────────────────────────────────────────

pub struct SimPlatform {
    journal: Vec<HwCall>,
    rails: [SimRail; 3],
    pins: [SimPin; 3],
    pinctrl_present: bool,
    pinctrl_deferred: bool,
    gpios: Vec<u32>,
    irq_level: bool,
    irq_requested: bool,
    irq_wake: bool,
    wakeup_capable: bool,
    irq_depth: u32,
    real_delays: bool,
}

impl Default for SimPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl SimPlatform {
    /// Fully wired board: all rails fixed-voltage and off, every pin
    /// configuration present, interrupt line low.
    pub fn new() -> Self {
        Self {
            journal: Vec::new(),
            rails: [SimRail::new(); 3],
            pins: [SimPin {
                present: true,
                fail_select: false,
            }; 3],
            pinctrl_present: true,
            pinctrl_deferred: false,
            gpios: Vec::new(),
            irq_level: false,
            irq_requested: false,
            irq_wake: false,
            wakeup_capable: false,
            irq_depth: 0,
            real_delays: false,
        }
    }

    /// Make delays actually sleep the calling thread.
    pub fn with_real_delays(mut self) -> Self {
        self.real_delays = true;
        self
    }

    // ── Journal ───────────────────────────────────────────────

    pub fn journal(&self) -> &[HwCall] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    fn record(&mut self, call: HwCall) {
        if self.journal.len() >= JOURNAL_CAP {
            self.journal.drain(..JOURNAL_CAP / 2);
        }
        self.journal.push(call);
    }

    // ── Board wiring ──────────────────────────────────────────

    pub fn remove_rail(&mut self, rail: Rail) {
        self.rails[rail_idx(rail)].present = false;
    }

    pub fn set_adjustable(&mut self, rail: Rail, adjustable: bool) {
        self.rails[rail_idx(rail)].adjustable = adjustable;
    }

    pub fn remove_state(&mut self, state: PinCtl) {
        self.pins[pin_idx(state)].present = false;
    }

    pub fn remove_pinctrl(&mut self) {
        self.pinctrl_present = false;
    }

    /// Pin controller exists but has not bound yet.
    pub fn defer_pinctrl(&mut self) {
        self.pinctrl_deferred = true;
    }

    pub fn set_irq_level(&mut self, high: bool) {
        self.irq_level = high;
    }

    // ── Fault injection ───────────────────────────────────────

    pub fn fail_load(&mut self, rail: Rail) {
        self.rails[rail_idx(rail)].fail_load = true;
    }

    pub fn fail_enable(&mut self, rail: Rail) {
        self.rails[rail_idx(rail)].fail_enable = true;
    }

    pub fn fail_select(&mut self, state: PinCtl) {
        self.pins[pin_idx(state)].fail_select = true;
    }

    /// Another owner already holds the interrupt.
    pub fn occupy_irq(&mut self) {
        self.irq_requested = true;
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn is_rail_on(&self, rail: Rail) -> bool {
        self.rails[rail_idx(rail)].on
    }

    pub fn is_claimed(&self, gpio: u32) -> bool {
        self.gpios.contains(&gpio)
    }

    pub fn irq_requested(&self) -> bool {
        self.irq_requested
    }

    pub fn irq_wake(&self) -> bool {
        self.irq_wake
    }

    pub fn wakeup_capable(&self) -> bool {
        self.wakeup_capable
    }

    /// Nesting depth of `disable_irq`, as the interrupt core counts it.
    pub fn irq_disable_depth(&self) -> u32 {
        self.irq_depth
    }
}

impl PinCtlPort for SimPlatform {
    fn acquire(&mut self) -> Result<(), HwError> {
        if self.pinctrl_deferred {
            return Err(HwError::Deferred);
        }
        if !self.pinctrl_present {
            return Err(HwError::Missing);
        }
        Ok(())
    }

    fn lookup(&mut self, state: PinCtl) -> Result<(), HwError> {
        self.record(HwCall::Lookup(state));
        if self.pins[pin_idx(state)].present {
            Ok(())
        } else {
            Err(HwError::Missing)
        }
    }

    fn select(&mut self, state: PinCtl) -> Result<(), HwError> {
        self.record(HwCall::Select(state));
        let pin = self.pins[pin_idx(state)];
        if !pin.present {
            return Err(HwError::Missing);
        }
        if pin.fail_select {
            return Err(HwError::Failed(EIO));
        }
        Ok(())
    }
}

impl RailPort for SimPlatform {
    fn acquire(&mut self, rail: Rail) -> Result<(), HwError> {
        if self.rails[rail_idx(rail)].present {
            Ok(())
        } else {
            Err(HwError::Missing)
        }
    }

    fn count_voltages(&self, rail: Rail) -> i32 {
        if self.rails[rail_idx(rail)].adjustable {
            1
        } else {
            0
        }
    }

    fn set_voltage(&mut self, rail: Rail, min_uv: u32, max_uv: u32) -> Result<(), HwError> {
        self.record(HwCall::SetVoltage(rail, min_uv, max_uv));
        Ok(())
    }

    fn set_load(&mut self, rail: Rail, ua: u32) -> Result<(), HwError> {
        self.record(HwCall::SetLoad(rail, ua));
        if self.rails[rail_idx(rail)].fail_load {
            return Err(HwError::Failed(EIO));
        }
        Ok(())
    }

    fn enable(&mut self, rail: Rail) -> Result<(), HwError> {
        self.record(HwCall::RailEnable(rail));
        let r = &mut self.rails[rail_idx(rail)];
        if r.fail_enable {
            return Err(HwError::Failed(EIO));
        }
        r.on = true;
        Ok(())
    }

    fn disable(&mut self, rail: Rail) -> Result<(), HwError> {
        self.record(HwCall::RailDisable(rail));
        self.rails[rail_idx(rail)].on = false;
        Ok(())
    }

    fn is_enabled(&self, rail: Rail) -> bool {
        self.rails[rail_idx(rail)].on
    }
}

impl IrqLinePort for SimPlatform {
    fn request_gpio(&mut self, gpio: u32, label: &'static str) -> Result<(), HwError> {
        self.record(HwCall::RequestGpio(gpio));
        if self.gpios.contains(&gpio) {
            return Err(HwError::Failed(EBUSY));
        }
        debug!("sim: gpio {} claimed as {}", gpio, label);
        self.gpios.push(gpio);
        Ok(())
    }

    fn free_gpio(&mut self, gpio: u32) {
        self.record(HwCall::FreeGpio(gpio));
        self.gpios.retain(|g| *g != gpio);
    }

    fn level(&mut self, gpio: u32) -> Result<bool, HwError> {
        self.record(HwCall::ReadLevel(gpio));
        Ok(self.irq_level)
    }

    fn request_irq(
        &mut self,
        gpio: u32,
        flags: IrqFlags,
        name: &'static str,
    ) -> Result<(), HwError> {
        self.record(HwCall::RequestIrq(gpio));
        if self.irq_requested {
            return Err(HwError::Failed(EBUSY));
        }
        debug!("sim: irq for gpio {} as {} ({:?})", gpio, name, flags);
        self.irq_requested = true;
        Ok(())
    }

    fn free_irq(&mut self) {
        self.record(HwCall::FreeIrq);
        self.irq_requested = false;
        self.irq_wake = false;
    }

    fn enable_irq(&mut self) {
        self.record(HwCall::IrqEnable);
        match self.irq_depth.checked_sub(1) {
            Some(d) => self.irq_depth = d,
            None => warn!("sim: unbalanced enable_irq"),
        }
    }

    fn disable_irq(&mut self) {
        self.record(HwCall::IrqDisable);
        self.irq_depth += 1;
    }

    fn enable_irq_wake(&mut self) -> Result<(), HwError> {
        self.record(HwCall::IrqWake);
        self.irq_wake = true;
        Ok(())
    }

    fn set_wakeup_capable(&mut self, capable: bool) {
        self.record(HwCall::WakeupCapable(capable));
        self.wakeup_capable = capable;
    }
}

impl DelayNs for SimPlatform {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.record(HwCall::Sleep(us));
        if self.real_delays {
            std::thread::sleep(Duration::from_micros(u64::from(us)));
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Wake source and blank notifier
// ───────────────────────────────────────────────────────────────

/// Counts wake assertions instead of holding a real wakeup source.
#[derive(Debug, Default)]
pub struct SimWakeSource {
    assertions: AtomicU32,
    last_hold_ms: AtomicU32,
}

impl SimWakeSource {
    pub const fn new() -> Self {
        Self {
            assertions: AtomicU32::new(0),
            last_hold_ms: AtomicU32::new(0),
        }
    }

    pub fn assertions(&self) -> u32 {
        self.assertions.load(Ordering::Acquire)
    }

    pub fn last_hold_ms(&self) -> u32 {
        self.last_hold_ms.load(Ordering::Acquire)
    }
}

impl WakeSourcePort for SimWakeSource {
    fn stay_awake(&self, hold_ms: u32) {
        self.last_hold_ms.store(hold_ms, Ordering::Release);
        self.assertions.fetch_add(1, Ordering::AcqRel);
    }
}

/// Blank notifier registration that only tracks whether it is live.
#[derive(Debug, Default)]
pub struct SimBlankSource {
    registered: bool,
    fail_register: bool,
}

impl SimBlankSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_register(&mut self) {
        self.fail_register = true;
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }
}

impl BlankSubscriptionPort for SimBlankSource {
    fn register(&mut self) -> Result<(), HwError> {
        if self.fail_register {
            return Err(HwError::Failed(EIO));
        }
        self.registered = true;
        Ok(())
    }

    fn unregister(&mut self) {
        self.registered = false;
    }
}
