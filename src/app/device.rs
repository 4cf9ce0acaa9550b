//! Device lifecycle: attach, command dispatch and detach.
//!
//! ```text
//!  Unattached ──attach──▶ Attached(unprepared, irq on)
//!                           │   ▲
//!                 prepare   ▼   │  unprepare
//!                         Attached(prepared)
//!                           │
//!                         detach ──▶ rails off ──▶ Unattached
//! ```
//!
//! An [`Fpc1020Device`] only exists while attached: [`Fpc1020Device::attach`]
//! is the only constructor and [`Fpc1020Device::detach`] consumes it.
//! Every method takes `&self`, so the device can be shared between the
//! blank notifier, the attribute surface and the interrupt dispatcher.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{error, info, warn};

use crate::config::DriverConfig;
use crate::diagnostics::Status;
use crate::drivers::irq_handler::IrqHandler;
use crate::drivers::pinctrl::PinControl;
use crate::drivers::regulator::Rail;
use crate::error::{Error, HwError, Result};
use crate::events::IrqEvents;
use crate::pins::{self, PinCtl};

use super::commands::Command;
use super::controller::ResourceController;
use super::events::BlankEvent;
use super::ports::{
    BlankSubscriptionPort, IrqFlags, IrqLinePort, PinCtlPort, Platform, RailPort, WakeSourcePort,
};

pub struct Fpc1020Device<P: Platform, W: WakeSourcePort, B: BlankSubscriptionPort> {
    controller: ResourceController<P>,
    events: Arc<IrqEvents>,
    handler: IrqHandler<W>,
    blank: std::sync::Mutex<B>,
    wait_finger_down: AtomicBool,
    config: DriverConfig,
}

impl<P, W, B> Fpc1020Device<P, W, B>
where
    P: Platform,
    W: WakeSourcePort,
    B: BlankSubscriptionPort,
{
    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring the device up.
    ///
    /// Resources are resolved before anything is driven, so a missing
    /// rail or pin configuration fails without touching the hardware.
    /// A pin controller that has not bound yet yields
    /// [`Error::Unavailable`]; the caller retries later. Every failure
    /// after the GPIO claims returns them.
    ///
    /// The device comes up with reset asserted unless it is prepared.
    pub fn attach(mut hw: P, wake: W, mut blank: B, config: DriverConfig) -> Result<Self> {
        config.validate()?;

        for rail in Rail::ALL {
            RailPort::acquire(&mut hw, rail).map_err(|e| {
                error!("CRITICAL: Cannot get {} regulator: {}", rail.name(), e);
                Error::Config("regulator missing")
            })?;
        }

        hw.request_gpio(config.irq_gpio, pins::IRQ_GPIO_LABEL)
            .map_err(|_| Error::Config("irq gpio unavailable"))?;
        if hw.request_gpio(config.rst_gpio, pins::RST_GPIO_LABEL).is_err() {
            hw.free_gpio(config.irq_gpio);
            return Err(Error::Config("reset gpio unavailable"));
        }

        let pins = match bind_pins(&mut hw) {
            Ok(pins) => pins,
            Err(e) => {
                release_lines(&mut hw, &config);
                return Err(e);
            }
        };

        let events = Arc::new(IrqEvents::new());
        events.set_wake_enabled(false);

        if config.wake_capable {
            hw.set_wakeup_capable(true);
        }

        if let Err(e) = hw.request_irq(config.irq_gpio, IrqFlags::SENSOR, pins::DEVICE_NAME) {
            error!("irq request failed: {}", e);
            release_lines(&mut hw, &config);
            return Err(e.into());
        }

        if let Err(e) = hw.enable_irq_wake() {
            warn!("irq wake not enabled: {}", e);
        }

        if let Err(e) = blank.register() {
            error!("blank notifier registration failed: {}", e);
            hw.free_irq();
            release_lines(&mut hw, &config);
            return Err(e.into());
        }

        let handler = IrqHandler::new(Arc::clone(&events), Arc::new(wake), config.ttw_hold_ms);
        let controller = ResourceController::new(hw, config.irq_gpio, pins);

        {
            let mut c = controller.lock();
            if config.auto_prepare_on_attach {
                c.set_powered(true);
            }
            if config.reset_on_attach {
                c.hw_reset();
                c.hold_reset_if_unprepared();
            }
        }

        info!("attach: ok");
        Ok(Self {
            controller,
            events,
            handler,
            blank: std::sync::Mutex::new(blank),
            wait_finger_down: AtomicBool::new(false),
            config,
        })
    }

    /// Tear the device down and hand the backends back.
    ///
    /// The notification sources go first so nothing re-gates the line
    /// halfway through. The sensor is then unprepared whatever the power
    /// state says, and the interrupt and both GPIOs are released.
    pub fn detach(self) -> (P, B) {
        let mut blank = self
            .blank
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        blank.unregister();

        self.controller.force_power_off();

        let mut hw = self.controller.into_platform();
        hw.free_irq();
        release_lines(&mut hw, &self.config);
        info!("detach: ok");
        (hw, blank)
    }

    // ── External inputs ───────────────────────────────────────

    /// Display notifier entry point with a raw framebuffer blank code.
    pub fn on_fb_event(&self, code: i32) {
        if let Some(ev) = BlankEvent::from_fb_code(code) {
            self.on_display_blank(ev.is_blanked());
        }
    }

    pub fn on_display_blank(&self, blanked: bool) {
        self.controller.on_display_blank(blanked);
    }

    /// Write `input` to the named attribute.
    pub fn write(&self, attribute: &str, input: &str) -> Result<()> {
        let cmd = Command::parse(attribute, input)?;
        self.execute(cmd)
    }

    /// Read the `irq` attribute: the line level as `0` or `1`.
    pub fn read_irq(&self) -> Result<u8> {
        self.controller.irq_level().map(u8::from)
    }

    pub fn execute(&self, cmd: Command) -> Result<()> {
        match cmd {
            Command::SelectPin(state) => self.controller.select_pin(state),
            Command::Prepare(on) => {
                self.controller.set_powered(on);
                Ok(())
            }
            Command::Rail { rail, enable } => self.controller.set_rail(rail, enable),
            Command::Reset => {
                self.controller.reset();
                Ok(())
            }
            Command::Wakeup(on) => {
                self.events.set_wake_enabled(on);
                Ok(())
            }
            Command::ClockEnable | Command::IrqAck => Ok(()),
            Command::FingerDownWait(on) => {
                self.wait_finger_down.store(on, Ordering::Release);
                Ok(())
            }
            Command::Proximity(covered) => {
                self.controller.set_proximity(covered);
                Ok(())
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn controller(&self) -> &ResourceController<P> {
        &self.controller
    }

    /// Interrupt entry point for the platform's dispatcher.
    pub fn irq_handler(&self) -> IrqHandler<W> {
        self.handler.clone()
    }

    /// Notification source for readers waiting on interrupts.
    pub fn irq_events(&self) -> Arc<IrqEvents> {
        Arc::clone(&self.events)
    }

    /// Advisory flag for the sensor protocol collaborator.
    pub fn wait_finger_down(&self) -> bool {
        self.wait_finger_down.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn status(&self) -> Status {
        let inputs = self.controller.policy_inputs();
        Status {
            prepared: self.controller.is_prepared(),
            irq_enabled: self.controller.is_irq_enabled(),
            wake_enabled: self.events.wake_enabled(),
            display_blanked: inputs.display_blanked,
            proximity_covered: inputs.covered,
            wait_finger_down: self.wait_finger_down(),
            last_pin: self.controller.last_pin().map(PinCtl::name),
            irq_count: self.events.count(),
        }
    }
}

/// Resolve the pin controller and every configuration, then park the
/// lines: reset asserted, interrupt routed.
fn bind_pins(hw: &mut impl Platform) -> Result<PinControl> {
    match PinCtlPort::acquire(hw) {
        Ok(()) => {}
        Err(HwError::Deferred) => {
            info!("pinctrl is not ready");
            return Err(Error::Unavailable("pinctrl not ready"));
        }
        Err(_) => {
            error!("Target does not use pinctrl");
            return Err(Error::Config("pinctrl missing"));
        }
    }

    for state in PinCtl::ALL {
        hw.lookup(state).map_err(|_| {
            error!("cannot find '{}'", state.name());
            Error::Config("pin configuration missing")
        })?;
        info!("found pin control {}", state.name());
    }

    let mut pins = PinControl::new();
    let _ = pins.select(hw, PinCtl::ResetLow);
    let _ = pins.select(hw, PinCtl::IrqActive);
    Ok(pins)
}

fn release_lines(hw: &mut impl IrqLinePort, config: &DriverConfig) {
    hw.free_gpio(config.rst_gpio);
    hw.free_gpio(config.irq_gpio);
}
