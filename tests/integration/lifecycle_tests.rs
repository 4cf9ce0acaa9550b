//! Attach and detach against the mock platform.

use fpc1020::app::ports::{IrqFlags, IrqLinePort};
use fpc1020::drivers::regulator::Rail;
use fpc1020::pins::PinCtl;
use fpc1020::{DriverConfig, Error, Fpc1020Device};

use crate::mock_hw::{Call, MockBlank, MockPlatform, MockWake, attach};

fn no_reset() -> DriverConfig {
    DriverConfig {
        reset_on_attach: false,
        ..DriverConfig::default()
    }
}

// ── Attach ────────────────────────────────────────────────────

#[test]
fn attach_claims_lines_then_requests_irq() {
    let (_dev, rec, _) = attach(no_reset());
    assert_eq!(
        rec.calls(),
        [
            Call::Gpio {
                gpio: 121,
                label: "fpc,gpio_irq"
            },
            Call::Gpio {
                gpio: 124,
                label: "fpc,gpio_rst"
            },
            Call::Select(PinCtl::ResetLow),
            Call::Select(PinCtl::IrqActive),
            Call::WakeupCapable,
            Call::RequestIrq(IrqFlags::SENSOR),
            Call::IrqWake,
            Call::BlankRegister,
        ]
    );
}

#[test]
fn attach_leaves_rails_off_and_irq_enabled() {
    let (dev, rec, _) = attach(DriverConfig::default());
    assert!(Rail::ALL.iter().all(|r| !rec.rail_on(*r)));
    assert!(!dev.controller().is_prepared());
    assert!(dev.controller().is_irq_enabled());
    assert!(!rec.calls().contains(&Call::IrqOff));
}

fn with_reset() -> DriverConfig {
    DriverConfig {
        reset_on_attach: true,
        ..DriverConfig::default()
    }
}

#[test]
fn default_attach_keeps_reset_asserted() {
    let (dev, rec, _) = attach(DriverConfig::default());
    let calls = rec.calls();
    assert!(calls.contains(&Call::Select(PinCtl::ResetLow)));
    assert!(!calls.contains(&Call::Select(PinCtl::ResetHigh)));
    assert!(!calls.contains(&Call::Level));
    assert!(!dev.controller().is_prepared());
}

#[test]
fn reset_pulse_on_attach_ends_asserted() {
    let (_dev, rec, _) = attach(with_reset());
    let calls = rec.calls();
    let register = rec.position(&Call::BlankRegister).unwrap();
    let pulse: Vec<&Call> = calls[register + 1..]
        .iter()
        .filter(|c| matches!(c, Call::Select(_)))
        .collect();
    assert_eq!(
        pulse,
        [
            &Call::Select(PinCtl::ResetLow),
            &Call::Select(PinCtl::ResetHigh),
            &Call::Select(PinCtl::ResetLow),
            &Call::Select(PinCtl::ResetHigh),
            &Call::Select(PinCtl::ResetLow),
        ]
    );
    let n = calls.len();
    assert_eq!(calls[n - 2], Call::Level);
    assert_eq!(calls[n - 1], Call::Select(PinCtl::ResetLow));
}

#[test]
fn auto_prepare_powers_up_before_reset() {
    let config = DriverConfig {
        auto_prepare_on_attach: true,
        ..with_reset()
    };
    let (dev, rec, _) = attach(config);
    assert!(dev.controller().is_prepared());

    let last_rail = rec.position(&Call::RailOn(Rail::VddAna)).unwrap();
    let first_level = rec.position(&Call::Level).unwrap();
    assert!(last_rail < first_level);
    assert!(Rail::ALL.iter().all(|r| rec.rail_on(*r)));

    // Powered, so the pulse leaves the sensor out of reset.
    assert_eq!(rec.calls().last(), Some(&Call::Level));
    assert_eq!(dev.status().last_pin, Some(PinCtl::ResetHigh.name()));
}

#[test]
fn not_wake_capable_skips_marking() {
    let config = DriverConfig {
        wake_capable: false,
        ..no_reset()
    };
    let (_dev, rec, _) = attach(config);
    assert!(!rec.calls().contains(&Call::WakeupCapable));
}

#[test]
fn missing_pin_configuration_aborts_before_irq() {
    for state in PinCtl::ALL {
        let (hw, rec) = MockPlatform::new();
        let res = Fpc1020Device::attach(
            hw.without_state(state),
            MockWake::default(),
            MockBlank::new(&rec),
            DriverConfig::default(),
        );
        assert_eq!(res.err(), Some(Error::Config("pin configuration missing")));
        let calls = rec.calls();
        assert!(!calls.iter().any(|c| matches!(c, Call::Select(_))));
        assert!(!calls.iter().any(|c| matches!(c, Call::RequestIrq(_))));
        assert!(!calls.contains(&Call::BlankRegister));
        assert_eq!(calls[calls.len() - 2..], [Call::FreeGpio(124), Call::FreeGpio(121)]);
        assert!(!rec.is_claimed(121));
        assert!(!rec.is_claimed(124));
    }
}

#[test]
fn reset_gpio_busy_returns_irq_gpio() {
    let (mut hw, rec) = MockPlatform::new();
    hw.request_gpio(124, "held elsewhere").unwrap();
    let res = Fpc1020Device::attach(hw, MockWake::default(), MockBlank::new(&rec), no_reset());
    assert_eq!(res.err(), Some(Error::Config("reset gpio unavailable")));
    assert_eq!(rec.calls().last(), Some(&Call::FreeGpio(121)));
    assert!(!rec.is_claimed(121));
    assert!(rec.is_claimed(124));
}

#[test]
fn irq_request_failure_releases_lines() {
    let (hw, rec) = MockPlatform::new();
    let res = Fpc1020Device::attach(
        hw.irq_busy(),
        MockWake::default(),
        MockBlank::new(&rec),
        DriverConfig::default(),
    );
    assert!(matches!(res.err(), Some(Error::Hardware(_))));
    let calls = rec.calls();
    assert_eq!(calls[calls.len() - 2..], [Call::FreeGpio(124), Call::FreeGpio(121)]);
    assert!(!calls.contains(&Call::BlankRegister));
    assert!(!rec.is_claimed(121));
}

#[test]
fn missing_rail_aborts_before_gpio() {
    let (hw, rec) = MockPlatform::new();
    let res = Fpc1020Device::attach(
        hw.without_rail(Rail::VccSpi),
        MockWake::default(),
        MockBlank::new(&rec),
        DriverConfig::default(),
    );
    assert!(matches!(res.err(), Some(Error::Config(_))));
    assert!(rec.calls().is_empty());
}

#[test]
fn missing_pinctrl_is_not_retryable() {
    let (hw, rec) = MockPlatform::new();
    let err = Fpc1020Device::attach(
        hw.without_pinctrl(),
        MockWake::default(),
        MockBlank::new(&rec),
        DriverConfig::default(),
    )
    .err()
    .unwrap();
    assert!(!err.is_retryable());
    assert_eq!(err.errno(), -22);
}

#[test]
fn invalid_config_rejected_without_touching_hardware() {
    let (hw, rec) = MockPlatform::new();
    let config = DriverConfig {
        rst_gpio: 121,
        ..DriverConfig::default()
    };
    let res = Fpc1020Device::attach(hw, MockWake::default(), MockBlank::new(&rec), config);
    assert!(matches!(res.err(), Some(Error::Config(_))));
    assert!(rec.calls().is_empty());
}

// ── Detach ────────────────────────────────────────────────────

#[test]
fn detach_unregisters_then_powers_down_then_releases_lines() {
    let config = DriverConfig {
        auto_prepare_on_attach: true,
        ..no_reset()
    };
    let (dev, rec, _) = attach(config);
    rec.clear();

    let _ = dev.detach();
    let calls = rec.calls();
    assert_eq!(calls.len(), 9);
    assert_eq!(calls[..2], [Call::BlankUnregister, Call::Select(PinCtl::ResetLow)]);
    assert!(matches!(calls[2], Call::Delay(us) if (100..=1000).contains(&us)));
    assert_eq!(
        calls[3..],
        [
            Call::RailOff(Rail::VddAna),
            Call::RailOff(Rail::VddIo),
            Call::RailOff(Rail::VccSpi),
            Call::FreeIrq,
            Call::FreeGpio(124),
            Call::FreeGpio(121),
        ]
    );
    assert!(!rec.is_claimed(121));
    assert!(!rec.is_claimed(124));
}

#[test]
fn detach_forces_off_rails_toggled_directly() {
    let (dev, rec, _) = attach(no_reset());
    dev.write("regulator_enable", "vdd_io,e").unwrap();
    assert!(!dev.controller().is_prepared());
    rec.clear();

    let _ = dev.detach();
    assert!(!rec.rail_on(Rail::VddIo));
    assert!(rec.calls().contains(&Call::RailOff(Rail::VddIo)));
    assert!(!rec.calls().contains(&Call::RailOff(Rail::VddAna)));
}

#[test]
fn reattach_after_detach() {
    let (dev, rec, _) = attach(with_reset());
    let (hw, _) = dev.detach();
    rec.clear();

    let again = Fpc1020Device::attach(hw, MockWake::default(), MockBlank::new(&rec), with_reset())
        .unwrap();
    assert!(rec.is_claimed(121));
    assert!(rec.is_claimed(124));
    assert!(rec.calls().contains(&Call::RequestIrq(IrqFlags::SENSOR)));
    assert!(again.controller().is_irq_enabled());
}
