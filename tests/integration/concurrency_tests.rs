//! Interleaved callers on independent threads.
//!
//! Blank notifications, proximity writes, power commands and resets race
//! each other. The controller lock must keep every sequence contiguous in
//! the hardware journal and the gate balanced.

use fpc1020::DriverConfig;
use fpc1020::drivers::regulator::Rail;
use fpc1020::pins::PinCtl;
use fpc1020::policy::irq_target;

use crate::mock_hw::{Call, attach};

const ROUNDS: usize = 100;

fn quiet() -> DriverConfig {
    DriverConfig {
        reset_on_attach: false,
        ..DriverConfig::default()
    }
}

#[test]
fn gate_stays_balanced_under_contention() {
    let (dev, rec, _) = attach(quiet());

    std::thread::scope(|s| {
        s.spawn(|| {
            for i in 0..ROUNDS {
                dev.on_fb_event(if i % 2 == 0 { 4 } else { 0 });
            }
        });
        s.spawn(|| {
            for i in 0..ROUNDS {
                let v = if i % 3 == 0 { "0" } else { "1" };
                dev.write("proximity_state", v).unwrap();
            }
        });
        s.spawn(|| {
            for i in 0..ROUNDS {
                dev.controller().set_irq_enabled(i % 5 != 0);
            }
        });
    });

    assert!(rec.max_disable_depth() <= 1);
    assert_eq!(rec.min_disable_depth(), 0);

    let gate: Vec<Call> = rec
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::IrqOn | Call::IrqOff))
        .collect();
    for pair in gate.windows(2) {
        assert_ne!(pair[0], pair[1], "redundant gate primitive");
    }
}

#[test]
fn final_gate_matches_final_inputs() {
    let (dev, _rec, _) = attach(quiet());

    std::thread::scope(|s| {
        s.spawn(|| {
            for i in 0..ROUNDS {
                dev.on_display_blank(i % 2 == 1);
            }
        });
        s.spawn(|| {
            for i in 0..ROUNDS {
                dev.controller().set_proximity(i % 7 < 3);
            }
        });
    });

    let inputs = dev.controller().policy_inputs();
    assert_eq!(
        dev.controller().is_irq_enabled(),
        irq_target(inputs.display_blanked, inputs.covered)
    );
}

#[test]
fn power_and_reset_sequences_never_interleave() {
    let (dev, rec, _) = attach(quiet());

    std::thread::scope(|s| {
        s.spawn(|| {
            for i in 0..ROUNDS {
                let v = if i % 2 == 0 { "enable" } else { "disable" };
                dev.write("device_prepare", v).unwrap();
            }
        });
        s.spawn(|| {
            for _ in 0..ROUNDS / 10 {
                dev.write("hw_reset", "reset").unwrap();
            }
        });
        s.spawn(|| {
            for i in 0..ROUNDS {
                dev.on_fb_event(if i % 2 == 0 { 4 } else { 0 });
                dev.write("proximity_state", "1").unwrap();
            }
        });
    });

    let calls = rec.calls();

    // Power-up: from the spi rail to the reset release, nothing foreign.
    for (i, _) in calls
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == Call::RailOn(Rail::VccSpi))
    {
        let tail = &calls[i..];
        let end = tail
            .iter()
            .position(|c| *c == Call::Select(PinCtl::ResetHigh))
            .unwrap();
        let rails: Vec<&Call> = tail[..end]
            .iter()
            .filter(|c| !matches!(c, Call::Load(..) | Call::Delay(_)))
            .collect();
        assert_eq!(
            rails,
            [
                &Call::RailOn(Rail::VccSpi),
                &Call::RailOn(Rail::VddIo),
                &Call::RailOn(Rail::VddAna),
            ]
        );
    }

    // Reset pulse: level, four selects with holds, level.
    let pulse_start = |w: &[Call]| {
        w[0] == Call::Level
            && w[1] == Call::Select(PinCtl::ResetLow)
            && matches!(w[2], Call::Delay(us) if us >= 5000)
    };
    let mut pulses = 0;
    for (i, _) in calls.windows(3).enumerate().filter(|(_, w)| pulse_start(*w)) {
        pulses += 1;
        let pulse = &calls[i..i + 10];
        assert!(matches!(pulse[2], Call::Delay(_)));
        assert_eq!(pulse[3], Call::Select(PinCtl::ResetHigh));
        assert_eq!(pulse[5], Call::Select(PinCtl::ResetLow));
        assert_eq!(pulse[7], Call::Select(PinCtl::ResetHigh));
        assert_eq!(pulse[9], Call::Level);
    }
    assert_eq!(pulses, ROUNDS / 10);

    // Power-down: reset low and the settle hold come first, then the
    // rails in reverse order.
    let mut downs = 0;
    for (i, _) in calls
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == Call::RailOff(Rail::VddAna))
    {
        downs += 1;
        assert!(i >= 2);
        assert_eq!(calls[i - 2], Call::Select(PinCtl::ResetLow));
        assert!(matches!(calls[i - 1], Call::Delay(us) if (100..=1000).contains(&us)));
        assert_eq!(calls[i + 1], Call::RailOff(Rail::VddIo));
        assert_eq!(calls[i + 2], Call::RailOff(Rail::VccSpi));
    }
    assert_eq!(downs, ROUNDS / 2);

    // The last command was a disable, and the rails agree with the flag.
    assert!(!dev.controller().is_prepared());
    for rail in Rail::ALL {
        assert_eq!(rec.rail_on(rail), dev.controller().is_prepared());
    }

    assert_eq!(rec.min_disable_depth(), 0);
}
