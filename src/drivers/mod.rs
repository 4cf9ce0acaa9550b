//! Sensor-facing building blocks driven by the resource controller.

pub mod irq_gate;
pub mod irq_handler;
pub mod pinctrl;
pub mod regulator;
