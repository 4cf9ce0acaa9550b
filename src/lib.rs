//! FPC1020 fingerprint sensor power and interrupt resource controller.
//!
//! Sequences the sensor's three supply rails and reset line, gates its
//! interrupt line against the display/proximity policy and forwards
//! interrupts as timed wake assertions. The platform (pin control,
//! regulators, GPIO/IRQ, delays) is reached only through the traits in
//! [`app::ports`]; [`adapters::sim`] provides an in-memory backend.
//!
//! Entry point is [`Fpc1020Device::attach`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod events;
pub mod pins;
pub mod policy;
pub mod timing;

pub use app::commands::Command;
pub use app::device::Fpc1020Device;
pub use config::DriverConfig;
pub use error::{Error, HwError, Result};
