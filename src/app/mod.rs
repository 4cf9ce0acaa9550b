//! Driver core: sequencing and policy, no direct hardware access.
//!
//! All interaction with the platform happens through the **port traits**
//! in [`ports`], so every ordering rule here is testable with a recording
//! backend.

pub mod commands;
pub mod controller;
pub mod device;
pub mod events;
pub mod ports;
