//! Pin-control selection with diagnostics.
//!
//! Selection is always a backend call; nothing is cached except the name
//! of the last configuration that was applied successfully, which the
//! status snapshot reports.

use log::{debug, error};

use crate::app::ports::PinCtlPort;
use crate::error::HwError;
use crate::pins::PinCtl;

#[derive(Debug, Default)]
pub struct PinControl {
    last: Option<PinCtl>,
}

impl PinControl {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Apply `state` through the backend and log the outcome.
    pub fn select(&mut self, hw: &mut impl PinCtlPort, state: PinCtl) -> Result<(), HwError> {
        match hw.select(state) {
            Ok(()) => {
                debug!("Selected '{}'", state.name());
                self.last = Some(state);
                Ok(())
            }
            Err(e) => {
                error!("cannot select '{}': {}", state.name(), e);
                Err(e)
            }
        }
    }

    /// Last configuration applied successfully.
    pub fn last(&self) -> Option<PinCtl> {
        self.last
    }
}
