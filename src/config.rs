//! Driver configuration.
//!
//! The optional properties of the sensor's platform description, as an
//! explicit struct. Integrators decode it from JSON or from a compact
//! postcard blob handed over by the platform layer.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::timing::TTW_HOLD_MS;

/// Per-device configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    // --- Platform description flags ---
    /// Power the sensor up as the last step of attach (`fpc,enable-on-boot`).
    pub auto_prepare_on_attach: bool,
    /// Mark the device as a wakeup source (`fpc,enable-wakeup`).
    pub wake_capable: bool,

    // --- GPIO lines ---
    /// Sensor interrupt GPIO number.
    pub irq_gpio: u32,
    /// Sensor reset GPIO number.
    pub rst_gpio: u32,

    // --- Timing ---
    /// How long an interrupt holds the host awake (ms).
    pub ttw_hold_ms: u32,
    /// Run one reset pulse at the end of attach. Reset is re-asserted
    /// afterwards unless the sensor was prepared.
    pub reset_on_attach: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            auto_prepare_on_attach: false,
            wake_capable: true,
            irq_gpio: 121,
            rst_gpio: 124,
            ttw_hold_ms: TTW_HOLD_MS,
            reset_on_attach: false,
        }
    }
}

impl DriverConfig {
    /// Reject values that cannot describe real hardware.
    pub fn validate(&self) -> Result<()> {
        if self.ttw_hold_ms == 0 {
            return Err(Error::Config("ttw_hold_ms must be non-zero"));
        }
        if self.irq_gpio == self.rst_gpio {
            return Err(Error::Config("irq and reset share a GPIO"));
        }
        Ok(())
    }

    /// Decode and validate a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|_| Error::Config("malformed JSON config"))?;
        config.validate()?;
        Ok(config)
    }

    /// Decode and validate a postcard configuration blob.
    pub fn from_blob(bytes: &[u8]) -> Result<Self> {
        let config: Self =
            postcard::from_bytes(bytes).map_err(|_| Error::Config("malformed config blob"))?;
        config.validate()?;
        Ok(config)
    }

    /// Encode as a postcard blob.
    pub fn to_blob(&self) -> Result<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| Error::Config("config encode failed"))
    }
}
