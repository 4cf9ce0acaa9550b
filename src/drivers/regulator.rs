//! Sensor power rails.
//!
//! Three 1.8 V rails feed the sensor. Their enable order encodes a
//! power-sequencing requirement: SPI logic first, then IO, then the analog
//! supply. Power-down is the exact reverse.

use log::{error, warn};

use crate::app::ports::RailPort;
use crate::error::HwError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rail {
    /// Primary analog supply.
    VddAna,
    /// SPI logic supply.
    VccSpi,
    /// IO logic supply.
    VddIo,
}

/// Fixed electrical targets for one rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RailSpec {
    pub name: &'static str,
    pub min_uv: u32,
    pub max_uv: u32,
    pub ua_load: u32,
}

impl Rail {
    pub const ALL: [Rail; 3] = [Self::VddAna, Self::VccSpi, Self::VddIo];
    pub const POWER_UP: [Rail; 3] = [Self::VccSpi, Self::VddIo, Self::VddAna];
    pub const POWER_DOWN: [Rail; 3] = [Self::VddAna, Self::VddIo, Self::VccSpi];

    pub const fn spec(self) -> RailSpec {
        match self {
            Self::VddAna => RailSpec {
                name: "vdd_ana",
                min_uv: 1_800_000,
                max_uv: 1_800_000,
                ua_load: 6000,
            },
            Self::VccSpi => RailSpec {
                name: "vcc_spi",
                min_uv: 1_800_000,
                max_uv: 1_800_000,
                ua_load: 10,
            },
            Self::VddIo => RailSpec {
                name: "vdd_io",
                min_uv: 1_800_000,
                max_uv: 1_800_000,
                ua_load: 6000,
            },
        }
    }

    pub const fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }
}

/// Switch one rail.
///
/// Enable programs the voltage window (only for adjustable rails) and the
/// load before enabling; programming failures are logged and the enable
/// still goes ahead. Only the enable result is returned.
///
/// Disable is a no-op for a rail that is already off and never fails.
pub fn rail_setup(hw: &mut impl RailPort, rail: Rail, enable: bool) -> Result<(), HwError> {
    let spec = rail.spec();

    if !enable {
        if hw.is_enabled(rail) {
            if let Err(e) = hw.disable(rail) {
                warn!("error disabling {}: {}", spec.name, e);
            }
        }
        return Ok(());
    }

    if hw.count_voltages(rail) > 0 {
        if let Err(e) = hw.set_voltage(rail, spec.min_uv, spec.max_uv) {
            error!("Unable to set voltage on {}, {}", spec.name, e);
        }
    }

    if let Err(e) = hw.set_load(rail, spec.ua_load) {
        error!("Unable to set current on {}, {}", spec.name, e);
    }

    hw.enable(rail).inspect_err(|e| {
        error!("error enabling {}: {}", spec.name, e);
    })
}
