//! Attribute commands from user space.
//!
//! Each writable attribute of the device node maps to one [`Command`].
//! Parsing is strict: anything not listed below is
//! [`Error::InvalidCommand`] and never reaches the controller.
//!
//! | Attribute          | Accepted input              |
//! |--------------------|-----------------------------|
//! | `pinctl_set`       | pin configuration name      |
//! | `device_prepare`   | `enable` / `disable`        |
//! | `regulator_enable` | `<rail>,e` / `<rail>,d`     |
//! | `hw_reset`         | `reset`                     |
//! | `wakeup_enable`    | `enable` / `disable`        |
//! | `clk_enable`       | anything (ignored)          |
//! | `irq`              | anything (ack, ignored)     |
//! | `fingerdown_wait`  | `enable` / `disable`        |
//! | `proximity_state`  | decimal integer, `0` = far  |
//!
//! A single trailing newline, as `echo` appends, is tolerated everywhere.

use crate::drivers::regulator::Rail;
use crate::error::{Error, Result};
use crate::pins::PinCtl;

/// Longest rail name the `regulator_enable` attribute accepts.
const RAIL_NAME_MAX: usize = 15;

/// Commands the attribute surface can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectPin(PinCtl),
    Prepare(bool),
    Rail { rail: Rail, enable: bool },
    Reset,
    Wakeup(bool),
    ClockEnable,
    IrqAck,
    FingerDownWait(bool),
    Proximity(bool),
}

impl Command {
    /// Parse a write of `input` to `attribute`.
    pub fn parse(attribute: &str, input: &str) -> Result<Self> {
        let input = input.strip_suffix('\n').unwrap_or(input);
        match attribute {
            "pinctl_set" => PinCtl::from_name(input)
                .map(Self::SelectPin)
                .ok_or(Error::InvalidCommand("unknown pin configuration")),
            "device_prepare" => parse_switch(input).map(Self::Prepare),
            "regulator_enable" => parse_rail(input),
            "hw_reset" => match input {
                "reset" => Ok(Self::Reset),
                _ => Err(Error::InvalidCommand("expected 'reset'")),
            },
            "wakeup_enable" => parse_switch(input).map(Self::Wakeup),
            "clk_enable" => Ok(Self::ClockEnable),
            "irq" => Ok(Self::IrqAck),
            "fingerdown_wait" => parse_switch(input).map(Self::FingerDownWait),
            "proximity_state" => input
                .parse::<i32>()
                .map(|v| Self::Proximity(v != 0))
                .map_err(|_| Error::InvalidCommand("proximity must be an integer")),
            _ => Err(Error::InvalidCommand("unknown attribute")),
        }
    }
}

fn parse_switch(input: &str) -> Result<bool> {
    match input {
        "enable" => Ok(true),
        "disable" => Ok(false),
        _ => Err(Error::InvalidCommand("expected 'enable' or 'disable'")),
    }
}

/// `<name>,<op>`, name at most 15 bytes, op `e` or `d`.
fn parse_rail(input: &str) -> Result<Command> {
    let (name, op) = input
        .split_once(',')
        .ok_or(Error::InvalidCommand("expected '<rail>,<e|d>'"))?;

    let name: heapless::String<RAIL_NAME_MAX> = name
        .try_into()
        .map_err(|_| Error::InvalidCommand("rail name too long"))?;
    if name.is_empty() {
        return Err(Error::InvalidCommand("empty rail name"));
    }

    let enable = match op.chars().next() {
        Some('e') => true,
        Some('d') => false,
        _ => return Err(Error::InvalidCommand("rail op must be 'e' or 'd'")),
    };

    let rail = Rail::from_name(&name).ok_or(Error::InvalidCommand("unknown rail"))?;
    Ok(Command::Rail { rail, enable })
}
