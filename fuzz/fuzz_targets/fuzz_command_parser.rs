//! Fuzz target: `Command::parse`
//!
//! Splits the input into an attribute name and a value at the first NUL
//! byte and asserts that parsing never panics and that every accepted rail
//! command names a rail that exists.
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use fpc1020::Command;
use fpc1020::drivers::regulator::Rail;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let (attr, input) = text.split_once('\0').unwrap_or(("regulator_enable", text));

    if let Ok(Command::Rail { rail, .. }) = Command::parse(attr, input) {
        assert!(Rail::ALL.contains(&rail));
        assert!(input.len() > rail.name().len(), "rail op missing");
    }
});
