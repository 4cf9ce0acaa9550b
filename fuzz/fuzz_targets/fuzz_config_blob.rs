//! Fuzz target: `DriverConfig::from_blob`
//!
//! Any blob that decodes must also validate, and must survive a
//! re-encode unchanged.
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use fpc1020::DriverConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = DriverConfig::from_blob(data) {
        assert!(config.validate().is_ok());
        let blob = config.to_blob().expect("encode decoded config");
        assert_eq!(DriverConfig::from_blob(&blob), Ok(config));
    }
});
