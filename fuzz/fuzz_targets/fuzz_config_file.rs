//! Fuzz target: `StardustConfig::load`
//!
//! Feeds arbitrary SD-card file contents to the config loader.  Loading
//! must never panic and must always yield a usable sea-level pressure.
//!
//! cargo fuzz run fuzz_config_file

#![no_main]

use libfuzzer_sys::fuzz_target;
use stardust::app::ports::LogSink;
use stardust::config::StardustConfig;

struct Discard;

impl LogSink for Discard {
    fn log_msg(&mut self, _msg: &str) {}
    fn log_data(&mut self, _line: &str) {}
}

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let config = StardustConfig::load(&text, &mut Discard);
    assert!(config.sea_level_pressure_hpa.is_finite());
    assert!(config.sea_level_pressure_hpa > 0.0);
});
