//! Fuzz target: `NmeaParser::push_all`
//!
//! Streams arbitrary bytes from the GNSS receiver into the sentence parser
//! and asserts that it never panics and only reports a position while the
//! last fix was valid.
//!
//! cargo fuzz run fuzz_nmea_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use stardust::drivers::nmea::NmeaParser;

fuzz_target!(|data: &[u8]| {
    let mut parser = NmeaParser::new();
    parser.push_all(data);

    if parser.position().is_some() {
        assert!(parser.is_valid());
        assert!(parser.sentences() > 0);
    }
});
