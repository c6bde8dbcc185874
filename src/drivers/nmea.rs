//! Streaming NMEA 0183 sentence parser.
//!
//! Bytes are pushed one at a time as they arrive from the receiver.
//! Complete sentences with a valid checksum update the fix state:
//!
//! - `GGA` gives fix quality, position and altitude above mean sea level,
//! - `RMC` gives position and the receiver's validity flag.
//!
//! Talker IDs (`GP`, `GN`, `GL`, …) are ignored.  Positions are kept in
//! millionths of a degree and altitude in millimetres.

use log::trace;

use crate::sensors::gps::GnssPosition;

/// Longest sentence buffered; anything longer is discarded.
pub const MAX_SENTENCE_LEN: usize = 100;

#[derive(Debug, Default)]
pub struct NmeaParser {
    buf: heapless::Vec<u8, MAX_SENTENCE_LEN>,
    overflow: bool,
    valid: bool,
    fix_quality: u8,
    latitude: i64,
    longitude: i64,
    altitude_mm: Option<i64>,
    sentences: u32,
    checksum_errors: u32,
}

impl NmeaParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte; returns `true` when it completed a good sentence.
    pub fn push(&mut self, byte: u8) -> bool {
        match byte {
            b'$' => {
                self.buf.clear();
                self.overflow = false;
                let _ = self.buf.push(byte);
                false
            }
            b'\r' | b'\n' => {
                if self.buf.is_empty() || self.overflow {
                    self.buf.clear();
                    return false;
                }
                let done = self.finish();
                self.buf.clear();
                done
            }
            _ => {
                if !self.buf.is_empty() && self.buf.push(byte).is_err() {
                    self.overflow = true;
                }
                false
            }
        }
    }

    pub fn push_all(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push(b);
        }
    }

    /// Whether the last position-bearing sentence reported a valid fix.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// GGA fix quality; 0 is no fix.
    pub fn fix_quality(&self) -> u8 {
        self.fix_quality
    }

    pub fn position(&self) -> Option<GnssPosition> {
        self.valid.then_some(GnssPosition {
            latitude_millionths: self.latitude,
            longitude_millionths: self.longitude,
            altitude_mm: self.altitude_mm,
        })
    }

    pub fn sentences(&self) -> u32 {
        self.sentences
    }

    pub fn checksum_errors(&self) -> u32 {
        self.checksum_errors
    }

    fn finish(&mut self) -> bool {
        let Ok(text) = core::str::from_utf8(&self.buf) else {
            return false;
        };
        let Some(body) = verify_checksum(text) else {
            self.checksum_errors += 1;
            trace!("nmea: bad checksum: {}", text);
            return false;
        };
        let body = body.to_owned();
        let mut fields = body.split(',');
        let Some(kind) = fields.next().filter(|k| k.len() >= 3) else {
            return false;
        };
        let handled = match kind.get(kind.len() - 3..) {
            Some("GGA") => self.gga(fields),
            Some("RMC") => self.rmc(fields),
            _ => false,
        };
        if handled {
            self.sentences += 1;
        }
        handled
    }

    /// `time,lat,N,lon,E,quality,sats,hdop,alt,M,...`
    fn gga<'a>(&mut self, mut f: impl Iterator<Item = &'a str>) -> bool {
        let _time = f.next();
        let lat = coordinate(f.next(), f.next(), 'S');
        let lon = coordinate(f.next(), f.next(), 'W');
        let quality = f.next().and_then(|q| q.parse::<u8>().ok()).unwrap_or(0);
        let _sats = f.next();
        let _hdop = f.next();
        let altitude = f.next().and_then(parse_metres_to_mm);

        self.fix_quality = quality;
        self.valid = quality > 0 && lat.is_some() && lon.is_some();
        if let (true, Some(lat), Some(lon)) = (self.valid, lat, lon) {
            self.latitude = lat;
            self.longitude = lon;
            self.altitude_mm = altitude;
        }
        true
    }

    /// `time,status,lat,N,lon,E,...`
    fn rmc<'a>(&mut self, mut f: impl Iterator<Item = &'a str>) -> bool {
        let _time = f.next();
        let active = f.next() == Some("A");
        let lat = coordinate(f.next(), f.next(), 'S');
        let lon = coordinate(f.next(), f.next(), 'W');

        self.valid = active && lat.is_some() && lon.is_some();
        if let (true, Some(lat), Some(lon)) = (self.valid, lat, lon) {
            self.latitude = lat;
            self.longitude = lon;
        }
        true
    }
}

/// Strip `$` and `*hh`, returning the body when the checksum matches.
fn verify_checksum(sentence: &str) -> Option<&str> {
    let inner = sentence.strip_prefix('$')?;
    let (body, sum) = inner.split_once('*')?;
    let expected = u8::from_str_radix(sum.get(..2)?, 16).ok()?;
    let actual = body.bytes().fold(0u8, |acc, b| acc ^ b);
    (actual == expected).then_some(body)
}

/// `ddmm.mmmm` (or `dddmm.mmmm`) plus hemisphere to millionths of a degree.
fn coordinate(value: Option<&str>, hemisphere: Option<&str>, negative: char) -> Option<i64> {
    let raw: f64 = value.filter(|v| !v.is_empty())?.parse().ok()?;
    let degrees = (raw / 100.0).trunc();
    let minutes = raw - degrees * 100.0;
    let millionths = ((degrees + minutes / 60.0) * 1_000_000.0).round() as i64;
    let hemisphere = hemisphere?.chars().next()?;
    Some(if hemisphere == negative {
        millionths.saturating_neg()
    } else {
        millionths
    })
}

fn parse_metres_to_mm(field: &str) -> Option<i64> {
    let metres: f64 = field.parse().ok()?;
    Some((metres * 1000.0).round() as i64)
}
