//! Payload configuration
//!
//! Tunables read at boot from `StardustConfig.txt` on the SD card.  The file
//! is plain `KEY=value` text; keys are case-insensitive, `#` starts a
//! comment line and blank lines are skipped.  Anything missing or malformed
//! falls back to the compiled-in default.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::LogSink;
use crate::error::ConfigError;

/// Configuration file name on the SD card.
pub const CONFIG_FILE_NAME: &str = "StardustConfig.txt";

pub const KEY_SEA_LEVEL_PRESSURE: &str = "SEALEVELPRESSURE";
pub const KEY_DATA_FILE_MSEC_BUMP: &str = "DATAFILEMSECBUMP";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StardustConfig {
    /// Sea-level reference pressure for the altitude formula (hPa)
    pub sea_level_pressure_hpa: f64,
    /// Interval after which the data file is rolled over (milliseconds)
    pub data_file_msec_bump: u32,
}

impl Default for StardustConfig {
    fn default() -> Self {
        Self {
            sea_level_pressure_hpa: 1013.25,
            data_file_msec_bump: 600_000, // 10 min
        }
    }
}

/// One `KEY=value` line, key upper-cased, both sides trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry<'a> {
    pub key: String,
    pub value: &'a str,
}

/// Split one line.  `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<ConfigEntry<'_>>, ConfigError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (key, value) = line.split_once('=').ok_or(ConfigError::MissingSeparator)?;
    Ok(Some(ConfigEntry {
        key: key.trim().to_ascii_uppercase(),
        value: value.trim(),
    }))
}

impl StardustConfig {
    /// Apply every recognised line of `text` on top of the defaults.
    pub fn load(text: &str, log: &mut dyn LogSink) -> Self {
        let mut config = Self::default();
        for (lineno, line) in text.lines().enumerate() {
            match parse_line(line) {
                Ok(Some(entry)) => {
                    if let Err(e) = config.apply(&entry, log) {
                        warn!("config line {}: {}, keeping default", lineno + 1, e);
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("config line {}: {}", lineno + 1, e),
            }
        }
        config
    }

    /// `load` when the file could be read, defaults otherwise.
    pub fn load_or_default(text: Option<&str>, log: &mut dyn LogSink) -> Self {
        if let Some(text) = text {
            Self::load(text, log)
        } else {
            let msg = "Config:  No config file, using defaults";
            info!("{}", msg);
            log.log_msg(msg);
            Self::default()
        }
    }

    fn apply(&mut self, entry: &ConfigEntry<'_>, log: &mut dyn LogSink) -> Result<(), ConfigError> {
        match entry.key.as_str() {
            KEY_SEA_LEVEL_PRESSURE => {
                let hpa: f64 = entry
                    .value
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(KEY_SEA_LEVEL_PRESSURE))?;
                if !hpa.is_finite() || hpa <= 0.0 {
                    return Err(ConfigError::InvalidValue(KEY_SEA_LEVEL_PRESSURE));
                }
                self.sea_level_pressure_hpa = hpa;
                loaded(log, KEY_SEA_LEVEL_PRESSURE, &format!("{hpa:.2}"));
            }
            KEY_DATA_FILE_MSEC_BUMP => {
                let ms: u32 = entry
                    .value
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(KEY_DATA_FILE_MSEC_BUMP))?;
                self.data_file_msec_bump = ms;
                loaded(log, KEY_DATA_FILE_MSEC_BUMP, &ms.to_string());
            }
            other => debug!("config: ignoring unknown key {}", other),
        }
        Ok(())
    }
}

fn loaded(log: &mut dyn LogSink, key: &str, value: &str) {
    let msg = format!("Config:  Loaded {key} with {value}");
    info!("{}", msg);
    log.log_msg(&msg);
}
