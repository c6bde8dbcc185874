//! Stardust payload firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  BusMultiplexer   SerialLogSink   Esp32TimeAdapter  GpioHeater│
//! │  (MuxControl)     (LogSink)       (Clock)      (HeaterSwitch)│
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │          AcquisitionCycle (pure logic)                 │  │
//! │  │  sensors · heater thermostat · fault reporter          │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::cell::RefCell;
use std::path::Path;

use anyhow::Result;
use embedded_hal_bus::i2c::RefCellDevice;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use stardust::adapters::log_sink::SerialLogSink;
use stardust::adapters::time::Esp32TimeAdapter;
use stardust::app::ports::LogSink;
use stardust::app::AcquisitionCycle;
use stardust::config::{StardustConfig, CONFIG_FILE_NAME};
use stardust::control::HeaterController;
use stardust::drivers::{bmp388::Bmp388, heater::GpioHeater, scd30::Scd30, ublox::Ublox, veml6075::Veml6075};
use stardust::error::FaultCode;
use stardust::mux::{BusMultiplexer, MuxPort};
use stardust::pins;
use stardust::sensors::{Co2Sensor, GpsSensor, PressureSensor, UvSensor};

/// SD card mount point.
const SD_MOUNT: &str = "/sdcard";
/// Time between acquisition cycles.
const CYCLE_PERIOD_MS: u32 = 2_000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Stardust v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let mut log = SerialLogSink::new();
    let clock = Esp32TimeAdapter::new();

    // ── 2. Configuration from the SD card (or defaults) ───────
    let disk_ok = Path::new(SD_MOUNT).is_dir();
    let config_text = if disk_ok {
        let path = Path::new(SD_MOUNT).join(CONFIG_FILE_NAME);
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("config: cannot read {}: {}", path.display(), e);
                None
            }
        }
    } else {
        None
    };
    let config = StardustConfig::load_or_default(config_text.as_deref(), &mut log);
    info!(
        "config: sea level {:.2} hPa, data file bump {} ms",
        config.sea_level_pressure_hpa, config.data_file_msec_bump
    );

    // ── 3. Shared I²C bus + multiplexer ───────────────────────
    let p = Peripherals::take()?;
    let i2c = I2cDriver::new(
        p.i2c0,
        p.pins.gpio8, // pins::I2C_SDA_GPIO
        p.pins.gpio9, // pins::I2C_SCL_GPIO
        &I2cConfig::new().baudrate(Hertz(pins::I2C_BAUD_HZ)),
    )?;
    let bus: &'static RefCell<I2cDriver<'static>> = Box::leak(Box::new(RefCell::new(i2c)));
    let mut mux = BusMultiplexer::new(RefCellDevice::new(bus));

    // ── 4. Heater + production sensor set ─────────────────────
    let heater = GpioHeater::new(
        PinDriver::output(p.pins.gpio21)?, // pins::HEATER_GPIO
        PinDriver::output(p.pins.gpio14)?, // pins::HEATER_LED_GPIO
    );
    let gps_fix_led = PinDriver::output(p.pins.gpio45)?; // pins::GPS_FIX_LED_GPIO

    let mut cycle = AcquisitionCycle::new(config, HeaterController::new(Box::new(heater)))
        .with_sensor(GpsSensor::new(
            "GPS",
            i32::from(stardust::drivers::ublox::DEFAULT_ADDRESS),
            MuxPort::from_raw(pins::GPS_MUX_PORT),
            Ublox::new(RefCellDevice::new(bus)),
            gps_fix_led,
        ))
        .with_sensor(Co2Sensor::new(
            "CO2Old",
            i32::from(stardust::drivers::scd30::DEFAULT_ADDRESS),
            MuxPort::from_raw(pins::CO2_OLD_MUX_PORT),
            Scd30::new(RefCellDevice::new(bus), FreeRtos),
        ))
        .with_sensor(Co2Sensor::new(
            "CO2New",
            i32::from(stardust::drivers::scd30::DEFAULT_ADDRESS),
            MuxPort::from_raw(pins::CO2_NEW_MUX_PORT),
            Scd30::new(RefCellDevice::new(bus), FreeRtos),
        ))
        .with_sensor(PressureSensor::new(
            "Pressure",
            i32::from(stardust::drivers::bmp388::DEFAULT_ADDRESS),
            MuxPort::from_raw(pins::PRESSURE_MUX_PORT),
            Bmp388::new(RefCellDevice::new(bus), FreeRtos),
        ))
        .with_sensor(UvSensor::new(
            "UV2",
            i32::from(stardust::drivers::veml6075::DEFAULT_ADDRESS),
            MuxPort::from_raw(pins::UV_MUX_PORT),
            Veml6075::new(RefCellDevice::new(bus)),
        ));

    // ── 5. Init pass ──────────────────────────────────────────
    if !disk_ok {
        cycle.report_fault(FaultCode::Disk, "Disk Failure: SD card not mounted", &mut log);
    }
    let available = cycle.init_all(&mut mux, &mut log, &clock);
    info!("{} of {} sensors available", available, cycle.sensors().len());
    for (fault, pattern) in cycle
        .faults()
        .faults()
        .iter()
        .zip(cycle.faults().status_patterns())
    {
        warn!(
            "fault {} ({:?}{}): {}",
            fault.code.code(),
            pattern.led,
            if pattern.blink { ", blinking" } else { "" },
            fault.message
        );
    }
    log.log_msg("System ready. Entering acquisition loop.");

    // ── 6. Acquisition loop ───────────────────────────────────
    loop {
        let report = cycle.tick(&mut mux, &mut log, &clock);
        if report.failed_reads > 0 {
            info!("cycle {}: {} read failures", report.cycle, report.failed_reads);
        }
        FreeRtos::delay_ms(CYCLE_PERIOD_MS);
    }
}
