//! The shared sensor contract, checked across the variants.
//!
//! Whatever happens to a sensor, its header, data and blank lines keep the
//! same layout, and a sensor that failed bring-up never touches hardware
//! again.

use stardust::config::StardustConfig;
use stardust::control::HeaterController;
use stardust::error::FaultCode;
use stardust::faults::FaultReporter;
use stardust::mux::MuxPort;
use stardust::sensors::voltage::BatteryKind;
use stardust::sensors::{
    Co2Sensor, Ds18bSensor, GpsSensor, PressureSensor, Sensor, SensorContext, UvSensor, VoltSensor,
};

use crate::mock_hw::*;

/// Owns every collaborator a sensor needs and lends them out per call.
struct Bench {
    mux: MockMux,
    log: MockLog,
    clock: MockClock,
    faults: FaultReporter,
    heater: HeaterController,
    config: StardustConfig,
}

impl Bench {
    fn new() -> Self {
        Self {
            mux: MockMux::default(),
            log: MockLog::default(),
            clock: MockClock::default(),
            faults: FaultReporter::new(),
            heater: HeaterController::new(Box::new(MockHeater::default())),
            config: StardustConfig::default(),
        }
    }

    fn init(&mut self, sensor: &mut dyn Sensor) -> bool {
        let mut ctx = self.ctx();
        sensor.init(&mut ctx)
    }

    fn read(&mut self, sensor: &mut dyn Sensor) -> bool {
        let mut ctx = self.ctx();
        sensor.read(&mut ctx)
    }

    fn ctx(&mut self) -> SensorContext<'_> {
        SensorContext {
            mux: &mut self.mux,
            faults: &mut self.faults,
            heater: &mut self.heater,
            log: &mut self.log,
            clock: &self.clock,
            config: &self.config,
        }
    }
}

fn commas(s: &str) -> usize {
    s.matches(',').count()
}

/// Drive a sensor through success, a failed read and recovery, checking
/// the line layout at every step.
fn assert_layout_is_stable(mut sensor: Box<dyn Sensor>, script: &Script) {
    let mut bench = Bench::new();
    assert!(bench.init(sensor.as_mut()), "{} should come up", sensor.name());

    let header = sensor.header();
    let check = |line: &str, what: &str| {
        assert_eq!(line.len(), header.len(), "{what}: {line:?} vs {header:?}");
        assert_eq!(commas(line), commas(&header), "{what}: {line:?}");
    };

    assert!(bench.read(sensor.as_mut()));
    let data = sensor.log_line();
    check(&data, "data");
    assert!(!data.trim().is_empty());

    script.failing_reads.borrow_mut().push(script.reads.get() + 1);
    assert!(!bench.read(sensor.as_mut()));
    assert!(!sensor.last_error().is_empty());
    let blank = sensor.log_line();
    check(&blank, "blank");
    assert!(blank.chars().all(|c| c == ' ' || c == ','), "{blank:?}");

    assert!(bench.read(sensor.as_mut()));
    assert_eq!(sensor.last_error(), "");
    check(&sensor.log_line(), "recovered");
}

// ── Layout invariant ──────────────────────────────────────────

#[test]
fn pressure_layout_is_stable() {
    let s = Script::healthy();
    let sensor = PressureSensor::new("Pressure", 0x77, MuxPort::Channel(2), MockBaro(s.clone()));
    assert_layout_is_stable(Box::new(sensor), &s);
}

#[test]
fn co2_layout_is_stable() {
    let s = Script::healthy();
    let sensor = Co2Sensor::new("CO2", 0x61, MuxPort::Channel(1), MockCo2::new(s.clone()));
    assert_layout_is_stable(Box::new(sensor), &s);
}

#[test]
fn uv_layout_is_stable() {
    let s = Script::healthy();
    let sensor = UvSensor::new("UV", 0x10, MuxPort::Channel(7), MockUv(s.clone()));
    assert_layout_is_stable(Box::new(sensor), &s);
}

#[test]
fn voltage_layout_is_stable() {
    let s = Script::healthy();
    let sensor = VoltSensor::new("Volt9", 1, BatteryKind::NineVolt, MockAdc(s.clone(), 700));
    assert_layout_is_stable(Box::new(sensor), &s);
}

#[test]
fn gps_layout_is_stable() {
    let s = Script::healthy();
    let sensor = GpsSensor::new("GPS", 0x42, MuxPort::Direct, MockGnss(s.clone()), MockLed::default());
    assert_layout_is_stable(Box::new(sensor), &s);
}

#[test]
fn ds18b_layout_is_stable() {
    let s = Script::healthy();
    let sensor =
        Ds18bSensor::new("OutTemp", 47, MuxPort::Direct, MockOneWire(s.clone())).with_heater_control(true);
    assert_layout_is_stable(Box::new(sensor), &s);
}

#[test]
fn gps_columns_are_wider_than_default() {
    let s = Script::healthy();
    let mut sensor =
        GpsSensor::new("GPS", 0x42, MuxPort::Direct, MockGnss(s.clone()), MockLed::default());
    let mut bench = Bench::new();
    assert!(bench.init(&mut sensor));
    assert!(bench.read(&mut sensor));

    assert_eq!(sensor.header(), "Altitude,  Latitude, Longitude");
    assert_eq!(sensor.log_line(), "   251.0, 44.978124,-93.265002");

    s.failing_reads.borrow_mut().push(2);
    assert!(!bench.read(&mut sensor));
    assert_eq!(sensor.log_line(), format!("{},{},{}", " ".repeat(8), " ".repeat(10), " ".repeat(10)));
}

// ── Failed bring-up ───────────────────────────────────────────

#[test]
fn unavailable_sensor_reads_succeed_without_hardware() {
    let script = Script::absent();
    let mut sensor = UvSensor::new("UV", 0x10, MuxPort::Channel(7), MockUv(script.clone()));
    let mut bench = Bench::new();

    assert!(!bench.init(&mut sensor));
    assert!(!sensor.is_available());
    assert_eq!(script.calls(), 1);
    assert_eq!(bench.faults.codes().collect::<Vec<_>>(), vec![FaultCode::Uv]);
    assert_eq!(
        bench.log.msgs,
        vec!["UV Failure: VEML 6075 sensor failed to initialize".to_string()]
    );

    bench.mux.calls.clear();
    for _ in 0..3 {
        assert!(bench.read(&mut sensor));
    }
    assert_eq!(script.calls(), 1);
    assert!(bench.mux.calls.is_empty());
    assert_eq!(bench.faults.count(), 1);

    let blank = sensor.log_line();
    assert_eq!(blank.len(), sensor.header().len());
    assert!(blank.trim_matches(|c| c == ' ' || c == ',').is_empty());
}

// ── CO2 conversion pacing ─────────────────────────────────────

#[test]
fn co2_without_new_data_keeps_previous_values() {
    let script = Script::healthy();
    let device = MockCo2::new(script.clone());
    let ready = device.ready.clone();
    let mut sensor = Co2Sensor::new("CO2", 0x61, MuxPort::Channel(4), device);
    let mut bench = Bench::new();

    assert!(bench.init(&mut sensor));
    assert!(bench.read(&mut sensor));
    assert_eq!(sensor.co2_ppm(), 401.0);
    let first = sensor.log_line();

    ready.set(false);
    assert!(bench.read(&mut sensor));
    assert_eq!(sensor.last_error(), "");
    assert_eq!(sensor.co2_ppm(), 401.0);
    assert_eq!(sensor.log_line(), first);
    // No measurement fetched while the device had nothing new.
    assert_eq!(script.reads.get(), 1);

    ready.set(true);
    assert!(bench.read(&mut sensor));
    assert_eq!(sensor.co2_ppm(), 402.0);
}

#[test]
fn co2_read_error_text_is_kept_until_next_success() {
    let script = Script::failing_on(&[1]);
    let mut sensor = Co2Sensor::new("CO2", 0x61, MuxPort::Channel(4), MockCo2::new(script));
    let mut bench = Bench::new();

    assert!(bench.init(&mut sensor));
    assert!(!bench.read(&mut sensor));
    assert_eq!(sensor.last_error(), "Error reading SCD30 CO2 sensor data");
    assert!(sensor.is_available());
    assert!(bench.faults.is_empty());

    assert!(bench.read(&mut sensor));
    assert_eq!(sensor.last_error(), "");
}

#[test]
fn gps_without_receiver_is_skipped() {
    let script = Script::absent();
    let led = MockLed::default();
    let mut sensor = GpsSensor::new("GPS", 0x42, MuxPort::Direct, MockGnss(script.clone()), led.clone());
    let mut bench = Bench::new();

    assert!(!bench.init(&mut sensor));
    assert_eq!(bench.faults.codes().collect::<Vec<_>>(), vec![FaultCode::Gps]);
    assert_eq!(
        bench.log.msgs,
        vec![
            "GPS Failure: u-blox GNSS not detected at default I2C address 0x42. Please check wiring."
                .to_string()
        ]
    );

    assert!(bench.read(&mut sensor));
    assert_eq!(script.calls(), 1);
    assert!(!led.lit.get());
    assert_eq!(sensor.log_line().len(), sensor.header().len());
}

// ── GNSS poll failure ─────────────────────────────────────────

#[test]
fn gps_poll_failure_blanks_one_cycle_and_keeps_the_fix() {
    let script = Script::failing_on(&[2]);
    let led = MockLed::default();
    let mut sensor = GpsSensor::new("GPS", 0x42, MuxPort::Direct, MockGnss(script.clone()), led.clone());
    let mut bench = Bench::new();

    assert!(bench.init(&mut sensor));
    bench.clock.now_ms.set(90_000);
    assert!(bench.read(&mut sensor));
    assert!(sensor.has_fix());
    assert!(led.lit.get());
    assert_eq!(bench.log.msgs, vec!["Established fix in     1.5 minutes".to_string()]);
    assert_eq!(sensor.latitude(), 44.978124);

    assert!(!bench.read(&mut sensor));
    assert_eq!(sensor.last_error(), "GNSS poll: bus transaction failed");
    assert!(sensor.is_available());
    assert!(bench.faults.is_empty());
    // Not a fix change: no new event, position held for the next good read.
    assert!(sensor.has_fix());
    assert_eq!(bench.log.msgs.len(), 1);
    assert_eq!(sensor.latitude(), 44.978124);
    assert!(sensor.log_line().trim_matches(|c| c == ' ' || c == ',').is_empty());

    assert!(bench.read(&mut sensor));
    assert_eq!(sensor.last_error(), "");
    assert_eq!(sensor.latitude(), 44.978126);
    assert_eq!(sensor.altitude_m(), 253.0);
}
