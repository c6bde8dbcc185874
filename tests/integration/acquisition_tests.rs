//! End-to-end acquisition cycles against scripted devices.

use stardust::app::AcquisitionCycle;
use stardust::config::StardustConfig;
use stardust::control::HeaterController;
use stardust::error::FaultCode;
use stardust::faults::{StatusLed, StatusPattern};
use stardust::mux::MuxPort;
use stardust::sensors::{Co2Sensor, PressureSensor, UvSensor};

use crate::mock_hw::*;

const PRESSURE_PORT: MuxPort = MuxPort::Channel(2);
const CO2_PORT: MuxPort = MuxPort::Channel(4);
const UV_PORT: MuxPort = MuxPort::Channel(7);

struct Payload {
    cycle: AcquisitionCycle,
    baro: Script,
    co2: Script,
    uv: Script,
    heater: MockHeater,
}

/// Pressure always healthy, CO2 absent, UV failing its third read.
fn payload(config: StardustConfig) -> Payload {
    let baro = Script::healthy();
    let co2 = Script::absent();
    let uv = Script::failing_on(&[3]);
    let heater = MockHeater::default();

    let cycle = AcquisitionCycle::new(config, HeaterController::new(Box::new(heater.clone())))
        .with_sensor(PressureSensor::new("Pressure", 0x77, PRESSURE_PORT, MockBaro(baro.clone())))
        .with_sensor(Co2Sensor::new("CO2", 0x61, CO2_PORT, MockCo2::new(co2.clone())))
        .with_sensor(UvSensor::new("UV", 0x10, UV_PORT, MockUv(uv.clone())));

    Payload {
        cycle,
        baro,
        co2,
        uv,
        heater,
    }
}

fn columns(line: &str) -> Vec<&str> {
    line.split(',').collect()
}

// ── Full mission profile ──────────────────────────────────────

#[test]
fn five_cycles_with_one_dead_and_one_flaky_sensor() {
    let mut p = payload(StardustConfig::default());
    let mut mux = MockMux::default();
    let mut log = MockLog::default();
    let clock = MockClock::default();

    assert_eq!(p.cycle.init_all(&mut mux, &mut log, &clock), 2);

    let header = log.data[0].clone();
    assert_eq!(
        header,
        "  bmpHpa,  bmpAlt, bmpTemp,  CO2ppm, SCDTemp,   SCDRH,     UVA,     UVB, UVindex"
    );

    let mut failed = Vec::new();
    for n in 1..=5u64 {
        clock.now_ms.set(n * 2_000);
        let report = p.cycle.tick(&mut mux, &mut log, &clock);
        assert_eq!(report.cycle, n);
        failed.push(report.failed_reads);

        let cols = columns(&report.line);
        assert_eq!(report.line.len(), header.len(), "cycle {n}: {:?}", report.line);
        assert_eq!(cols.len(), 9);

        // Pressure: always populated.
        assert!(cols[..3].iter().all(|c| !c.trim().is_empty()), "cycle {n}");
        // CO2: never came up, blank every cycle.
        assert!(cols[3..6].iter().all(|c| c.trim().is_empty()), "cycle {n}");
        // UV: blank only on the failed read.
        let uv_blank = cols[6..].iter().all(|c| c.trim().is_empty());
        assert_eq!(uv_blank, n == 3, "cycle {n}: {:?}", report.line);
    }
    assert_eq!(failed, vec![0, 0, 1, 0, 0]);

    // Header plus five records.
    assert_eq!(log.data.len(), 6);
    let first = columns(&log.data[1]);
    assert_eq!(first[0].trim(), "1012.25");
    assert_eq!(first[2].trim(), "19.00");
    assert_eq!(first[6].trim(), "10.00");
    assert_eq!(first[7].trim(), "5.00");
    assert_eq!(first[8].trim(), "0.50");
    // The failed third read still counts; the fourth reports read #4.
    assert_eq!(columns(&log.data[4])[6].trim(), "40.00");

    // Exactly one fault, for the sensor that never came up.
    let faults = p.cycle.faults();
    assert_eq!(faults.count(), 1);
    assert_eq!(faults.codes().collect::<Vec<_>>(), vec![FaultCode::Co2]);
    assert_eq!(
        faults.faults()[0].message.as_str(),
        "CO2 Failure: SCD30 CO2 sensor failed to begin"
    );
    assert!(log.msgs.iter().any(|m| m == "CO2 Failure: SCD30 CO2 sensor failed to begin"));
    assert!(log.msgs.iter().any(|m| m == "3 sensors, 2 available"));

    // Hardware traffic: one bring-up each, reads only for available sensors.
    assert_eq!(p.baro.calls(), 1 + 5);
    assert_eq!(p.co2.calls(), 1);
    assert_eq!(p.uv.calls(), 1 + 5);

    // The heater is driven off at start-up and never touched by these sensors.
    assert_eq!(*p.heater.switches.borrow(), vec![false]);
}

#[test]
fn every_transaction_is_bracketed_by_its_port() {
    let mut p = payload(StardustConfig::default());
    let mut mux = MockMux::default();
    let mut log = MockLog::default();
    let clock = MockClock::default();

    p.cycle.init_all(&mut mux, &mut log, &clock);
    assert_eq!(
        mux.calls,
        vec![
            MuxCall::Enable(PRESSURE_PORT),
            MuxCall::Disable(PRESSURE_PORT),
            MuxCall::Enable(CO2_PORT),
            MuxCall::Disable(CO2_PORT),
            MuxCall::Enable(UV_PORT),
            MuxCall::Disable(UV_PORT),
        ]
    );

    // Failed reads still close their port; the dead sensor's port is never
    // opened again.
    mux.calls.clear();
    for _ in 0..3 {
        p.cycle.tick(&mut mux, &mut log, &clock);
    }
    let per_cycle = [
        MuxCall::Enable(PRESSURE_PORT),
        MuxCall::Disable(PRESSURE_PORT),
        MuxCall::Enable(UV_PORT),
        MuxCall::Disable(UV_PORT),
    ];
    assert_eq!(mux.calls, per_cycle.repeat(3));
}

#[test]
fn sea_level_setting_feeds_the_altitude_column() {
    let config = StardustConfig {
        sea_level_pressure_hpa: 1012.25,
        ..StardustConfig::default()
    };
    let mut p = payload(config);
    let mut mux = MockMux::default();
    let mut log = MockLog::default();
    let clock = MockClock::default();

    p.cycle.init_all(&mut mux, &mut log, &clock);
    let report = p.cycle.tick(&mut mux, &mut log, &clock);
    // First sample reads 1012.25 hPa: exactly at the reference level.
    assert_eq!(columns(&report.line)[1].trim(), "0.00");
}

#[test]
fn disk_fault_is_reported_alongside_sensor_faults() {
    let mut p = payload(StardustConfig::default());
    let mut mux = MockMux::default();
    let mut log = MockLog::default();
    let clock = MockClock::default();

    p.cycle.report_fault(FaultCode::Disk, "SD Card Failure", &mut log);
    p.cycle.init_all(&mut mux, &mut log, &clock);

    assert_eq!(
        p.cycle.faults().codes().collect::<Vec<_>>(),
        vec![FaultCode::Disk, FaultCode::Co2]
    );
    let patterns = p.cycle.faults().status_patterns();
    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns[0].led, StatusLed::Red);
    assert!(!patterns[0].blink);
    assert_eq!(patterns[1].led, StatusLed::Yellow);
    assert!(!patterns[1].blink);
    assert_ne!(patterns[1], StatusPattern::ALL_OK);
}

#[test]
fn failed_bring_up_is_permanent_across_cycles() {
    let mut p = payload(StardustConfig::default());
    let mut mux = MockMux::default();
    let mut log = MockLog::default();
    let clock = MockClock::default();

    p.cycle.init_all(&mut mux, &mut log, &clock);
    assert_eq!(p.cycle.available_count(), 2);
    for _ in 0..4 {
        p.cycle.tick(&mut mux, &mut log, &clock);
    }
    assert_eq!(p.cycle.available_count(), 2);
    assert!(!p.cycle.sensors()[1].is_available());
    assert_eq!(p.cycle.sensors()[1].last_error(), "");
}
