//! Mock hardware adapters for integration tests.
//!
//! Every port and device mock records its calls into shared state so a test
//! can keep a handle after the mock has been boxed into the acquisition
//! cycle and assert on the full call history.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use core::convert::Infallible;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use stardust::app::ports::{Clock, HeaterSwitch, LogSink, MuxControl};
use stardust::error::DeviceError;
use stardust::mux::MuxPort;
use stardust::sensors::co2::{Co2Monitor, Co2Sample};
use stardust::sensors::ds18b::OneWireThermometer;
use stardust::sensors::gps::{GnssPosition, GnssReceiver};
use stardust::sensors::pressure::{BaroSample, Barometer};
use stardust::sensors::uv::{UvDevice, UvSample};
use stardust::sensors::voltage::AnalogInput;

// ── Port mocks ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxCall {
    Enable(MuxPort),
    Disable(MuxPort),
}

#[derive(Default)]
pub struct MockMux {
    pub calls: Vec<MuxCall>,
}

impl MuxControl for MockMux {
    fn enable_port(&mut self, port: MuxPort) {
        self.calls.push(MuxCall::Enable(port));
    }

    fn disable_port(&mut self, port: MuxPort) {
        self.calls.push(MuxCall::Disable(port));
    }
}

#[derive(Default)]
pub struct MockLog {
    pub msgs: Vec<String>,
    pub data: Vec<String>,
}

impl LogSink for MockLog {
    fn log_msg(&mut self, msg: &str) {
        self.msgs.push(msg.to_string());
    }

    fn log_data(&mut self, line: &str) {
        self.data.push(line.to_string());
    }
}

#[derive(Default)]
pub struct MockClock {
    pub now_ms: Cell<u64>,
}

impl Clock for MockClock {
    fn millis(&self) -> u64 {
        self.now_ms.get()
    }
}

/// Heater output whose switch history survives being boxed.
#[derive(Clone, Default)]
pub struct MockHeater {
    pub switches: Rc<RefCell<Vec<bool>>>,
}

impl HeaterSwitch for MockHeater {
    fn switch(&mut self, on: bool) {
        self.switches.borrow_mut().push(on);
    }
}

// ── Device scripts ────────────────────────────────────────────

/// Shared script for a mock device: whether bring-up succeeds, which
/// 1-based reads fail, and a count of every hardware call.
#[derive(Clone, Default)]
pub struct Script {
    pub absent: bool,
    pub failing_reads: Rc<RefCell<Vec<usize>>>,
    pub hw_calls: Rc<Cell<usize>>,
    pub reads: Rc<Cell<usize>>,
}

#[allow(dead_code)]
impl Script {
    pub fn healthy() -> Self {
        Self::default()
    }

    pub fn absent() -> Self {
        Self {
            absent: true,
            ..Self::default()
        }
    }

    pub fn failing_on(reads: &[usize]) -> Self {
        let s = Self::default();
        s.failing_reads.borrow_mut().extend_from_slice(reads);
        s
    }

    pub fn calls(&self) -> usize {
        self.hw_calls.get()
    }

    fn touch(&self) {
        self.hw_calls.set(self.hw_calls.get() + 1);
    }

    fn begin(&self) -> Result<(), DeviceError> {
        self.touch();
        if self.absent {
            Err(DeviceError::NotFound)
        } else {
            Ok(())
        }
    }

    /// Count one read; `Err` if this read is scripted to fail.
    fn read(&self) -> Result<usize, DeviceError> {
        self.touch();
        let n = self.reads.get() + 1;
        self.reads.set(n);
        if self.failing_reads.borrow().contains(&n) {
            Err(DeviceError::Bus)
        } else {
            Ok(n)
        }
    }
}

/// Barometer reporting a slowly falling pressure.
pub struct MockBaro(pub Script);

impl Barometer for MockBaro {
    fn begin(&mut self) -> Result<(), DeviceError> {
        self.0.begin()
    }

    fn perform_reading(&mut self) -> Result<BaroSample, DeviceError> {
        let n = self.0.read()?;
        Ok(BaroSample {
            pressure_pa: 101_325.0 - 100.0 * n as f64,
            temperature_c: 20.0 - n as f64,
        })
    }
}

/// CO2 monitor; `ready` toggles whether a new conversion is waiting.
pub struct MockCo2 {
    pub script: Script,
    pub ready: Rc<Cell<bool>>,
}

impl MockCo2 {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            ready: Rc::new(Cell::new(true)),
        }
    }
}

impl Co2Monitor for MockCo2 {
    fn begin(&mut self) -> Result<(), DeviceError> {
        self.script.begin()
    }

    fn set_measurement_interval(&mut self, _seconds: u16) -> Result<(), DeviceError> {
        self.script.touch();
        Ok(())
    }

    fn data_ready(&mut self) -> Result<bool, DeviceError> {
        self.script.touch();
        Ok(self.ready.get())
    }

    fn read_measurement(&mut self) -> Result<Co2Sample, DeviceError> {
        let n = self.script.read()?;
        Ok(Co2Sample {
            co2_ppm: 400.0 + n as f64,
            temperature_c: 15.0,
            relative_humidity: 30.0,
        })
    }
}

pub struct MockUv(pub Script);

impl UvDevice for MockUv {
    fn begin(&mut self) -> Result<(), DeviceError> {
        self.0.begin()
    }

    fn read_uv(&mut self) -> Result<UvSample, DeviceError> {
        let n = self.0.read()?;
        Ok(UvSample {
            uva: 10.0 * n as f64,
            uvb: 5.0 * n as f64,
            index: 0.5,
        })
    }
}

/// GNSS receiver holding a fix that drifts north a little every poll.
pub struct MockGnss(pub Script);

impl GnssReceiver for MockGnss {
    fn begin(&mut self) -> Result<(), DeviceError> {
        self.0.begin()
    }

    fn poll(&mut self) -> Result<(), DeviceError> {
        self.0.read().map(|_| ())
    }

    fn position(&self) -> Option<GnssPosition> {
        let n = self.0.reads.get() as i64;
        Some(GnssPosition {
            latitude_millionths: 44_978_123 + n,
            longitude_millionths: -93_265_002,
            altitude_mm: Some(250_000 + 1_000 * n),
        })
    }

    fn fix_type(&self) -> u8 {
        3
    }
}

/// One-wire bus with a single thermometer (none when the script is absent).
pub struct MockOneWire(pub Script);

impl OneWireThermometer for MockOneWire {
    fn begin(&mut self) -> Result<usize, DeviceError> {
        self.0.begin().map(|()| 1)
    }

    fn select_first(&mut self) -> Result<(), DeviceError> {
        self.0.touch();
        Ok(())
    }

    fn set_resolution(&mut self, _bits: u8) -> Result<(), DeviceError> {
        self.0.touch();
        Ok(())
    }

    fn request_temperatures(&mut self) -> Result<(), DeviceError> {
        self.0.touch();
        Ok(())
    }

    fn temperature_c(&mut self) -> Result<f64, DeviceError> {
        let n = self.0.read()?;
        Ok(-10.0 - n as f64)
    }
}

/// Fix LED that remembers its last level.
#[derive(Clone, Default)]
pub struct MockLed {
    pub lit: Rc<Cell<bool>>,
}

impl digital::ErrorType for MockLed {
    type Error = Infallible;
}

impl OutputPin for MockLed {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.lit.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.lit.set(true);
        Ok(())
    }
}

pub struct MockAdc(pub Script, pub u16);

impl AnalogInput for MockAdc {
    fn read_raw(&mut self) -> Result<u16, DeviceError> {
        self.0.read()?;
        Ok(self.1)
    }
}

// ── I²C bus mock for the multiplexer ──────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2cOp {
    Read(u8),
    Write(u8),
}

/// Single-register device (the multiplexer's control register).
pub struct MockRegisterBus {
    pub address: u8,
    pub register: u8,
    pub ops: Vec<I2cOp>,
    pub fail: bool,
}

impl MockRegisterBus {
    pub fn new(address: u8, register: u8) -> Self {
        Self {
            address,
            register,
            ops: Vec::new(),
            fail: false,
        }
    }
}

impl ErrorType for MockRegisterBus {
    type Error = ErrorKind;
}

impl I2c for MockRegisterBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail || address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Read(buf) => {
                    buf.fill(self.register);
                    self.ops.push(I2cOp::Read(self.register));
                }
                Operation::Write(bytes) => {
                    if let Some(&value) = bytes.first() {
                        self.register = value;
                        self.ops.push(I2cOp::Write(value));
                    }
                }
            }
        }
        Ok(())
    }
}
