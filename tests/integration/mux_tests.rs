//! Bus multiplexer driver over a single-register bus.

use stardust::app::ports::MuxControl;
use stardust::mux::{BusMultiplexer, MUX_ADDRESS, MuxPort};

use crate::mock_hw::{I2cOp, MockRegisterBus};

#[test]
fn enable_sets_only_the_requested_bit() {
    let mut mux = BusMultiplexer::new(MockRegisterBus::new(MUX_ADDRESS, 0b0000_0001));
    mux.enable_port(MuxPort::Channel(4));
    let bus = mux.release();
    assert_eq!(bus.register, 0b0001_0001);
    assert_eq!(bus.ops, vec![I2cOp::Read(0b0000_0001), I2cOp::Write(0b0001_0001)]);
}

#[test]
fn disable_clears_only_the_requested_bit() {
    let mut mux = BusMultiplexer::new(MockRegisterBus::new(MUX_ADDRESS, 0b1001_0110));
    mux.disable_port(MuxPort::Channel(2));
    assert_eq!(mux.read_register(), Ok(0b1001_0010));
}

#[test]
fn bracket_restores_register() {
    let mut mux = BusMultiplexer::new(MockRegisterBus::new(MUX_ADDRESS, 0b0100_0000));
    mux.enable_port(MuxPort::Channel(1));
    assert_eq!(mux.read_register(), Ok(0b0100_0010));
    mux.disable_port(MuxPort::Channel(1));
    assert_eq!(mux.read_register(), Ok(0b0100_0000));
}

#[test]
fn direct_port_never_touches_the_bus() {
    let mut mux = BusMultiplexer::new(MockRegisterBus::new(MUX_ADDRESS, 0xA5));
    mux.enable_port(MuxPort::from_raw(-1));
    mux.disable_port(MuxPort::Direct);
    let bus = mux.release();
    assert!(bus.ops.is_empty());
    assert_eq!(bus.register, 0xA5);
}

#[test]
fn out_of_range_port_clamps_to_seven() {
    let mut mux = BusMultiplexer::new(MockRegisterBus::new(MUX_ADDRESS, 0));
    mux.enable_port(MuxPort::from_raw(12));
    assert_eq!(mux.read_register(), Ok(0b1000_0000));
}

#[test]
fn bus_errors_are_swallowed() {
    let mut bus = MockRegisterBus::new(MUX_ADDRESS, 0x0F);
    bus.fail = true;
    let mut mux = BusMultiplexer::new(bus);
    mux.enable_port(MuxPort::Channel(5));
    mux.disable_port(MuxPort::Channel(5));
    let bus = mux.release();
    assert_eq!(bus.register, 0x0F);
    assert!(bus.ops.is_empty());
}

#[test]
fn custom_address_is_used() {
    let mut mux = BusMultiplexer::with_address(MockRegisterBus::new(0x71, 0), 0x71);
    mux.enable_port(MuxPort::Channel(0));
    assert_eq!(mux.read_register(), Ok(0b0000_0001));
}
