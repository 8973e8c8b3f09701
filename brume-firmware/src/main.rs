//! Brume - Mist Cooling Controller Firmware
//!
//! Main firmware binary for RP2040-based mist cooling appliances.
//! Brings up the panel inputs, relays, pump and display, then hands
//! everything to the single fixed-period control task.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Blocking, Channel, Config as AdcConfig};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_rp::pwm::Pwm;
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use brume_core::control::Arbiter;
use brume_core::display::RefreshDivider;
use brume_core::switch::ToggleSwitch;
use brume_drivers::lcd::Lcd;
use brume_drivers::pump::{Direction, StepperPump};
use brume_drivers::relay::Relay;
use brume_hal_rp2040::adc::AdcInput;
use brume_hal_rp2040::gpio::{InputPort, OutputPort};
use brume_hal_rp2040::i2c::I2cPort;
use brume_hal_rp2040::pwm::PwmSlice;

mod tasks;

use tasks::ControlContext;

/// The chip's single ADC, shared by both analog channels
/// (must live forever for the task's channel bindings)
static ADC: StaticCell<RefCell<Adc<'static, Blocking>>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Brume firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Panel switches, active-low with pull-ups:
    // SW0=GPIO19 mist toggle, SW1=GPIO18 manual boost, SW2=GPIO20 auto boost
    let mist_switch = InputPort::new(Input::new(p.PIN_19, Pull::Up));
    let boost_button = InputPort::new(Input::new(p.PIN_18, Pull::Up));
    let auto_boost_switch = InputPort::new(Input::new(p.PIN_20, Pull::Up));

    // Optocouplers, active-low with pull-ups:
    // OK0=GPIO12 process enable, OK1=GPIO13 reserved for a second interlock
    let process_sense = InputPort::new(Input::new(p.PIN_12, Pull::Up));
    let _reserved_sense = Input::new(p.PIN_13, Pull::Up);

    // Relays are active-low; the wrappers drive them released at boot
    let air_relay = Relay::new(OutputPort::new(Output::new(p.PIN_6, Level::High)));
    let liquid_relay = Relay::new(OutputPort::new(Output::new(p.PIN_7, Level::High)));
    info!("Relays released");

    // Both analog channels share the single blocking converter:
    // ADC0=GPIO26 flow, ADC1=GPIO27 boost time
    let adc = ADC.init(RefCell::new(Adc::new_blocking(p.ADC, AdcConfig::default())));
    let flow_input = AdcInput::new(adc, Channel::new_pin(p.PIN_26, Pull::None));
    let boost_input = AdcInput::new(adc, Channel::new_pin(p.PIN_27, Pull::None));

    // Pump step output on GPIO10 (slice 5, channel A), direction on GPIO11
    let step_pwm = PwmSlice::new_1mhz(Pwm::new_output_a(
        p.PWM_SLICE5,
        p.PIN_10,
        Default::default(),
    ));
    let dir_pin = OutputPort::new(Output::new(p.PIN_11, Level::Low));
    let mut pump = StepperPump::new(step_pwm, dir_pin);

    // Short nudge in each direction to prove the driver wiring before
    // the loop takes over
    pump.set_rate(1000, Direction::Forward);
    Timer::after_millis(10).await;
    pump.set_rate(1000, Direction::Reverse);
    Timer::after_millis(10).await;
    pump.stop();
    info!("Pump self-test complete");

    // Display bridge on I2C0: SDA=GPIO4, SCL=GPIO5, standard mode
    let mut i2c_config = I2cConfig::default();
    i2c_config.frequency = brume_hal::i2c::I2cConfig::STANDARD.frequency;
    let bus = I2cPort::new(I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config));

    let mut lcd = Lcd::new(bus, embassy_time::Delay);
    if let Err(e) = lcd.init() {
        warn!("LCD init failed: {:?}", e);
    }
    info!("LCD initialized");

    let ctx = ControlContext {
        mist_switch,
        boost_button,
        auto_boost_switch,
        process_sense,
        // The mist toggle starts engaged so a machine powered on with
        // the process signal present begins misting immediately.
        mist_toggle: ToggleSwitch::engaged(),
        boost_toggle: ToggleSwitch::new(),
        auto_boost_toggle: ToggleSwitch::new(),
        flow_input,
        boost_input,
        air_relay,
        liquid_relay,
        pump,
        lcd,
        arbiter: Arbiter::new(),
        refresh: RefreshDivider::startup(),
    };

    spawner.spawn(tasks::control_task(ctx)).unwrap();
    info!("Control task spawned, firmware running");
}
