//! The control task
//!
//! One cycle: sample the switches and optocoupler, read both analog
//! channels, let the arbiter decide relay/pump outputs, apply them, and
//! every Nth cycle redraw the display. The display redraw blocks the
//! cycle for the duration of its enable-pulse settles; the refresh
//! divisor keeps that rare.

use defmt::*;
use embassy_time::{Duration, Ticker};

use brume_core::config::CYCLE_PERIOD_MS;
use brume_core::control::{
    boost_charge_from_adc, flow_rate_from_adc, Arbiter, CycleInputs, PumpCommand,
};
use brume_core::display::{RefreshDivider, StatusView};
use brume_core::switch::ToggleSwitch;
use brume_drivers::lcd::{Lcd, Row};
use brume_drivers::pump::{Direction, StepperPump};
use brume_drivers::relay::Relay;
use brume_hal::adc::AnalogInput;
use brume_hal::gpio::DigitalInput;
use brume_hal_rp2040::adc::AdcInput;
use brume_hal_rp2040::gpio::{InputPort, OutputPort};
use brume_hal_rp2040::i2c::I2cPort;
use brume_hal_rp2040::pwm::PwmSlice;

/// Everything the control loop owns
///
/// Built once at startup and moved into the task; no other task exists,
/// so all mutation happens through this one owner.
pub struct ControlContext {
    pub mist_switch: InputPort<'static>,
    pub boost_button: InputPort<'static>,
    pub auto_boost_switch: InputPort<'static>,
    pub process_sense: InputPort<'static>,
    pub mist_toggle: ToggleSwitch,
    pub boost_toggle: ToggleSwitch,
    pub auto_boost_toggle: ToggleSwitch,
    pub flow_input: AdcInput<'static, 'static>,
    pub boost_input: AdcInput<'static, 'static>,
    pub air_relay: Relay<OutputPort<'static>>,
    pub liquid_relay: Relay<OutputPort<'static>>,
    pub pump: StepperPump<PwmSlice<'static>, OutputPort<'static>>,
    pub lcd: Lcd<I2cPort<'static>, embassy_time::Delay>,
    pub arbiter: Arbiter,
    pub refresh: RefreshDivider,
}

/// Fixed-period control task
#[embassy_executor::task]
pub async fn control_task(mut ctx: ControlContext) {
    info!("Control task started, cycle period {} ms", CYCLE_PERIOD_MS);

    let mut ticker = Ticker::every(Duration::from_millis(CYCLE_PERIOD_MS));

    loop {
        run_cycle(&mut ctx);
        ticker.next().await;
    }
}

/// One control cycle
fn run_cycle(ctx: &mut ControlContext) {
    // Active-low inputs: pressed/engaged reads low.
    ctx.mist_toggle.update(ctx.mist_switch.is_low());
    ctx.boost_toggle.update(ctx.boost_button.is_low());
    ctx.auto_boost_toggle.update(ctx.auto_boost_switch.is_low());

    let inputs = CycleInputs {
        process_enable: ctx.process_sense.is_low(),
        mist: ctx.mist_toggle.is_on(),
        auto_boost: ctx.auto_boost_toggle.is_on(),
        manual_boost: ctx.boost_toggle.is_pressed(),
        flow_rate_sps: flow_rate_from_adc(ctx.flow_input.read()),
        boost_charge_cycles: boost_charge_from_adc(ctx.boost_input.read()),
    };

    let outputs = ctx.arbiter.evaluate(&inputs);

    ctx.air_relay.set(outputs.air_relay);
    ctx.liquid_relay.set(outputs.liquid_relay);

    match outputs.pump {
        PumpCommand::Run(rate) => ctx.pump.set_rate(rate, Direction::Forward),
        PumpCommand::Stop => ctx.pump.stop(),
    }

    if ctx.refresh.tick() {
        let view = StatusView {
            flow_ml_min: outputs.flow_ml_min,
            boost_cycles: ctx.arbiter.boost_remaining(),
            auto_boost: inputs.auto_boost,
            process_enable: inputs.process_enable,
            mist: inputs.mist,
        };
        redraw(&mut ctx.lcd, &view);
    }
}

/// Send all four status lines to the panel
///
/// A failed line write is logged and the remaining lines still go out;
/// the next refresh repaints everything anyway.
fn redraw(lcd: &mut Lcd<I2cPort<'static>, embassy_time::Delay>, view: &StatusView) {
    trace!("display refresh: {:?}", view);

    let lines = view.compose();
    for (row, line) in Row::ALL.iter().zip(lines.iter()) {
        if let Err(e) = lcd.write_row(*row, line.as_str()) {
            warn!("display write failed: {:?}", e);
        }
    }
}
