//! Per-cycle control arbitration
//!
//! The arbiter is evaluated once per control cycle from freshly sampled
//! inputs. It owns the only piece of state that survives between cycles:
//! the boost countdown. Everything else (relay levels, pump command,
//! displayed flow) is derived combinationally.
//!
//! The countdown has two phases that never overlap in time: while the
//! process is inactive it is *armed* from the boost-time channel (the
//! last sample before activation wins), and while the process is active
//! it is *consumed* one cycle at a time.

use crate::config::{BOOST_CHARGE_DIVISOR, BOOST_RATE_SPS, FLOW_RATE_PER_COUNT};

/// Inputs sampled at the top of a control cycle
///
/// Levels are normalized: `true` means engaged/pressed regardless of the
/// electrical polarity. Analog channels arrive already scaled into
/// control units; readings are applied as-is, an implausible conversion
/// simply commands an implausible rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleInputs {
    /// Process-enable optocoupler (OK0)
    pub process_enable: bool,
    /// Mist toggle (SW0): liquid stage enabled
    pub mist: bool,
    /// Auto-boost toggle (SW2)
    pub auto_boost: bool,
    /// Manual-boost button held (SW1, raw level)
    pub manual_boost: bool,
    /// Commanded flow rate from the flow channel, steps/s
    pub flow_rate_sps: u32,
    /// Boost charge from the boost-time channel, in control cycles
    pub boost_charge_cycles: u32,
}

/// What to do with the pump this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PumpCommand {
    /// Disable the step output
    Stop,
    /// Run at the given rate in steps/s
    Run(u32),
}

/// Outputs of one arbitration cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleOutputs {
    /// Air relay energized
    pub air_relay: bool,
    /// Liquid relay energized
    pub liquid_relay: bool,
    /// Pump command for this cycle
    pub pump: PumpCommand,
    /// Flow value shown on the display, ml/min
    pub flow_ml_min: u32,
}

/// The per-cycle decision logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Arbiter {
    boost_remaining: u32,
}

impl Arbiter {
    /// Create an arbiter with an empty boost countdown
    pub const fn new() -> Self {
        Self { boost_remaining: 0 }
    }

    /// Cycles left on the boost countdown
    pub fn boost_remaining(&self) -> u32 {
        self.boost_remaining
    }

    /// Evaluate one control cycle
    pub fn evaluate(&mut self, inputs: &CycleInputs) -> CycleOutputs {
        // Manual boost forces the commanded value before the state
        // branch; whether the pump runs at all is still decided below.
        let mut rate = inputs.flow_rate_sps;
        let mut flow_ml_min = steps_to_ml(rate);
        if inputs.manual_boost {
            rate = BOOST_RATE_SPS;
            flow_ml_min = steps_to_ml(BOOST_RATE_SPS);
        }

        let air_relay = inputs.process_enable;
        let liquid_relay = inputs.process_enable && inputs.mist;

        let pump = if liquid_relay {
            if self.boost_remaining > 0 && inputs.auto_boost {
                self.boost_remaining -= 1;
                flow_ml_min = steps_to_ml(BOOST_RATE_SPS);
                PumpCommand::Run(BOOST_RATE_SPS)
            } else {
                PumpCommand::Run(rate)
            }
        } else {
            // Re-armed every inactive cycle; the last sample before
            // activation wins.
            if inputs.auto_boost {
                self.boost_remaining = inputs.boost_charge_cycles;
            }
            PumpCommand::Stop
        };

        CycleOutputs {
            air_relay,
            liquid_relay,
            pump,
            flow_ml_min,
        }
    }
}

/// Scale a raw flow-channel conversion into steps/s
pub fn flow_rate_from_adc(raw: u16) -> u32 {
    raw as u32 * FLOW_RATE_PER_COUNT
}

/// Scale a raw boost-time conversion into countdown cycles
pub fn boost_charge_from_adc(raw: u16) -> u32 {
    raw as u32 / BOOST_CHARGE_DIVISOR
}

/// Convert a step rate into the displayed ml/min figure
pub fn steps_to_ml(steps: u32) -> u32 {
    steps * 16 / 4096
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> CycleInputs {
        CycleInputs {
            process_enable: false,
            mist: false,
            auto_boost: false,
            manual_boost: false,
            flow_rate_sps: 2000,
            boost_charge_cycles: 0,
        }
    }

    #[test]
    fn test_air_only_state() {
        let mut arbiter = Arbiter::new();

        // Process enabled but mist toggled off: air relay only, pump
        // stopped, countdown untouched.
        let out = arbiter.evaluate(&CycleInputs {
            process_enable: true,
            mist: false,
            ..inputs()
        });

        assert!(out.air_relay);
        assert!(!out.liquid_relay);
        assert_eq!(out.pump, PumpCommand::Stop);
        assert_eq!(arbiter.boost_remaining(), 0);
    }

    #[test]
    fn test_fully_inactive() {
        let mut arbiter = Arbiter::new();

        let out = arbiter.evaluate(&inputs());

        assert!(!out.air_relay);
        assert!(!out.liquid_relay);
        assert_eq!(out.pump, PumpCommand::Stop);
    }

    #[test]
    fn test_active_runs_at_flow_rate() {
        let mut arbiter = Arbiter::new();

        let out = arbiter.evaluate(&CycleInputs {
            process_enable: true,
            mist: true,
            ..inputs()
        });

        assert!(out.air_relay);
        assert!(out.liquid_relay);
        assert_eq!(out.pump, PumpCommand::Run(2000));
        assert_eq!(out.flow_ml_min, steps_to_ml(2000));
    }

    #[test]
    fn test_arming_loads_not_accumulates() {
        let mut arbiter = Arbiter::new();

        let armed = CycleInputs {
            auto_boost: true,
            boost_charge_cycles: 42,
            ..inputs()
        };

        arbiter.evaluate(&armed);
        assert_eq!(arbiter.boost_remaining(), 42);

        // A second inactive cycle re-loads, it does not add.
        arbiter.evaluate(&armed);
        assert_eq!(arbiter.boost_remaining(), 42);
    }

    #[test]
    fn test_arming_requires_auto_boost() {
        let mut arbiter = Arbiter::new();

        arbiter.evaluate(&CycleInputs {
            boost_charge_cycles: 42,
            ..inputs()
        });
        assert_eq!(arbiter.boost_remaining(), 0);
    }

    #[test]
    fn test_countdown_consumed_while_active() {
        let mut arbiter = Arbiter::new();

        // Arm with 5 cycles while inactive.
        arbiter.evaluate(&CycleInputs {
            auto_boost: true,
            boost_charge_cycles: 5,
            ..inputs()
        });
        assert_eq!(arbiter.boost_remaining(), 5);

        let active = CycleInputs {
            process_enable: true,
            mist: true,
            auto_boost: true,
            ..inputs()
        };

        for remaining in (0..5).rev() {
            let out = arbiter.evaluate(&active);
            assert_eq!(out.pump, PumpCommand::Run(BOOST_RATE_SPS));
            assert_eq!(out.flow_ml_min, steps_to_ml(BOOST_RATE_SPS));
            assert_eq!(arbiter.boost_remaining(), remaining);
        }

        // Countdown exhausted: back to the flow channel.
        let out = arbiter.evaluate(&active);
        assert_eq!(out.pump, PumpCommand::Run(2000));
        assert_eq!(arbiter.boost_remaining(), 0);
    }

    #[test]
    fn test_countdown_paused_when_auto_boost_dropped() {
        let mut arbiter = Arbiter::new();

        arbiter.evaluate(&CycleInputs {
            auto_boost: true,
            boost_charge_cycles: 5,
            ..inputs()
        });

        // Auto boost switched off mid-countdown: flow rate wins and the
        // countdown stays where it is.
        let out = arbiter.evaluate(&CycleInputs {
            process_enable: true,
            mist: true,
            auto_boost: false,
            ..inputs()
        });
        assert_eq!(out.pump, PumpCommand::Run(2000));
        assert_eq!(arbiter.boost_remaining(), 5);
    }

    #[test]
    fn test_manual_boost_forces_value_not_enable() {
        let mut arbiter = Arbiter::new();

        // Inactive: the display shows the boost figure, the pump stays
        // stopped.
        let out = arbiter.evaluate(&CycleInputs {
            manual_boost: true,
            ..inputs()
        });
        assert_eq!(out.pump, PumpCommand::Stop);
        assert_eq!(out.flow_ml_min, steps_to_ml(BOOST_RATE_SPS));
    }

    #[test]
    fn test_manual_boost_drives_pump_when_active() {
        let mut arbiter = Arbiter::new();

        let out = arbiter.evaluate(&CycleInputs {
            process_enable: true,
            mist: true,
            manual_boost: true,
            ..inputs()
        });
        assert_eq!(out.pump, PumpCommand::Run(BOOST_RATE_SPS));
        assert_eq!(out.flow_ml_min, steps_to_ml(BOOST_RATE_SPS));
    }

    #[test]
    fn test_adc_scaling() {
        assert_eq!(flow_rate_from_adc(0), 0);
        assert_eq!(flow_rate_from_adc(1000), 2000);
        assert_eq!(flow_rate_from_adc(4095), 8190);

        assert_eq!(boost_charge_from_adc(0), 0);
        assert_eq!(boost_charge_from_adc(168), 42);
        assert_eq!(boost_charge_from_adc(4095), 1023);
    }

    #[test]
    fn test_steps_to_ml() {
        assert_eq!(steps_to_ml(0), 0);
        assert_eq!(steps_to_ml(4096), 16);
        assert_eq!(steps_to_ml(BOOST_RATE_SPS), 25);
    }
}
