//! A `no_std` driver for the DRV8825 stepper motor driver.
//!
//! This driver controls the DRV8825 using GPIO pins for step, direction,
//! enable, and microstep configuration. `pulse` and `set_power` carry the
//! minimum-width delays the DRV8825 datasheet requires, via an injected
//! delay implementation rather than a busy-loop baked into the driver.

#![no_std]

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

/// Minimum STEP pulse width per the DRV8825 datasheet (1.9 us, rounded up).
pub const STEP_PULSE_WIDTH_NS: u32 = 2_000;
/// Settle time after toggling nENABLE before the driver is ready to step.
pub const ENABLE_SETTLE_NS: u32 = 100_000;

/// Represents the microstepping resolution for the DRV8825.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Microsteps {
    Full,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

/// Represents the motor rotation sense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// A DRV8825 driver instance, generic over its control pins and a delay source.
pub struct Drv8825<STEP, DIR, EN, M0, M1, M2, DELAY> {
    step: STEP,
    dir: DIR,
    enable: EN,
    m0: M0,
    m1: M1,
    m2: M2,
    delay: DELAY,
}

impl<STEP, DIR, EN, M0, M1, M2, DELAY, E> Drv8825<STEP, DIR, EN, M0, M1, M2, DELAY>
where
    STEP: OutputPin<Error = E>,
    DIR: OutputPin<Error = E>,
    EN: OutputPin<Error = E>,
    M0: OutputPin<Error = E>,
    M1: OutputPin<Error = E>,
    M2: OutputPin<Error = E>,
    DELAY: DelayNs,
{
    /// Creates a new DRV8825 driver from its control pins and a delay source.
    pub fn new(step: STEP, dir: DIR, enable: EN, m0: M0, m1: M1, m2: M2, delay: DELAY) -> Self {
        Self { step, dir, enable, m0, m1, m2, delay }
    }

    /// Drives the motor-enable line and waits out the driver's settle time.
    /// `enabled = true` pulls nENABLE low (motor powered and holding torque).
    pub fn set_power(&mut self, enabled: bool) -> Result<(), E> {
        if enabled {
            self.enable.set_low()?;
        } else {
            self.enable.set_high()?;
        }
        self.delay.delay_ns(ENABLE_SETTLE_NS);
        Ok(())
    }

    /// Sets the motor direction. Caller must guarantee the step timer is
    /// stopped; reversing DIR mid-ramp desynchronizes the motor.
    pub fn set_direction(&mut self, direction: Direction) -> Result<(), E> {
        let state = match direction {
            Direction::Forward => PinState::High,
            Direction::Backward => PinState::Low,
        };
        self.dir.set_state(state)
    }

    /// Emits one step pulse: assert STEP, hold the minimum pulse width,
    /// deassert. Does not touch any position counter — the caller tracks
    /// `current_pos` in lockstep with the commanded direction.
    pub fn pulse(&mut self) -> Result<(), E> {
        self.step.set_high()?;
        self.delay.delay_ns(STEP_PULSE_WIDTH_NS);
        self.step.set_low()
    }

    /// Sets the microstepping resolution. Only meaningful while halted —
    /// the planner assumes a fixed mode once motion begins.
    pub fn set_microsteps(&mut self, microsteps: Microsteps) -> Result<(), E> {
        let (m0, m1, m2) = match microsteps {
            Microsteps::Full => (PinState::Low, PinState::Low, PinState::Low),
            Microsteps::Half => (PinState::High, PinState::Low, PinState::Low),
            Microsteps::Quarter => (PinState::Low, PinState::High, PinState::Low),
            Microsteps::Eighth => (PinState::High, PinState::High, PinState::Low),
            Microsteps::Sixteenth => (PinState::Low, PinState::Low, PinState::High),
            Microsteps::ThirtySecond => (PinState::High, PinState::Low, PinState::High),
        };
        self.m0.set_state(m0)?;
        self.m1.set_state(m1)?;
        self.m2.set_state(m2)
    }
}

/// Implements the motion core's C1 capability (`slider_motion::StepDriver`)
/// over this driver's fallible `embedded-hal` pin operations. Real GPIO
/// implementations on the target MCU are effectively infallible (`E =
/// core::convert::Infallible` in practice), so the adapter unwraps rather
/// than threading a `Result` through a trait the planner calls from ISR
/// context, which has no error path of its own to surface a fault through.
impl<STEP, DIR, EN, M0, M1, M2, DELAY, E> slider_motion::StepDriver
    for Drv8825<STEP, DIR, EN, M0, M1, M2, DELAY>
where
    STEP: OutputPin<Error = E>,
    DIR: OutputPin<Error = E>,
    EN: OutputPin<Error = E>,
    M0: OutputPin<Error = E>,
    M1: OutputPin<Error = E>,
    M2: OutputPin<Error = E>,
    DELAY: DelayNs,
    E: core::fmt::Debug,
{
    fn pulse(&mut self) {
        Drv8825::pulse(self).expect("step pin is infallible on this target");
    }

    fn set_direction(&mut self, dir: slider_motion::Direction) {
        let direction = match dir {
            slider_motion::Direction::Cw => Direction::Forward,
            slider_motion::Direction::Ccw => Direction::Backward,
        };
        Drv8825::set_direction(self, direction).expect("dir pin is infallible on this target");
    }

    fn set_power(&mut self, enabled: bool) {
        Drv8825::set_power(self, enabled).expect("enable pin is infallible on this target");
    }
}
