//! A `no_std` driver for reading the state of digital endstops / limit
//! switches.
//!
//! This crate provides a simple interface to read a collection of GPIO input
//! pins, plus a single-switch wrapper matching the shape the motion core's
//! `LimitSwitch` capability expects.

#![no_std]

use embedded_hal::digital::InputPin;

/// A collection of endstop input pins.
pub struct Endstops<const N: usize, PIN> {
    pins: [PIN; N],
}

impl<const N: usize, PIN, E> Endstops<N, PIN>
where
    PIN: InputPin<Error = E>,
{
    /// Creates a new instance from an array of input pins.
    pub fn new(pins: [PIN; N]) -> Self {
        Self { pins }
    }

    /// Reads the state of a single endstop pin by its index.
    ///
    /// Returns `true` if the endstop is triggered (pin is high).
    pub fn read_state(&mut self, index: usize) -> Result<bool, E> {
        self.pins[index].is_high()
    }

    /// Reads the state of all endstop pins.
    pub fn read_states(&mut self) -> Result<[bool; N], E> {
        let mut states = [false; N];
        for (i, pin) in self.pins.iter_mut().enumerate() {
            states[i] = pin.is_high()?;
        }
        Ok(states)
    }
}

/// A single level-sensitive limit switch, asserted when the rail's homing
/// reference is reached. Wraps one digital input pin behind the shape the
/// motion core's command surface polls during a blocking move.
pub struct LimitSwitch<PIN> {
    pin: PIN,
}

impl<PIN, E> LimitSwitch<PIN>
where
    PIN: InputPin<Error = E>,
{
    pub fn new(pin: PIN) -> Self {
        Self { pin }
    }

    /// `true` when the switch is asserted (reference reached).
    pub fn is_tripped(&mut self) -> Result<bool, E> {
        self.pin.is_high()
    }
}

/// Implements the motion core's `LimitSwitch` capability, unwrapping the
/// pin read the same way `driver-drv8825`'s `StepDriver` impl does — real
/// GPIO input pins are infallible on the target MCU.
impl<PIN, E> slider_motion::LimitSwitch for LimitSwitch<PIN>
where
    PIN: InputPin<Error = E>,
    E: core::fmt::Debug,
{
    fn is_tripped(&mut self) -> bool {
        LimitSwitch::is_tripped(self).expect("endstop pin is infallible on this target")
    }
}
