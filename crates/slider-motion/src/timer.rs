//! Capability traits the planner is generic over: C1 (Step Driver Gateway),
//! C2 (Step Timer), C3 (Deferred-Action Timer), plus the two small
//! abstractions `move_to_blocking` needs to poll hardware without pulling
//! `std` into the core.
//!
//! The planner configures a Step Timer and a Deferred-Action Timer without
//! knowing their concrete kind; a capability set of `start`/`stop`/
//! `set_interval`/`is_running` and `arm_once` suffices, with variant
//! selection (RTIC hardware timer, simulated tick counter, ...) static.

use crate::state::Direction;

/// C1 — emits step pulses, sets rotation sense, and toggles motor power.
/// Implementations must only act while called from the correct context (see
/// each method's contract); the core relies on the caller discipline
/// documented on `SliderController`, not on runtime checks here.
pub trait StepDriver {
    /// Asserts STEP, holds the minimum pulse width, deasserts. Must only be
    /// called from the Step Timer ISR — i.e. from `SliderController::on_step_tick`.
    fn pulse(&mut self);

    /// Writes the direction line. Must only be called while the Step Timer
    /// is stopped.
    fn set_direction(&mut self, dir: Direction);

    /// Drives the motor-enable line and waits out the driver's settle time.
    fn set_power(&mut self, enabled: bool);
}

/// C2 — a reprogrammable one-shot that fires after `cn` ticks of `F_MOTOR`.
pub trait StepTimer {
    /// Arms the timer with interval `cn`, starting the counter.
    fn start(&mut self, cn: u32);
    /// Reloads the interval without restarting the counter.
    fn set_interval(&mut self, cn: u32);
    /// Disarms the timer.
    fn stop(&mut self);
    /// Whether the timer is currently armed.
    fn is_running(&self) -> bool;
}

/// C3 — a short one-shot that re-enters the Command Surface outside the
/// Step Timer ISR once a queued follow-up command exists.
pub trait DeferredTimer {
    /// Arms a single ~100us expiration.
    fn arm_once(&mut self, ticks: u32);
}

/// The external limit-switch signal observed by `move_to_blocking`.
pub trait LimitSwitch {
    /// `true` when the homing reference has been reached.
    fn is_tripped(&mut self) -> bool;
}

/// A single poll-loop tick delay, used only by `move_to_blocking` so the
/// core doesn't need `std::thread::sleep` or an async executor to express
/// "wait, then check again".
pub trait PollDelay {
    fn wait_one_tick(&mut self);
}
