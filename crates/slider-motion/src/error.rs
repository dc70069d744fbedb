//! The motion core's error taxonomy. All variants are recovered locally by
//! the Command Surface; the Step Timer ISR never surfaces an error — its
//! only failure mode (an out-of-range `cn`) is prevented by the `cn >= cmin`
//! clamp and the `c0 <= CMIN_MAX` clamp applied at configuration time.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionError {
    /// A percentage argument was out of range, or zero where positive is
    /// required.
    InvalidParameter,
    /// A configuration change was attempted while `phase != Halt`.
    WrongPhase,
    /// The limit switch tripped during a blocking move; a hard stop was
    /// issued.
    LimitTripped,
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::InvalidParameter => write!(f, "invalid parameter"),
            MotionError::WrongPhase => write!(f, "configuration change rejected: not at rest"),
            MotionError::LimitTripped => write!(f, "limit switch tripped, hard stop issued"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}

/// Outcome of a command-surface move request that did not error. `NoOp` is
/// not a `MotionError` variant — the spec treats a no-op target as a silent
/// success, so it's represented here rather than as a swallowed error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Motion started (or an in-flight move was retargeted) immediately.
    Started,
    /// `target_pos == current_pos`; no state change.
    NoOp,
    /// Direction reversal or insufficient stopping distance: the command was
    /// queued and a stop was initiated; it will run after the next HALT.
    Queued,
}
