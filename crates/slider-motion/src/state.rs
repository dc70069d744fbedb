//! The motion-state data model: ramp phase, direction, control mode,
//! acceleration profile, and the one-slot follow-up queue.

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Commanded rotation sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum Direction {
    Cw,
    Ccw,
}

impl Direction {
    /// +1 for CW, -1 for CCW; the per-pulse delta applied to `current_pos`.
    pub fn sign(self) -> i32 {
        match self {
            Direction::Cw => 1,
            Direction::Ccw => -1,
        }
    }

    pub fn from_delta(delta: i32) -> Direction {
        if delta >= 0 {
            Direction::Cw
        } else {
            Direction::Ccw
        }
    }
}

/// What the planner is pursuing: a target position, or a commanded speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum ControlMode {
    Position,
    Speed,
}

/// The algebraic family of the Cn recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum Profile {
    Linear,
    Quadratic,
}

/// Current phase of the ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum Phase {
    Up,
    Flat,
    Down,
    Halt,
}

/// `move_to`'s position argument is absolute or relative to `current_pos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum MoveMode {
    Abs,
    Rel,
}

/// `stop`'s requested abruptness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum StopKind {
    Soft,
    Hard,
}

/// The follow-up command held in the one-slot queue. Mirrors `control_mode`
/// of the move that will run once the current ramp reaches HALT.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum QueuedCommand {
    Move { target_pos: i32, check_limits: bool },
    Speed { percent: i8 },
}

/// The one-slot follow-up queue. A newer command always displaces an older
/// one — at most one follow-up is ever needed, since every new command
/// either completes against the current ramp or supersedes the pending one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Queue {
    slot: Option<QueuedCommand>,
}

impl Queue {
    pub const fn new() -> Self {
        Self { slot: None }
    }

    pub fn set(&mut self, cmd: QueuedCommand) {
        self.slot = Some(cmd);
    }

    pub fn is_full(&self) -> bool {
        self.slot.is_some()
    }

    pub fn take(&mut self) -> Option<QueuedCommand> {
        self.slot.take()
    }
}

/// Singleton motion state, mutated by the Command Surface (mainline) and
/// the Step Timer ISR under the critical-section discipline documented in
/// `SliderController`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub cn: f32,
    pub c0: f32,
    pub cmin: f32,
    pub c_target: f32,
    pub n: u32,
    pub phase: Phase,
    pub dir: Direction,
    pub control_mode: ControlMode,
    pub profile: Profile,
    pub speed_stop: bool,
    /// Last accepted `set_max_speed_percent` argument; kept so `set_profile`
    /// can recompute `c0`/`cmin` without forcing the caller to re-supply it.
    pub speed_percent: u8,
    /// Last accepted `set_accel_percent` argument, for the same reason.
    pub accel_percent: u8,
}

impl MotionState {
    pub fn at_rest(c0: f32, cmin: f32) -> Self {
        Self {
            cn: c0,
            c0,
            cmin,
            c_target: 0.0,
            n: 0,
            phase: Phase::Halt,
            dir: Direction::Cw,
            control_mode: ControlMode::Position,
            profile: Profile::Linear,
            speed_stop: false,
            speed_percent: 100,
            accel_percent: 100,
        }
    }
}

/// The rail's position state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Positions {
    pub current_pos: i32,
    pub target_pos: i32,
}
