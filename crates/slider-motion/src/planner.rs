//! C5 — Planner State Machine. Pure per-tick phase transitions for both
//! control modes, called once per Step Timer expiration after the pulse has
//! been emitted and the timer reloaded with the already-computed `cn` (see
//! `SliderController::on_step_tick` in `command.rs`, which owns that
//! ordering contract).

use crate::config::RailConfig;
use crate::limits;
use crate::ramp::{self, RampPhase};
use crate::state::{MotionState, Phase, Positions};

/// Whether the tick just executed ran the motor into HALT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Terminated,
}

/// Position-mode tick. `pos.current_pos` must already reflect the pulse that
/// triggered this tick (the ISR updates it before calling in).
///
/// Phase is re-derived from `steps_ahead` vs. `n` and `cn` vs. `cmin` on
/// every tick rather than carried forward blindly — this is what lets a
/// cruise (FLAT) phase fall straight into DOWN the instant the remaining
/// distance requires it, with no separate hysteresis to get wrong.
pub fn position_tick(state: &mut MotionState, pos: &Positions, cfg: &RailConfig) -> TickOutcome {
    let steps_ahead = pos.target_pos.abs_diff(pos.current_pos);

    let candidate = if steps_ahead > state.n {
        if state.cn > cfg.cmin {
            Phase::Up
        } else {
            Phase::Flat
        }
    } else {
        Phase::Down
    };

    match candidate {
        Phase::Up => {
            state.n += 1;
            state.cn = ramp::next_interval(state.cn, state.n, RampPhase::Accelerating, state.profile, state.c0);
            if state.cn <= cfg.cmin {
                state.cn = cfg.cmin;
                state.phase = Phase::Flat;
            } else {
                state.phase = Phase::Up;
            }
            TickOutcome::Continue
        }
        Phase::Flat => {
            state.cn = cfg.cmin;
            if steps_ahead <= state.n {
                state.phase = Phase::Down;
                state.n = steps_ahead;
                state.cn = ramp::next_interval(state.cn, state.n, RampPhase::Decelerating, state.profile, state.c0);
            } else {
                state.phase = Phase::Flat;
            }
            TickOutcome::Continue
        }
        Phase::Down => {
            state.n = steps_ahead;
            state.phase = Phase::Down;
            if state.n > 0 {
                state.cn = ramp::next_interval(state.cn, state.n, RampPhase::Decelerating, state.profile, state.c0);
                TickOutcome::Continue
            } else {
                state.cn = state.c0;
                state.phase = Phase::Halt;
                TickOutcome::Terminated
            }
        }
        Phase::Halt => unreachable!("candidate is never derived as Halt"),
    }
}

/// Speed-mode tick. Unlike position mode, the phase here is genuinely
/// stateful (there is no `target_pos` to re-derive it from); it only changes
/// on an explicit command-surface transition or the rail-boundary pre-guard
/// below.
///
/// Decrement order in DOWN: `cn` is advanced *before* `n` is decremented, so
/// the last tick before `n == 0` still divides by a nonzero step index (see
/// DESIGN.md).
pub fn speed_tick(state: &mut MotionState, pos: &Positions, cfg: &RailConfig) -> TickOutcome {
    if state.phase != Phase::Down
        && limits::boundary_forces_down(pos.current_pos, state.n, state.dir, cfg.max_count)
    {
        // The rail is running out faster than the ramp could land a
        // lower-speed cruise; force a full stop rather than letting the
        // DOWN branch's cruise-resume condition (`cn >= c_target`) cut the
        // deceleration short.
        state.phase = Phase::Down;
        state.speed_stop = true;
    }

    match state.phase {
        Phase::Up => {
            state.n += 1;
            state.cn = ramp::next_interval(state.cn, state.n, RampPhase::Accelerating, state.profile, state.c0);
            if state.cn <= cfg.cmin {
                state.cn = cfg.cmin;
                state.phase = Phase::Flat;
            }
            TickOutcome::Continue
        }
        Phase::Flat => {
            state.cn = cfg.cmin;
            TickOutcome::Continue
        }
        Phase::Down => {
            if state.n == 0 {
                state.cn = state.c0;
                state.phase = Phase::Halt;
                return TickOutcome::Terminated;
            }
            state.cn = ramp::next_interval(state.cn, state.n, RampPhase::Decelerating, state.profile, state.c0);
            if !state.speed_stop && state.cn >= state.c_target {
                state.cmin = state.cn;
                state.phase = Phase::Flat;
            }
            state.n -= 1;
            if state.n == 0 {
                state.cn = state.c0;
                state.phase = Phase::Halt;
                TickOutcome::Terminated
            } else {
                TickOutcome::Continue
            }
        }
        Phase::Halt => unreachable!("on_step_tick is never called while HALT"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ControlMode, Direction, Profile};

    fn cfg() -> RailConfig {
        RailConfig::eighth_step_default(100_000)
    }

    fn state_at(c0: f32, cmin: f32) -> MotionState {
        let mut s = MotionState::at_rest(c0, cmin);
        s.control_mode = ControlMode::Position;
        s
    }

    #[test]
    fn position_tick_reaches_target_exactly() {
        let cfg = cfg();
        let mut state = state_at(21395.0, 249.0);
        let mut pos = Positions { current_pos: 0, target_pos: 10_000 };

        let mut ticks = 0;
        loop {
            pos.current_pos += state.dir.sign();
            let outcome = position_tick(&mut state, &pos, &cfg);
            ticks += 1;
            assert!(ticks < 50_000, "ramp failed to terminate");
            if outcome == TickOutcome::Terminated {
                break;
            }
        }
        assert_eq!(pos.current_pos, 10_000);
        assert_eq!(state.n, 0);
        assert_eq!(state.cn, state.c0);
        assert_eq!(state.phase, Phase::Halt);
    }

    #[test]
    fn linear_up_phase_strictly_decreases_cn() {
        let cfg = cfg();
        let mut state = state_at(21395.0, 249.0);
        let mut pos = Positions { current_pos: 0, target_pos: 10_000 };
        let mut last = state.cn;
        for _ in 0..30 {
            pos.current_pos += state.dir.sign();
            position_tick(&mut state, &pos, &cfg);
            assert!(state.cn <= last);
            assert!(state.cn >= cfg.cmin);
            last = state.cn;
        }
    }

    #[test]
    fn down_phase_n_equals_steps_ahead_at_entry() {
        let cfg = cfg();
        let mut state = state_at(21395.0, 249.0);
        state.profile = Profile::Linear;
        let mut pos = Positions { current_pos: 9_900, target_pos: 10_000 };
        state.n = 40;
        state.phase = Phase::Flat;
        state.cn = cfg.cmin;

        pos.current_pos += state.dir.sign();
        position_tick(&mut state, &pos, &cfg);
        assert_eq!(state.phase, Phase::Down);
        assert_eq!(state.n, pos.target_pos.abs_diff(pos.current_pos));
    }

    #[test]
    fn speed_boundary_guard_forces_down() {
        let cfg = cfg();
        let mut state = state_at(21395.0, 249.0);
        state.control_mode = ControlMode::Speed;
        state.phase = Phase::Flat;
        state.dir = Direction::Cw;
        state.n = 30;
        state.cn = cfg.cmin;
        let pos = Positions { current_pos: cfg.max_count as i32 - 10, target_pos: 0 };

        speed_tick(&mut state, &pos, &cfg);
        assert_eq!(state.phase, Phase::Down);
        assert!(state.speed_stop);
    }

    #[test]
    fn speed_down_terminates_at_n_zero() {
        let cfg = cfg();
        let mut state = state_at(21395.0, 249.0);
        state.control_mode = ControlMode::Speed;
        state.phase = Phase::Down;
        state.speed_stop = true;
        state.n = 1;
        state.cn = 300.0;
        let pos = Positions { current_pos: 500, target_pos: 0 };

        let outcome = speed_tick(&mut state, &pos, &cfg);
        assert_eq!(outcome, TickOutcome::Terminated);
        assert_eq!(state.phase, Phase::Halt);
        assert_eq!(state.n, 0);
        assert_eq!(state.cn, state.c0);
    }
}
