//! C6 — Command Surface. Validates and dispatches move/speed/stop/config
//! calls against the singleton motion state owned by [`SliderController`],
//! handling in-flight re-commands via the one-slot queue.

use crate::config::RailConfig;
use crate::error::{MotionError, MoveOutcome};
use crate::limits;
use crate::planner::{self, TickOutcome};
use crate::state::{
    ControlMode, Direction, MotionState, MoveMode, Phase, Positions, Profile, Queue,
    QueuedCommand, StopKind,
};
use crate::timer::{DeferredTimer, LimitSwitch, PollDelay, StepDriver, StepTimer};

/// Ticks the Deferred-Action Timer is armed for once a queued command is
/// ready to drain — a short, fixed one-shot; the exact
/// duration is a firmware/sim concern, not a planner one, so it's exposed as
/// a constant the caller's `DeferredTimer` impl interprets in its own tick
/// units.
pub const DEFERRED_ACTION_TICKS: u32 = 1;

/// Owns the singleton motion state (C3-C8) and is generic over the hardware
/// capabilities it drives (C1-C3), so the planner itself stays `no_std` and
/// hardware-agnostic. `slider-firmware` supplies the real MCU peripherals;
/// `slider-sim` supplies a software simulation of the same traits.
pub struct SliderController<D, T, A> {
    cfg: RailConfig,
    state: MotionState,
    pos: Positions,
    queue: Queue,
    driver: D,
    timer: T,
    deferred: A,
}

impl<D, T, A> SliderController<D, T, A>
where
    D: StepDriver,
    T: StepTimer,
    A: DeferredTimer,
{
    pub fn new(cfg: RailConfig, driver: D, timer: T, deferred: A) -> Self {
        let c0 = cfg.c0_for_percent(100, Profile::Linear).unwrap_or(cfg.cmin_max);
        let cmin = cfg.cmin_for_percent(100).unwrap_or(cfg.cmin_max);
        Self {
            cfg,
            state: MotionState::at_rest(c0, cmin),
            pos: Positions::default(),
            queue: Queue::new(),
            driver,
            timer,
            deferred,
        }
    }

    // ---- ISR entry points -------------------------------------------------

    /// C2's ISR contract: pulse, then reload the timer with the
    /// already-computed `cn`, then recompute `cn` for the step after next.
    /// Must only be called from the Step Timer's interrupt context.
    pub fn on_step_tick(&mut self) {
        self.driver.pulse();
        self.pos.current_pos += self.state.dir.sign();
        self.timer.set_interval(self.state.cn as u32);

        let outcome = match self.state.control_mode {
            ControlMode::Position => planner::position_tick(&mut self.state, &self.pos, &self.cfg),
            ControlMode::Speed => planner::speed_tick(&mut self.state, &self.pos, &self.cfg),
        };

        if outcome == TickOutcome::Terminated {
            self.handle_termination();
        }
    }

    /// C3's ISR contract: re-enter the command surface with the queued
    /// follow-up, from outside the Step Timer ISR so the fresh command
    /// sequence starts from a clean HALT. Must only be called from the
    /// Deferred-Action Timer's interrupt context.
    pub fn on_deferred_tick(&mut self) {
        let queued = critical_section::with(|_| self.queue.take());
        match queued {
            Some(QueuedCommand::Move { target_pos, check_limits }) => {
                let _ = self.move_to(target_pos, MoveMode::Abs, check_limits);
            }
            Some(QueuedCommand::Speed { percent }) => {
                let _ = self.move_at_speed(percent);
            }
            None => {}
        }
    }

    // ---- C6 command surface ------------------------------------------------

    /// Moves to an absolute or relative position.
    pub fn move_to(&mut self, target: i32, mode: MoveMode, check_limits: bool) -> Result<MoveOutcome, MotionError> {
        let mut new_target = match mode {
            MoveMode::Abs => target,
            MoveMode::Rel => self.pos.current_pos + target,
        };
        if check_limits {
            new_target = limits::clamp(new_target, self.cfg.max_count);
        }

        if new_target == self.pos.current_pos {
            return Ok(MoveOutcome::NoOp);
        }

        if self.state.phase == Phase::Halt {
            self.start_position_move(new_target);
            return Ok(MoveOutcome::Started);
        }

        if self.state.control_mode != ControlMode::Position {
            // A position move always supersedes an in-flight speed move: it
            // can never "arrive smoothly" in the speed-mode sense, so queue
            // it like any other reversal.
            critical_section::with(|_| {
                self.queue.set(QueuedCommand::Move { target_pos: new_target, check_limits });
                self.initiate_soft_stop();
            });
            return Ok(MoveOutcome::Queued);
        }

        let delta = new_target - self.pos.current_pos;
        let same_dir = Direction::from_delta(delta) == self.state.dir;
        let steps_ahead = delta.unsigned_abs();

        if same_dir && steps_ahead >= self.state.n {
            // Direction unchanged and there's enough room left in the ramp
            // to still land on the new target: just retarget in place.
            self.pos.target_pos = new_target;
            Ok(MoveOutcome::Started)
        } else {
            critical_section::with(|_| {
                self.queue.set(QueuedCommand::Move { target_pos: new_target, check_limits });
                self.initiate_soft_stop();
            });
            Ok(MoveOutcome::Queued)
        }
    }

    /// Same as [`Self::move_to`], but polls until `HALT`, treating a
    /// limit-switch trip as a hard-stop abort.
    pub fn move_to_blocking<L, P>(
        &mut self,
        target: i32,
        mode: MoveMode,
        check_limits: bool,
        limit_switch: &mut L,
        poll: &mut P,
    ) -> Result<MoveOutcome, MotionError>
    where
        L: LimitSwitch,
        P: PollDelay,
    {
        let outcome = self.move_to(target, mode, check_limits)?;
        while self.state.phase != Phase::Halt {
            if limit_switch.is_tripped() {
                self.force_halt_now();
                return Err(MotionError::LimitTripped);
            }
            poll.wait_one_tick();
        }
        Ok(outcome)
    }

    /// Runs at a signed percentage of `SPEED_MAX`.
    pub fn move_at_speed(&mut self, percent: i8) -> Result<MoveOutcome, MotionError> {
        if !(-100..=100).contains(&percent) {
            return Err(MotionError::InvalidParameter);
        }

        if percent == 0 {
            if self.state.phase == Phase::Halt {
                return Ok(MoveOutcome::NoOp);
            }
            self.stop(StopKind::Soft)?;
            return Ok(MoveOutcome::Started);
        }

        let dir = if percent > 0 { Direction::Cw } else { Direction::Ccw };
        let magnitude = percent.unsigned_abs();
        let new_cmin = self.cfg.cmin_for_speed_magnitude(magnitude);

        if self.state.phase == Phase::Halt {
            self.start_speed_move(dir, new_cmin);
            return Ok(MoveOutcome::Started);
        }

        if dir != self.state.dir {
            critical_section::with(|_| {
                self.queue.set(QueuedCommand::Speed { percent });
                self.state.speed_stop = true;
                self.state.phase = Phase::Down;
            });
            return Ok(MoveOutcome::Queued);
        }

        if self.state.control_mode != ControlMode::Speed {
            // Position move in flight, same sign of travel: treat like any
            // other mode switch — queue it, stop cleanly, then start fresh.
            critical_section::with(|_| {
                self.queue.set(QueuedCommand::Speed { percent });
                self.initiate_soft_stop();
            });
            return Ok(MoveOutcome::Queued);
        }

        if new_cmin < self.state.cmin {
            // Faster target: lower cmin and resume accelerating.
            self.state.cmin = new_cmin;
            self.state.speed_stop = false;
            if self.state.phase != Phase::Up {
                self.state.phase = Phase::Up;
            }
        } else if new_cmin > self.state.cmin {
            // Slower target: decelerate to the new cruise speed, not to a
            // full stop.
            self.state.c_target = new_cmin;
            self.state.speed_stop = false;
            self.state.phase = Phase::Down;
        }
        Ok(MoveOutcome::Started)
    }

    /// Initiates a soft or hard stop of the move in progress. No-op if
    /// already at HALT.
    pub fn stop(&mut self, kind: StopKind) -> Result<(), MotionError> {
        if self.state.phase == Phase::Halt {
            return Ok(());
        }
        match self.state.control_mode {
            ControlMode::Position => {
                let delta = match kind {
                    StopKind::Soft => self.state.n as i32,
                    StopKind::Hard => 1,
                };
                self.pos.target_pos = self.pos.current_pos + self.state.dir.sign() * delta;
            }
            ControlMode::Speed => {
                self.state.speed_stop = true;
                if kind == StopKind::Hard {
                    self.state.n = self.state.n.min(1);
                }
                self.state.phase = Phase::Down;
            }
        }
        Ok(())
    }

    // ---- configuration setters/getters -------------------------------------

    pub fn set_max_speed_percent(&mut self, percent: u8) -> Result<(), MotionError> {
        self.require_halt()?;
        let cmin = self.cfg.cmin_for_percent(percent)?;
        self.state.speed_percent = percent;
        self.state.cmin = cmin;
        Ok(())
    }

    pub fn set_accel_percent(&mut self, percent: u8) -> Result<(), MotionError> {
        self.require_halt()?;
        let c0 = self.cfg.c0_for_percent(percent, self.state.profile)?;
        self.state.accel_percent = percent;
        self.state.c0 = c0;
        self.state.cn = c0;
        Ok(())
    }

    pub fn set_profile(&mut self, profile: Profile) -> Result<(), MotionError> {
        self.require_halt()?;
        let c0 = self.cfg.c0_for_percent(self.state.accel_percent, profile)?;
        self.state.profile = profile;
        self.state.c0 = c0;
        self.state.cn = c0;
        Ok(())
    }

    pub fn current_position(&self) -> i32 {
        critical_section::with(|_| self.pos.current_pos)
    }

    pub fn direction(&self) -> Direction {
        self.state.dir
    }

    pub fn is_working(&self) -> bool {
        self.state.phase != Phase::Halt
    }

    pub fn current_interval(&self) -> f32 {
        self.state.cn
    }

    /// Effective acceleration, in steps/s^2, recovered from `c0`. Only exact
    /// under the linear profile; see `ramp::recover_accel`.
    pub fn effective_accel(&self) -> f32 {
        crate::ramp::recover_accel(self.state.c0, self.cfg.f_motor)
    }

    pub fn queue_full(&self) -> bool {
        self.queue.is_full()
    }

    /// The ramp's current phase. Exposed mainly for tests and simulation
    /// tracing; command-surface callers generally want [`Self::is_working`]
    /// instead.
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    // ---- internals ---------------------------------------------------------

    fn require_halt(&self) -> Result<(), MotionError> {
        if self.state.phase != Phase::Halt {
            Err(MotionError::WrongPhase)
        } else {
            Ok(())
        }
    }

    fn start_position_move(&mut self, new_target: i32) {
        self.pos.target_pos = new_target;
        self.state.control_mode = ControlMode::Position;
        self.state.dir = Direction::from_delta(new_target - self.pos.current_pos);
        self.driver.set_direction(self.state.dir);
        self.driver.set_power(true);
        self.state.cn = self.state.c0;
        self.state.n = 0;
        self.state.phase = Phase::Up;

        self.driver.pulse();
        self.pos.current_pos += self.state.dir.sign();
        // A single-step move (new_target == current_pos ± 1) can see
        // steps_ahead == 0 on this very first tick and terminate
        // immediately — the timer must never be armed in that case.
        let outcome = planner::position_tick(&mut self.state, &self.pos, &self.cfg);
        if outcome == TickOutcome::Terminated {
            self.handle_termination();
        } else {
            self.timer.start(self.state.cn as u32);
        }
    }

    fn start_speed_move(&mut self, dir: Direction, cmin: f32) {
        self.state.control_mode = ControlMode::Speed;
        self.state.dir = dir;
        self.driver.set_direction(dir);
        self.driver.set_power(true);
        self.state.cmin = cmin;
        self.state.cn = self.state.c0;
        self.state.n = 0;
        self.state.speed_stop = false;
        self.state.c_target = 0.0;
        self.state.phase = Phase::Up;

        self.driver.pulse();
        self.pos.current_pos += dir.sign();
        // The boundary pre-guard can force DOWN with n == 0 on this very
        // first tick (a speed move started one step from the rail end) —
        // same single-tick-termination hazard as `start_position_move`.
        let outcome = planner::speed_tick(&mut self.state, &self.pos, &self.cfg);
        if outcome == TickOutcome::Terminated {
            self.handle_termination();
        } else {
            self.timer.start(self.state.cn as u32);
        }
    }

    /// The shared HALT transition on a terminating tick: stop the Step
    /// Timer, cut motor power, and arm the Deferred-Action Timer if a
    /// follow-up command is waiting. Called both from `on_step_tick` and
    /// from `start_position_move`/`start_speed_move`'s seed tick, since a
    /// single-step move (or a speed move starting right at the rail
    /// boundary) can terminate before the Step Timer is ever armed.
    fn handle_termination(&mut self) {
        self.timer.stop();
        self.driver.set_power(false);
        if self.queue.is_full() {
            self.deferred.arm_once(DEFERRED_ACTION_TICKS);
        }
    }

    /// Queues and stops must be visible together or not at all — otherwise
    /// a HALT observed between the two never re-enters.
    fn initiate_soft_stop(&mut self) {
        let _ = self.stop(StopKind::Soft);
    }

    /// Abandons the ramp outright, bypassing the DOWN phase entirely. Used
    /// only by `move_to_blocking` on a limit-switch trip, where stopping
    /// distance is no longer acceptable.
    fn force_halt_now(&mut self) {
        critical_section::with(|_| {
            self.timer.stop();
            self.driver.set_power(false);
            self.state.phase = Phase::Halt;
            self.state.cn = self.state.c0;
            self.state.n = 0;
        });
    }
}
