//! In-process simulation of the hardware capabilities [`slider_motion`]'s
//! core is generic over (C1-C3), plus a trace-capture harness that drives a
//! [`SliderController`] to completion the way a real step-rate ISR would,
//! one logical tick at a time — grounded on the workspace's `sim` crate
//! (`SimMcu`/`SimHost`), with a `Vec<TraceEntry>` standing in for its wire
//! trace since there's no protocol to capture here.

use serde::Serialize;
use slider_motion::{
    DeferredTimer, Direction, LimitSwitch, Phase, PollDelay, RailConfig, SliderController,
    StepDriver, StepTimer,
};

/// Records every pulse the simulated driver emits, the way a scope probe on
/// the STEP line would — used to assert on pulse counts independently of
/// the position counter.
#[derive(Debug)]
pub struct SimDriver {
    pub pulses: u32,
    pub dir: Direction,
    pub powered: bool,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self { pulses: 0, dir: Direction::Cw, powered: false }
    }
}

impl StepDriver for SimDriver {
    fn pulse(&mut self) {
        self.pulses += 1;
    }
    fn set_direction(&mut self, dir: Direction) {
        self.dir = dir;
    }
    fn set_power(&mut self, enabled: bool) {
        self.powered = enabled;
    }
}

/// A software stand-in for the Step Timer: doesn't actually elapse time,
/// just records whether it's armed so the harness knows when to stop
/// driving ticks.
#[derive(Debug, Default)]
pub struct SimTimer {
    pub running: bool,
    pub last_interval: u32,
}

impl StepTimer for SimTimer {
    fn start(&mut self, cn: u32) {
        self.running = true;
        self.last_interval = cn;
    }
    fn set_interval(&mut self, cn: u32) {
        self.last_interval = cn;
    }
    fn stop(&mut self) {
        self.running = false;
    }
    fn is_running(&self) -> bool {
        self.running
    }
}

/// Tracks whether a deferred action has been armed; the harness drains it
/// on the very next logical tick, mirroring a ~100us one-shot at simulated
/// time scale.
#[derive(Debug, Default)]
pub struct SimDeferredTimer {
    pub armed: bool,
}

impl DeferredTimer for SimDeferredTimer {
    fn arm_once(&mut self, _ticks: u32) {
        self.armed = true;
    }
}

/// A limit switch standing in for real GPIO: `move_to_blocking` polls it
/// between waits, with no background ISR driving the simulated ramp
/// forward, so it trips on a poll count agreed ahead of time rather than on
/// live position (there's no concurrent tick source to read one from).
#[derive(Debug)]
pub struct SimLimitSwitch {
    trip_after_polls: u32,
    polls_seen: u32,
}

impl SimLimitSwitch {
    /// Reports tripped starting on the `n`th poll.
    pub fn trips_after(n: u32) -> Self {
        Self { trip_after_polls: n, polls_seen: 0 }
    }

    /// Never reports tripped.
    pub fn never() -> Self {
        Self::trips_after(u32::MAX)
    }
}

impl LimitSwitch for SimLimitSwitch {
    fn is_tripped(&mut self) -> bool {
        self.polls_seen += 1;
        self.polls_seen >= self.trip_after_polls
    }
}

/// `move_to_blocking`'s poll delay, with nothing to actually sleep on in a
/// simulation — a no-op tick counter.
#[derive(Debug, Default)]
pub struct SimPollDelay {
    pub polls: u32,
}

impl PollDelay for SimPollDelay {
    fn wait_one_tick(&mut self) {
        self.polls += 1;
    }
}

/// One row of the captured motion trace: the state of the world right
/// after a single step pulse.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    pub tick: u32,
    pub cn: f32,
    pub current_pos: i32,
    pub phase: String,
}

/// Drives a [`SliderController`] over [`SimDriver`]/[`SimTimer`]/
/// [`SimDeferredTimer`] one logical tick at a time, capturing a trace of
/// every step pulse. Each call to [`Self::run_to_halt`] plays the role the
/// Step Timer ISR and Deferred-Action Timer ISR jointly play on real
/// hardware: fire `on_step_tick` while the timer is armed, and
/// `on_deferred_tick` whenever a follow-up command has been queued.
pub struct SimHarness {
    pub controller: SliderController<SimDriver, SimTimer, SimDeferredTimer>,
    pub trace: Vec<TraceEntry>,
    tick: u32,
}

impl SimHarness {
    pub fn new(cfg: RailConfig) -> Self {
        Self {
            controller: SliderController::new(
                cfg,
                SimDriver::default(),
                SimTimer::default(),
                SimDeferredTimer::default(),
            ),
            trace: Vec::new(),
            tick: 0,
        }
    }

    /// Advances the simulation by exactly one step-pulse tick, recording a
    /// trace entry afterward.
    pub fn tick_once(&mut self) {
        self.controller.on_step_tick();
        self.tick += 1;
        self.trace.push(TraceEntry {
            tick: self.tick,
            cn: self.controller.current_interval(),
            current_pos: self.controller.current_position(),
            phase: format!("{:?}", self.controller.phase()),
        });
    }

    /// Ticks until the ramp reaches HALT, draining any queued follow-up
    /// command via `on_deferred_tick` in between. Bounded by `max_ticks` so
    /// a misconfigured scenario fails loudly instead of looping forever.
    pub fn run_to_halt(&mut self, max_ticks: u32) -> anyhow::Result<()> {
        for _ in 0..max_ticks {
            if self.controller.phase() == Phase::Halt && !self.controller.queue_full() {
                return Ok(());
            }
            self.tick_once();
            if self.controller.phase() == Phase::Halt && self.controller.queue_full() {
                self.controller.on_deferred_tick();
            }
        }
        anyhow::bail!("scenario did not reach HALT within {max_ticks} ticks")
    }
}
