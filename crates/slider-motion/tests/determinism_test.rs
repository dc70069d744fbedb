//! End-to-end scenario S1: linear accelerate-cruise-decelerate,
//! run against an in-process fake of the hardware traits. Regression-style
//! "golden trace" assertions on the shape of the `cn` sequence, in the style
//! of the workspace's own `motion/tests/determinism_test.rs`.

use slider_motion::{
    Direction, MoveMode, Profile, RailConfig, SliderController, StepDriver, StepTimer,
};

#[derive(Default)]
struct FakeDriver {
    power: bool,
    dir: Option<Direction>,
    pulses: u32,
}

impl StepDriver for FakeDriver {
    fn pulse(&mut self) {
        self.pulses += 1;
    }
    fn set_direction(&mut self, dir: Direction) {
        self.dir = Some(dir);
    }
    fn set_power(&mut self, enabled: bool) {
        self.power = enabled;
    }
}

#[derive(Default)]
struct FakeTimer {
    running: bool,
    interval: u32,
}

impl StepTimer for FakeTimer {
    fn start(&mut self, cn: u32) {
        self.running = true;
        self.interval = cn;
    }
    fn set_interval(&mut self, cn: u32) {
        self.interval = cn;
    }
    fn stop(&mut self) {
        self.running = false;
    }
    fn is_running(&self) -> bool {
        self.running
    }
}

#[derive(Default)]
struct FakeDeferred {
    armed: bool,
}

impl slider_motion::DeferredTimer for FakeDeferred {
    fn arm_once(&mut self, _ticks: u32) {
        self.armed = true;
    }
}

fn controller() -> SliderController<FakeDriver, FakeTimer, FakeDeferred> {
    let cfg = RailConfig::eighth_step_default(100_000);
    SliderController::new(cfg, FakeDriver::default(), FakeTimer::default(), FakeDeferred::default())
}

/// Drives `on_step_tick` until the controller returns to HALT, bounded so a
/// planner bug that never terminates fails the test instead of hanging it.
fn run_to_halt(ctrl: &mut SliderController<FakeDriver, FakeTimer, FakeDeferred>) {
    let mut ticks = 0;
    while ctrl.is_working() {
        ctrl.on_step_tick();
        ticks += 1;
        assert!(ticks < 1_000_000, "move failed to terminate");
    }
}

#[test]
fn scenario_s1_linear_accelerate_cruise_decelerate() {
    let mut ctrl = controller();
    ctrl.set_profile(Profile::Linear).unwrap();
    ctrl.set_accel_percent(100).unwrap();
    ctrl.set_max_speed_percent(100).unwrap();

    let c0_before = ctrl.current_interval();
    assert!((c0_before - 21_395.0).abs() < 5.0, "c0 = {c0_before}");

    ctrl.move_to(10_000, MoveMode::Rel, false).unwrap();
    assert!(ctrl.is_working());

    let mut min_interval = ctrl.current_interval();
    let mut saw_cruise = false;
    let mut ticks = 0;
    while ctrl.is_working() {
        ctrl.on_step_tick();
        let cn = ctrl.current_interval();
        if cn < min_interval {
            min_interval = cn;
        }
        if (cn - 249.0).abs() < 1.0 {
            saw_cruise = true;
        }
        ticks += 1;
        assert!(ticks < 1_000_000, "move failed to terminate");
    }

    assert_eq!(ctrl.current_position(), 10_000);
    assert!((min_interval - 249.0).abs() < 1.0, "cmin = {min_interval}");
    assert!(saw_cruise, "ramp never reached cruise speed");
}

#[test]
fn halt_invariants_hold_after_every_move() {
    let mut ctrl = controller();
    let c0 = ctrl.current_interval();
    ctrl.move_to(5_000, MoveMode::Rel, false).unwrap();
    run_to_halt(&mut ctrl);

    assert_eq!(ctrl.current_interval(), c0);
    assert!(!ctrl.is_working());
}

#[test]
fn position_move_reaches_target_exactly_for_odd_distances() {
    for distance in [1, 2, 3, 7, 13, 1_000, 9_999] {
        let mut ctrl = controller();
        ctrl.move_to(distance, MoveMode::Rel, false).unwrap();
        run_to_halt(&mut ctrl);
        assert_eq!(ctrl.current_position(), distance, "distance {distance}");
    }
}

/// A single-step move (`move_to(current_pos ± 1)`) sees `steps_ahead == 0`
/// on the very first planner tick and terminates immediately, before the
/// Step Timer would ever be armed. Invariant §3.2 must still hold: the
/// timer must end up stopped and motor power disabled, not left running
/// with no termination path ever called.
#[test]
fn single_step_move_halts_cleanly_without_leaving_timer_armed() {
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct ObservingDriver {
        power: Rc<Cell<bool>>,
    }
    impl StepDriver for ObservingDriver {
        fn pulse(&mut self) {}
        fn set_direction(&mut self, _dir: Direction) {}
        fn set_power(&mut self, enabled: bool) {
            self.power.set(enabled);
        }
    }

    struct ObservingTimer {
        running: Rc<Cell<bool>>,
        started: Rc<Cell<bool>>,
    }
    impl StepTimer for ObservingTimer {
        fn start(&mut self, _cn: u32) {
            self.running.set(true);
            self.started.set(true);
        }
        fn set_interval(&mut self, _cn: u32) {}
        fn stop(&mut self) {
            self.running.set(false);
        }
        fn is_running(&self) -> bool {
            self.running.get()
        }
    }

    #[derive(Default)]
    struct ObservingDeferred;
    impl slider_motion::DeferredTimer for ObservingDeferred {
        fn arm_once(&mut self, _ticks: u32) {}
    }

    let power = Rc::new(Cell::new(false));
    let running = Rc::new(Cell::new(false));
    let started = Rc::new(Cell::new(false));

    let cfg = RailConfig::eighth_step_default(100_000);
    let mut ctrl = SliderController::new(
        cfg,
        ObservingDriver { power: power.clone() },
        ObservingTimer { running: running.clone(), started: started.clone() },
        ObservingDeferred,
    );

    ctrl.move_to(1, MoveMode::Rel, false).unwrap();

    assert_eq!(ctrl.current_position(), 1);
    assert!(!ctrl.is_working(), "single-step move should already be at HALT");
    assert!(!running.get(), "step timer must not be left running at HALT");
    assert!(!started.get(), "step timer must never be armed for a move that terminates on its first tick");
    assert!(!power.get(), "motor power must be disabled at HALT");
}

#[test]
fn idempotent_move_to_current_position_is_a_noop() {
    let mut ctrl = controller();
    let outcome = ctrl.move_to(0, MoveMode::Abs, false).unwrap();
    assert_eq!(outcome, slider_motion::MoveOutcome::NoOp);
    assert!(!ctrl.is_working());
}

#[test]
fn round_trip_relative_move_returns_to_origin() {
    let mut ctrl = controller();
    ctrl.move_to(4_321, MoveMode::Rel, false).unwrap();
    run_to_halt(&mut ctrl);
    let after_first = ctrl.current_position();

    ctrl.move_to(-4_321, MoveMode::Rel, false).unwrap();
    run_to_halt(&mut ctrl);

    assert_eq!(after_first, 4_321);
    assert_eq!(ctrl.current_position(), 0);
}
