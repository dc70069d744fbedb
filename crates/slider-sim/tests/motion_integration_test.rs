//! End-to-end motion integration test, grounded on the workspace's
//! `tests/integration/motion_integration_test.rs`: verifies the complete
//! pipeline from the command surface through the planner to the simulated
//! driver, for each of the end-to-end regression scenarios.

use slider_sim::scenarios;

#[test]
fn s1_linear_move_reaches_target_through_all_phases() {
    let trace = scenarios::s1_linear_accelerate_cruise_decelerate().expect("scenario s1 failed");
    assert!(trace.iter().any(|e| e.phase == "Up"));
    assert!(trace.iter().any(|e| e.phase == "Down"));
    assert_eq!(trace.last().unwrap().current_pos, 10_000);
}

#[test]
fn s2_same_direction_retarget_extends_move_in_place() {
    scenarios::s2_same_direction_retarget().expect("scenario s2 failed");
}

#[test]
fn s3_reversal_queues_then_drains_and_lands_on_target() {
    scenarios::s3_reversal_queues_then_drains().expect("scenario s3 failed");
}

#[test]
fn s4_speed_ramp_through_several_speeds_then_reverses() {
    let trace = scenarios::s4_speed_ramp_then_reversal().expect("scenario s4 failed");
    assert!(trace.iter().all(|e| e.current_pos >= 0));
}

#[test]
fn s5_speed_mode_respects_rail_boundary() {
    scenarios::s5_speed_mode_limit_guard().expect("scenario s5 failed");
}

#[test]
fn s6_configuration_rejected_mid_move_accepted_after_halt() {
    scenarios::s6_configuration_rejected_while_moving().expect("scenario s6 failed");
}

#[test]
fn blocking_move_aborts_cleanly_on_limit_trip() {
    scenarios::blocking_move_aborts_on_limit_trip().expect("blocking abort scenario failed");
}

#[test]
fn quadratic_profile_runs_to_completion_like_linear() {
    let trace = scenarios::profile_affects_ramp_shape(slider_motion::Profile::Quadratic)
        .expect("quadratic profile scenario failed");
    assert_eq!(trace.last().unwrap().current_pos, 5_000);
}
