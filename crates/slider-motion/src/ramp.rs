//! C4 — Ramp Calculator.
//!
//! Produces the next inter-pulse interval from a Taylor-expansion
//! approximation of the exact constant-acceleration square-root recurrence,
//! avoiding `sqrt` on the step-timer hot path.

use crate::state::Profile;

#[cfg(not(feature = "std"))]
use libm::sqrtf;
#[cfg(feature = "std")]
fn sqrtf(x: f32) -> f32 {
    x.sqrt()
}

/// Which half of the ramp this tick is advancing through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampPhase {
    Accelerating,
    Decelerating,
}

/// Advances `cn` by one step of the recurrence for `profile`/`phase`. `n` is
/// the step index *after* incrementing (UP) or the re-anchored remaining
/// step count (DOWN) — the caller is responsible for that bookkeeping.
///
/// Quadratic profiles apply an empirical 0.9x correction the first time
/// `n == 1`, before the recurrence runs, per the profile's documented edge
/// case. This only fires on acceleration's second step: a DOWN phase also
/// re-anchors to `n == 1` on its last non-terminating tick (the step before
/// `steps_ahead` hits zero), but that `cn` is a real decelerating value
/// computed over the whole ramp, not the start-of-acceleration transient,
/// so clobbering it with `0.9*c0` would produce a spurious, disconnected
/// final step.
pub fn next_interval(cn: f32, n: u32, phase: RampPhase, profile: Profile, c0: f32) -> f32 {
    let base = if profile == Profile::Quadratic && n == 1 && phase == RampPhase::Accelerating {
        0.9 * c0
    } else {
        cn
    };
    let nf = n as f32;
    match (profile, phase) {
        (Profile::Linear, RampPhase::Accelerating) => base - 2.0 * base / (4.0 * nf + 1.0),
        (Profile::Linear, RampPhase::Decelerating) => base - 2.0 * base / (-4.0 * nf + 1.0),
        (Profile::Quadratic, RampPhase::Accelerating) => base - 6.0 * base / (9.0 * nf + 3.0),
        (Profile::Quadratic, RampPhase::Decelerating) => base - 6.0 * base / (-9.0 * nf + 3.0),
    }
}

/// Computes `c0`, the interval for the first step after rest, from the
/// commanded acceleration (steps/s^2) and `F_MOTOR` (timer ticks/s).
///
/// `c0 = 0.676 * F_MOTOR * sqrt(2 / a)` for the linear profile. The
/// quadratic profile's equivalent value would overflow the timer register,
/// so it is clamped outright to `cmin_max` rather than computed — matching
/// the source's documented workaround rather than deriving a separate
/// quadratic formula (see DESIGN.md).
pub fn initial_interval(accel_steps_per_s2: f32, f_motor: f32, profile: Profile, cmin_max: f32) -> f32 {
    let c0 = 0.676 * f_motor * sqrtf(2.0 / accel_steps_per_s2);
    match profile {
        Profile::Linear => c0,
        Profile::Quadratic => c0.min(cmin_max),
    }
}

/// Recovers the effective acceleration (steps/s^2) that produced `c0` under
/// the linear formula; used by the Command Surface's acceleration getter.
/// Only exact for the linear profile — for quadratic, `c0` may have been
/// clamped to `cmin_max`, so the recovered value is an upper bound, not the
/// configured acceleration.
pub fn recover_accel(c0: f32, f_motor: f32) -> f32 {
    let k = 0.676 * f_motor;
    2.0 * (k * k) / (c0 * c0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_up_strictly_decreases_toward_cmin() {
        let mut cn = 21395.0_f32;
        let mut n = 0;
        for _ in 0..50 {
            n += 1;
            let next = next_interval(cn, n, RampPhase::Accelerating, Profile::Linear, cn);
            assert!(next < cn, "cn should strictly decrease while accelerating");
            cn = next;
        }
    }

    #[test]
    fn quadratic_applies_correction_at_n_one() {
        let c0 = 40000.0;
        let corrected = next_interval(c0, 1, RampPhase::Accelerating, Profile::Quadratic, c0);
        // base becomes 0.9 * c0 before the recurrence divides it down further.
        let expected_base = 0.9 * c0;
        let expected = expected_base - 6.0 * expected_base / (9.0 * 1.0 + 3.0);
        assert!((corrected - expected).abs() < 1e-3);
    }

    #[test]
    fn quadratic_correction_does_not_apply_on_deceleration() {
        // A position-mode DOWN phase re-anchors to n == steps_ahead on its
        // last non-terminating tick, which can also be 1 — but that cn is a
        // real decelerating value from the ramp, not the start-of-ramp
        // transient, so the 0.9*c0 correction must not clobber it here.
        let cn = 900.0;
        let c0 = 40000.0;
        let decelerated = next_interval(cn, 1, RampPhase::Decelerating, Profile::Quadratic, c0);
        let expected = cn - 6.0 * cn / (-9.0 * 1.0 + 3.0);
        assert!((decelerated - expected).abs() < 1e-3, "decelerated = {decelerated}, expected = {expected}");
    }

    #[test]
    fn initial_interval_matches_scenario_s1() {
        let c0 = initial_interval(8000.0, 2_000_000.0, Profile::Linear, 65535.0);
        assert!((c0 - 21395.0).abs() < 5.0, "c0 = {c0}");
    }

    #[test]
    fn quadratic_initial_interval_clamps() {
        let c0 = initial_interval(1.0, 2_000_000.0, Profile::Quadratic, 65535.0);
        assert_eq!(c0, 65535.0);
    }
}
