//! C8 — Configuration. The rail's fixed physical/electrical constants, and
//! the percent-to-interval conversions the Command Surface uses to apply
//! `set_max_speed_percent`/`set_accel_percent`.

use crate::error::MotionError;
use crate::state::Profile;

/// Fixed per-rail constants, derived once at boot from the rail's physical
/// dimensions and the MCU's timer clock. The planner assumes eighth-
/// stepping when treating `speed_max`/`accel_max`/`accel_min` as
/// physical-plausibility bounds (the microstep mode is selected once,
/// outside the scope of this core, and is not revisited here).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RailConfig {
    /// Mechanically-determined speed ceiling, in steps/s.
    pub speed_max: f32,
    /// Upper acceleration bound, in steps/s^2 (mechanical).
    pub accel_max: f32,
    /// Lower acceleration bound, in steps/s^2 (set by `cmin_max`).
    pub accel_min: f32,
    /// Rail length, in steps.
    pub max_count: u32,
    /// Timer clock frequency, in ticks/s (CPU clock / prescaler).
    pub f_motor: f32,
    /// Largest representable interval (16-bit timer register: 2^16 - 1).
    pub cmin_max: f32,
}

impl RailConfig {
    /// Named constants taken from the original firmware's `motor.c` /
    /// `stepper.h`, for an eighth-microstepping DRV8825 configuration on a
    /// 16 MHz MCU with an /8 timer prescaler.
    pub fn eighth_step_default(max_count: u32) -> Self {
        Self {
            speed_max: 8000.0,
            accel_max: 8000.0,
            accel_min: 1862.0,
            max_count,
            f_motor: 2_000_000.0,
            cmin_max: 65_535.0,
        }
    }

    /// Rail length from physical dimensions, mirroring
    /// `MAX_COUNT = MAX_LENGTH_CM * STEPS_PER_REV / CM_PER_REV`.
    pub fn max_count_from_rail(max_length_cm: f32, steps_per_rev: f32, cm_per_rev: f32) -> u32 {
        (max_length_cm * steps_per_rev / cm_per_rev) as u32
    }

    /// `cmin` for a max-speed percentage in `[1, 100]`.
    pub fn cmin_for_percent(&self, pct: u8) -> Result<f32, MotionError> {
        if pct == 0 || pct > 100 {
            return Err(MotionError::InvalidParameter);
        }
        Ok(self.f_motor / (self.speed_max * pct as f32 / 100.0) - 1.0)
    }

    /// `c0` for an acceleration percentage in `[1, 100]`, under `profile`.
    pub fn c0_for_percent(&self, pct: u8, profile: Profile) -> Result<f32, MotionError> {
        if pct == 0 || pct > 100 {
            return Err(MotionError::InvalidParameter);
        }
        let accel = self.accel_min + (self.accel_max - self.accel_min) * pct as f32 / 100.0;
        Ok(crate::ramp::initial_interval(accel, self.f_motor, profile, self.cmin_max))
    }

    /// `cmin` for a `move_at_speed` magnitude in `[1, 100]`.
    pub fn cmin_for_speed_magnitude(&self, magnitude: u8) -> f32 {
        self.f_motor / (self.speed_max * magnitude as f32 / 100.0) - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_over_range_percent() {
        let cfg = RailConfig::eighth_step_default(100_000);
        assert_eq!(cfg.cmin_for_percent(0), Err(MotionError::InvalidParameter));
        assert_eq!(cfg.cmin_for_percent(101), Err(MotionError::InvalidParameter));
        assert!(cfg.cmin_for_percent(100).is_ok());
    }

    #[test]
    fn cmin_at_full_speed_matches_scenario_s1() {
        let cfg = RailConfig::eighth_step_default(100_000);
        let cmin = cfg.cmin_for_percent(100).unwrap();
        assert!((cmin - 249.0).abs() < 1.0, "cmin = {cmin}");
    }

    #[test]
    fn max_count_from_rail_matches_formula() {
        assert_eq!(RailConfig::max_count_from_rail(100.0, 200.0, 5.0), 4000);
    }
}
