// ==============================================================================
// lateral.rs - DRIFT REGIME + LATERAL GRIP
// ==============================================================================
// Drift is a conjunction, every term must hold on the same tick:
//   - drive applied > 0      (forward throttle, not brake)
//   - steering held
//   - speed > drift_min_speed
//   - speed / drag_reference_speed > drift_speed_ratio_threshold
//
// Grip:
//   drifting -> drift_grip * (1 + speed / drag_reference_speed)
//   else     -> normal_grip
//
// Corrective force against sideways slip:
//   F_lat = -right * v_lat * lateral_grip_factor * grip
// ==============================================================================

use crate::config::VehicleConfig;
use crate::drift_model::types::{Basis, Vec2};

pub fn is_drifting(cfg: &VehicleConfig, applied_drive: f32, steer_input: f32, speed: f32) -> bool {
    applied_drive > 0.0
        && steer_input != 0.0
        && speed > cfg.drift_min_speed
        && speed / cfg.drag_reference_speed > cfg.drift_speed_ratio_threshold
}

pub fn grip_coefficient(cfg: &VehicleConfig, drifting: bool, speed: f32) -> f32 {
    if drifting {
        cfg.drift_grip * (1.0 + speed / cfg.drag_reference_speed)
    } else {
        cfg.normal_grip
    }
}

pub fn lateral_force(cfg: &VehicleConfig, basis: &Basis, lat_speed: f32, grip: f32) -> Vec2 {
    -basis.right * lat_speed * cfg.lateral_grip_factor * grip
}
