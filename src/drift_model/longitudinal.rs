// ==============================================================================
// longitudinal.rs - DRIVE + COAST DRAG
// ==============================================================================
// Drive:
//   forward held  -> engine_force
//   else backward -> brake_force (negative: pushes along -forward)
//   else          -> 0
//   F_drive = forward * applied          (only when applied != 0)
//
// Drag (coasting only, never against throttle or brake):
//   F_drag = -forward * v_fwd * drag_factor
//
// Both forces act at the centre of mass; the integrator sums them.
// ==============================================================================

use crate::config::VehicleConfig;
use crate::drift_model::types::{Basis, Vec2};
use crate::input::InputState;

/// Signed drive magnitude for this tick. Forward wins when both are held.
pub fn applied_drive_force(cfg: &VehicleConfig, input: &InputState) -> f32 {
    if input.forward {
        cfg.engine_force
    } else if input.backward {
        cfg.brake_force
    } else {
        0.0
    }
}

pub fn drive_force(basis: &Basis, applied: f32) -> Option<Vec2> {
    if applied != 0.0 {
        Some(basis.forward * applied)
    } else {
        None
    }
}

pub fn coast_drag(cfg: &VehicleConfig, basis: &Basis, fwd_speed: f32, applied: f32) -> Option<Vec2> {
    if applied == 0.0 {
        Some(-basis.forward * fwd_speed * cfg.drag_factor)
    } else {
        None
    }
}
