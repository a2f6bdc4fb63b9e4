// ==============================================================================
// steering.rs - KINEMATIC BICYCLE YAW
// ==============================================================================
// Steering writes the yaw rate directly instead of producing a torque:
//
//   δ      = steer_input * max_steer_angle          (steer_input ∈ {-1,0,1})
//   R      = wheel_base / tan(|δ|)                  (|δ| = 0 -> STEER_EPSILON)
//   ω      = (v_fwd / R) * δ
//
// The sign rides on δ, so reversing while steering yaws the other way.
//
// Gate: steering must be held and |v_fwd| > MIN_STEER_SPEED, otherwise the
// existing yaw rate decays by YAW_DAMPING per tick (no spinning in place).
// ==============================================================================

/// Below this forward speed (px/s) steering does not turn the car.
pub const MIN_STEER_SPEED: f32 = 0.1;

/// Per-tick multiplier on yaw rate when not actively turning.
pub const YAW_DAMPING: f32 = 0.9;

/// Stand-in for a zero steering angle inside tan().
pub const STEER_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YawCommand {
    /// Overwrite the body's angular velocity.
    Set(f32),
    /// Scale the body's current angular velocity.
    Damp(f32),
}

impl YawCommand {
    pub fn resolve(self, current: f32) -> f32 {
        match self {
            YawCommand::Set(w) => w,
            YawCommand::Damp(factor) => current * factor,
        }
    }
}

pub fn target_steer_angle(steer_input: f32, max_steer_angle: f32) -> f32 {
    steer_input * max_steer_angle
}

pub fn turn_radius(wheel_base: f32, steer_angle: f32) -> f32 {
    let a = steer_angle.abs();
    let a = if a == 0.0 { STEER_EPSILON } else { a };
    wheel_base / a.tan()
}

pub fn solve_yaw(steer_input: f32, steer_angle: f32, fwd_speed: f32, wheel_base: f32) -> YawCommand {
    if steer_input != 0.0 && fwd_speed.abs() > MIN_STEER_SPEED {
        let radius = turn_radius(wheel_base, steer_angle);
        YawCommand::Set((fwd_speed / radius) * steer_angle)
    } else {
        YawCommand::Damp(YAW_DAMPING)
    }
}
