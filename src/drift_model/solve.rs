// ==============================================================================
// solve.rs - PER-TICK VEHICLE FORCE SOLVE
// ==============================================================================
// Order matters: everything below reads the velocity the body had at the
// start of the tick. Nothing here integrates; the plan is handed back to the
// world, which sums the forces during its step.
//
//   1) basis          forward = (cos θ, sin θ), right = (-f.y, f.x)
//   2) steering       steer_input, δ
//   3) drive          engine / brake along forward
//   4) forward speed  v_fwd = v · forward
//   5) yaw            Set(ω) or Damp(0.9)          (steering.rs)
//   6) drift          four-way conjunction         (lateral.rs)
//   7) lateral grip   -right * v_lat * k * grip    (lateral.rs)
//   8) drag           coasting only                (longitudinal.rs)
// ==============================================================================

use crate::config::VehicleConfig;
use crate::drift_model::lateral::{grip_coefficient, is_drifting, lateral_force};
use crate::drift_model::longitudinal::{applied_drive_force, coast_drag, drive_force};
use crate::drift_model::steering::{solve_yaw, target_steer_angle, YawCommand};
use crate::drift_model::types::{Basis, Kinematics, Vec2};
use crate::input::InputState;

/// Intermediate values of one solve, kept for logging and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Diagnostics {
    pub steer_angle: f32,
    pub applied_drive: f32,
    pub fwd_speed: f32,
    pub speed: f32,
    pub lateral_slip: f32,
    pub grip: f32,
    pub is_drifting: bool,
}

/// What the body should receive this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForcePlan {
    pub drive: Option<Vec2>,
    pub lateral: Vec2,
    pub drag: Option<Vec2>,
    pub yaw: YawCommand,
    pub diagnostics: Diagnostics,
}

impl ForcePlan {
    /// Forces in application order: drive, lateral, drag.
    pub fn forces(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.drive
            .into_iter()
            .chain(std::iter::once(self.lateral))
            .chain(self.drag)
    }

    pub fn net_force(&self) -> Vec2 {
        self.forces().fold(Vec2::zeros(), |acc, f| acc + f)
    }
}

pub fn solve_step(cfg: &VehicleConfig, kin: &Kinematics, input: &InputState) -> ForcePlan {
    let basis = Basis::from_heading(kin.angle);

    let steer_input = input.steer_input();
    let steer_angle = target_steer_angle(steer_input, cfg.max_steer_angle);

    let applied_drive = applied_drive_force(cfg, input);
    let drive = drive_force(&basis, applied_drive);

    let fwd_speed = basis.forward_speed(&kin.velocity);
    let yaw = solve_yaw(steer_input, steer_angle, fwd_speed, cfg.wheel_base);

    let speed = kin.speed();
    let drifting = is_drifting(cfg, applied_drive, steer_input, speed);

    let lateral_slip = basis.lateral_speed(&kin.velocity);
    let grip = grip_coefficient(cfg, drifting, speed);
    let lateral = lateral_force(cfg, &basis, lateral_slip, grip);

    let drag = coast_drag(cfg, &basis, fwd_speed, applied_drive);

    ForcePlan {
        drive,
        lateral,
        drag,
        yaw,
        diagnostics: Diagnostics {
            steer_angle,
            applied_drive,
            fwd_speed,
            speed,
            lateral_slip,
            grip,
            is_drifting: drifting,
        },
    }
}
