use rapier3d::prelude::RigidBodyHandle;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::VehicleConfig;
use crate::drift_model::{solve_step, ForcePlan};
use crate::input::InputState;
use crate::physics::PhysicsWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VehicleId(pub u32);

impl std::fmt::Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "car-{}", self.0)
    }
}

pub struct Vehicle {
    pub id: VehicleId,
    pub body: RigidBodyHandle,       // the chassis body
    pub config: VehicleConfig,       // immutable after spawn
    pub input: InputState,           // currently held keys
    pub last_plan: Option<ForcePlan>, // most recent solve, for snapshots
}

impl Vehicle {
    pub fn new(id: VehicleId, body: RigidBodyHandle, config: VehicleConfig) -> Self {
        Self {
            id,
            body,
            config,
            input: InputState::IDLE,
            last_plan: None,
        }
    }

    /// Solve this tick's forces and queue them on the body.
    /// Returns `None` (and touches nothing) when the body is gone.
    pub fn apply_controls(&mut self, world: &mut PhysicsWorld) -> Option<ForcePlan> {
        let kin = world.kinematics(self.body)?;
        let plan = solve_step(&self.config, &kin, &self.input);

        for force in plan.forces() {
            world.apply_force(self.body, force);
        }

        let w = plan.yaw.resolve(kin.angular_velocity);
        world.set_angular_velocity(self.body, w);

        trace!(
            vehicle = %self.id,
            fwd_speed = plan.diagnostics.fwd_speed,
            lateral_slip = plan.diagnostics.lateral_slip,
            grip = plan.diagnostics.grip,
            drifting = plan.diagnostics.is_drifting,
            yaw_rate = w,
            "controls applied"
        );

        self.last_plan = Some(plan);
        Some(plan)
    }
}
