// src/physics.rs

use std::num::NonZeroUsize;

use rapier3d::prelude::*;
use tracing::{debug, warn};

use crate::config::{StepConfig, VehicleConfig};
use crate::drift_model::{Kinematics, Vec2};
use crate::spawn::SpawnPose;

/// Half thickness of the chassis box along Z. The world is planar, so this
/// only has to be non-zero for the mass properties.
const CHASSIS_HALF_DEPTH: Real = 5.0;

// Bodies live in the XY plane and yaw around +Z.
const PLANAR_AXES: LockedAxes = LockedAxes::TRANSLATION_LOCKED_Z
    .union(LockedAxes::ROTATION_LOCKED_X)
    .union(LockedAxes::ROTATION_LOCKED_Y);

pub struct PhysicsWorld {
    pub gravity: Vector<Real>,               // always zero (top-down)
    pub pipeline: PhysicsPipeline,           // physics pipeline
    pub island_manager: IslandManager,       // manages islands of bodies
    pub broad_phase: DefaultBroadPhase,      // broad-phase collision detection
    pub narrow_phase: NarrowPhase,           // collision detection
    pub bodies: RigidBodySet,                // for rigid bodies
    pub colliders: ColliderSet,              // for collision shapes
    pub joints: ImpulseJointSet,             // unused, required by the pipeline
    pub multibody_joints: MultibodyJointSet, // unused, required by the pipeline
    pub ccd: CCDSolver,                      // continuous collision detection
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, 0.0, 0.0],
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
        }
    }

    /// Insert a car chassis:
    /// - dynamic body locked to the plane, never sleeps
    /// - `width × height` box collider carrying exactly `config.mass`
    pub fn spawn_vehicle_body(&mut self, config: &VehicleConfig, pose: SpawnPose) -> RigidBodyHandle {
        let rb = RigidBodyBuilder::dynamic()
            .translation(vector![pose.x, pose.y, 0.0])
            .rotation(vector![0.0, 0.0, pose.angle])
            .locked_axes(PLANAR_AXES)
            .can_sleep(false)
            .build();

        let handle = self.bodies.insert(rb);

        let collider = ColliderBuilder::cuboid(config.width * 0.5, config.height * 0.5, CHASSIS_HALF_DEPTH)
            .mass(config.mass)
            .friction(0.0)
            .restitution(0.0)
            .build();

        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);

        debug!(?handle, x = pose.x, y = pose.y, angle = pose.angle, "chassis body inserted");
        handle
    }

    /// Detach a body and its colliders. Returns false for stale handles.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    /// Planar view of a body: XY position/velocity, yaw, yaw rate.
    pub fn kinematics(&self, handle: RigidBodyHandle) -> Option<Kinematics> {
        let body = self.bodies.get(handle)?;
        let t = body.translation();
        let v = body.linvel();
        let (_, _, yaw) = body.rotation().euler_angles();

        Some(Kinematics {
            position: Vec2::new(t.x, t.y),
            angle: yaw,
            velocity: Vec2::new(v.x, v.y),
            angular_velocity: body.angvel().z,
        })
    }

    /// Accumulate a world-space force at the centre of mass until the next step.
    pub fn apply_force(&mut self, handle: RigidBodyHandle, force: Vec2) -> bool {
        match self.bodies.get_mut(handle) {
            Some(body) => {
                body.add_force(vector![force.x, force.y, 0.0], true);
                true
            }
            None => false,
        }
    }

    pub fn set_angular_velocity(&mut self, handle: RigidBodyHandle, w: f32) -> bool {
        match self.bodies.get_mut(handle) {
            Some(body) => {
                body.set_angvel(vector![0.0, 0.0, w], true);
                true
            }
            None => false,
        }
    }

    /// Sum of the forces queued on a body for the coming step.
    pub fn pending_force(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|b| {
            let f = b.user_force();
            Vec2::new(f.x, f.y)
        })
    }

    pub fn step_with(&mut self, step: &StepConfig, dt: Real) {
        self.step(dt, step.max_frame_delta, step.substeps);
    }

    /// Integrate `min(dt, max_frame_delta)` seconds in `substeps` equal
    /// substeps, then clear every body's force/torque accumulators.
    ///
    /// There is no fixed-step accumulator: each call advances exactly the
    /// clamped frame delta. `StepConfig::fixed_timestep` is the host's tick
    /// cadence (`Simulation::tick_fixed`) and never reaches this method.
    pub fn step(&mut self, dt: Real, max_frame_delta: Real, substeps: usize) {
        let clamped = dt.min(max_frame_delta);

        if clamped.is_finite() && clamped > 0.0 {
            let last_good: Vec<(RigidBodyHandle, Isometry<Real>)> =
                self.bodies.iter().map(|(h, b)| (h, *b.position())).collect();

            let params = IntegrationParameters {
                dt: clamped,
                num_solver_iterations: NonZeroUsize::new(substeps).unwrap_or(NonZeroUsize::MIN),
                ..IntegrationParameters::default()
            };

            self.pipeline.step(
                &self.gravity,
                &params,
                &mut self.island_manager,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.joints,
                &mut self.multibody_joints,
                &mut self.ccd,
                None,
                &(),
                &(),
            );

            // Safety: a non-finite pose poisons every later tick
            for (handle, pose) in last_good {
                let Some(body) = self.bodies.get_mut(handle) else {
                    continue;
                };
                let t = body.translation();
                let bad = !t.x.is_finite() || !t.y.is_finite() || !body.angvel().z.is_finite();
                if bad {
                    body.set_position(pose, true);
                    body.set_linvel(vector![0.0, 0.0, 0.0], true);
                    body.set_angvel(vector![0.0, 0.0, 0.0], true);
                    warn!(?handle, "reset non-finite body to its last pose");
                }
            }
        } else {
            debug!(dt, max_frame_delta, "skipping integration for non-positive frame delta");
        }

        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
            body.reset_torques(false);
        }
    }
}
