// ==============================================================================
// simulation/mod.rs - OWNED SIMULATION CONTEXT
// ==============================================================================
// One Simulation owns the physics world and every car in it. The host owns
// the loop; each call to `tick` is strictly:
//
//   read held keys -> solve + queue forces (per car) -> one world step -> snapshot
//
// Cars are visited in id order so the force queue is filled the same way on
// every run. A car whose body has disappeared is dropped on the next tick.
// ==============================================================================

use std::collections::BTreeMap;

use rapier3d::prelude::RigidBodyHandle;
use tracing::{debug, info, warn};

use crate::config::{StepConfig, VehicleConfig};
use crate::drift_model::{ForcePlan, Kinematics};
use crate::error::Result;
use crate::input::InputState;
use crate::physics::PhysicsWorld;
use crate::spawn::SpawnPose;
use crate::state::{Pose, Snapshot, VehicleSnapshot};
use crate::vehicle::{Vehicle, VehicleId};

#[cfg(test)]
mod tests;

pub struct Simulation {
    pub world: PhysicsWorld,
    step: StepConfig,
    vehicles: BTreeMap<VehicleId, Vehicle>,
    next_id: u32,
    tick: u64,
}

impl Simulation {
    pub fn new(step: StepConfig) -> Self {
        Self {
            world: PhysicsWorld::new(),
            step,
            vehicles: BTreeMap::new(),
            next_id: 0,
            tick: 0,
        }
    }

    /// A world stepped with `config`'s own stepping constants.
    pub fn for_vehicle(config: &VehicleConfig) -> Self {
        Self::new(config.step_config())
    }

    pub fn step_config(&self) -> StepConfig {
        self.step
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn vehicle_ids(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.vehicles.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn spawn_vehicle(&mut self, config: VehicleConfig, pose: SpawnPose) -> Result<VehicleId> {
        config.validate()?;

        if config.step_config() != self.step {
            debug!("vehicle stepping constants differ from the world's; the world's win");
        }

        let id = VehicleId(self.next_id);
        self.next_id += 1;

        let body = self.world.spawn_vehicle_body(&config, pose);
        self.vehicles.insert(id, Vehicle::new(id, body, config));

        info!(vehicle = %id, x = pose.x, y = pose.y, angle = pose.angle, "🚗 vehicle spawned");
        Ok(id)
    }

    pub fn despawn_vehicle(&mut self, id: VehicleId) -> bool {
        let Some(vehicle) = self.vehicles.remove(&id) else {
            return false;
        };
        self.world.remove_body(vehicle.body);
        info!(vehicle = %id, "vehicle despawned");
        true
    }

    /// Replace the held keys for a car. Stays held until replaced.
    pub fn set_input(&mut self, id: VehicleId, input: InputState) -> bool {
        match self.vehicles.get_mut(&id) {
            Some(v) => {
                v.input = input;
                true
            }
            None => false,
        }
    }

    pub fn set_input_all(&mut self, input: InputState) {
        for v in self.vehicles.values_mut() {
            v.input = input;
        }
    }

    pub fn tick(&mut self, frame_dt: f32) -> Snapshot {
        // 1) inputs -> forces (no integration)
        let mut orphaned = Vec::new();
        for vehicle in self.vehicles.values_mut() {
            if vehicle.apply_controls(&mut self.world).is_none() {
                orphaned.push(vehicle.id);
            }
        }
        for id in orphaned {
            self.vehicles.remove(&id);
            warn!(vehicle = %id, "body missing, dropping vehicle");
        }

        // 2) one integration step for every body
        self.world.step_with(&self.step, frame_dt);
        self.tick += 1;

        // 3) publish
        self.snapshot()
    }

    pub fn tick_fixed(&mut self) -> Snapshot {
        self.tick(self.step.fixed_timestep)
    }

    /// Single-car entry point: hold `input` for one tick, return the new pose.
    pub fn drive(&mut self, id: VehicleId, frame_dt: f32, input: InputState) -> Option<Pose> {
        if !self.set_input(id, input) {
            return None;
        }
        self.tick(frame_dt);
        self.pose(id)
    }

    pub fn body(&self, id: VehicleId) -> Option<RigidBodyHandle> {
        self.vehicles.get(&id).map(|v| v.body)
    }

    pub fn kinematics(&self, id: VehicleId) -> Option<Kinematics> {
        let vehicle = self.vehicles.get(&id)?;
        self.world.kinematics(vehicle.body)
    }

    pub fn pose(&self, id: VehicleId) -> Option<Pose> {
        self.kinematics(id).map(|k| Pose {
            x: k.position.x,
            y: k.position.y,
            angle: k.angle,
        })
    }

    pub fn last_plan(&self, id: VehicleId) -> Option<ForcePlan> {
        self.vehicles.get(&id)?.last_plan
    }

    pub fn snapshot(&self) -> Snapshot {
        let vehicles = self
            .vehicles
            .values()
            .filter_map(|v| {
                let kin = self.world.kinematics(v.body)?;
                let pose = Pose {
                    x: kin.position.x,
                    y: kin.position.y,
                    angle: kin.angle,
                };
                Some(VehicleSnapshot {
                    id: v.id,
                    x: pose.x,
                    y: pose.y,
                    angle: pose.angle,
                    rotation: pose.display_rotation(),
                    speed: kin.speed(),
                    drifting: v.last_plan.is_some_and(|p| p.diagnostics.is_drifting),
                })
            })
            .collect();

        Snapshot { tick: self.tick, vehicles }
    }
}
