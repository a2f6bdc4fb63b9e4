//! Arcade drift-car dynamics on top of a rapier rigid-body world.
//!
//! Each tick the held keys and the car's current kinematics are turned into
//! a [`drift_model::ForcePlan`] (drive, lateral grip, coast drag, yaw), the
//! plan is queued on the body, and the [`physics::PhysicsWorld`] integrates
//! every body once. [`simulation::Simulation`] owns the world and the cars
//! and is the entry point for hosts.

pub mod config;
pub mod drift_model;
pub mod error;
pub mod input;
pub mod physics;
pub mod simulation;
pub mod spawn;
pub mod state;
pub mod vehicle;

pub use config::{Settings, StepConfig, VehicleConfig, RACECAR};
pub use error::{DriftError, Result};
pub use input::{InputScript, InputState, Key};
pub use simulation::Simulation;
pub use spawn::{SpawnManager, SpawnPose};
pub use state::{JsonLinesPresenter, Pose, Presenter, Snapshot};
pub use vehicle::VehicleId;
