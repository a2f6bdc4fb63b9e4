// ==============================================================================
// config.rs - VEHICLE CONSTANTS + LAYERED SETTINGS
// ==============================================================================
// VehicleConfig is the per-archetype constant table read by the drift model.
// It is built once at spawn and never mutated afterwards.
//
// Settings layers, lowest to highest priority:
//   1) Settings::default()        (RACECAR + default spawn/run)
//   2) optional file              (drift.toml, any format `config` reads)
//   3) environment                (DRIFT__VEHICLE__ENGINE_FORCE=1200, ...)
//
// Units: pixels, pixels/second, radians, seconds.
// ==============================================================================

use std::f32::consts::{FRAC_PI_2, PI};
use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::{DriftError, Result};
use crate::spawn::SpawnSettings;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    // --- Chassis (collision shape only) ---
    pub width: f32,  // px
    pub height: f32, // px
    pub mass: f32,

    // --- Steering ---
    pub max_steer_angle: f32, // radians
    pub wheel_base: f32,      // px, used for the turn radius

    // --- Drive ---
    pub engine_force: f32, // forward drive force
    pub brake_force: f32,  // reverse/brake force (negative)

    // --- Lateral grip ---
    pub normal_grip: f32,
    pub drift_grip: f32,
    pub lateral_grip_factor: f32,

    // --- Drag ---
    pub drag_factor: f32,
    pub drag_reference_speed: f32, // px/s, normalizes speed for drift + grip

    // --- Drift thresholds ---
    pub drift_min_speed: f32, // px/s
    pub drift_speed_ratio_threshold: f32,

    // --- Stepping ---
    pub fixed_timestep: f32,  // s
    pub max_frame_delta: f32, // s, frame dt clamp
    pub integrator_substeps: usize,
}

pub const RACECAR: VehicleConfig = VehicleConfig {
    width: 100.0,
    height: 40.0,
    mass: 3.0,

    max_steer_angle: 35.0 * (PI / 180.0),
    wheel_base: 100.0,

    engine_force: 900.0,
    brake_force: -700.0,

    normal_grip: 3.0,
    drift_grip: 0.3,
    lateral_grip_factor: 5.0,

    drag_factor: 0.3,
    drag_reference_speed: 1000.0,

    drift_min_speed: 300.0,
    drift_speed_ratio_threshold: 0.3,

    fixed_timestep: 1.0 / 60.0,
    max_frame_delta: 0.016,
    integrator_substeps: 10,
};

impl Default for VehicleConfig {
    fn default() -> Self {
        RACECAR
    }
}

/// The three stepping parameters handed to `PhysicsWorld::step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepConfig {
    pub fixed_timestep: f32,
    pub max_frame_delta: f32,
    pub substeps: usize,
}

impl Default for StepConfig {
    fn default() -> Self {
        RACECAR.step_config()
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DriftError::InvalidConstant {
            field,
            reason: format!("must be finite and > 0, got {value}"),
        })
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DriftError::InvalidConstant {
            field,
            reason: format!("must be finite and >= 0, got {value}"),
        })
    }
}

impl VehicleConfig {
    pub fn step_config(&self) -> StepConfig {
        StepConfig {
            fixed_timestep: self.fixed_timestep,
            max_frame_delta: self.max_frame_delta,
            substeps: self.integrator_substeps,
        }
    }

    /// Rejects tables the force model cannot run on (zero divisors, flipped
    /// force signs, steering at or past a quarter turn).
    pub fn validate(&self) -> Result<()> {
        require_positive("width", self.width)?;
        require_positive("height", self.height)?;
        require_positive("mass", self.mass)?;
        require_positive("wheel_base", self.wheel_base)?;
        require_positive("drag_reference_speed", self.drag_reference_speed)?;
        require_positive("fixed_timestep", self.fixed_timestep)?;
        require_positive("max_frame_delta", self.max_frame_delta)?;

        if !(self.max_steer_angle.is_finite()
            && self.max_steer_angle >= 0.0
            && self.max_steer_angle < FRAC_PI_2)
        {
            return Err(DriftError::InvalidConstant {
                field: "max_steer_angle",
                reason: format!("must lie in [0, pi/2), got {}", self.max_steer_angle),
            });
        }

        require_non_negative("engine_force", self.engine_force)?;
        if !(self.brake_force.is_finite() && self.brake_force <= 0.0) {
            return Err(DriftError::InvalidConstant {
                field: "brake_force",
                reason: format!("must be finite and <= 0, got {}", self.brake_force),
            });
        }

        require_non_negative("normal_grip", self.normal_grip)?;
        require_non_negative("drift_grip", self.drift_grip)?;
        require_non_negative("lateral_grip_factor", self.lateral_grip_factor)?;
        require_non_negative("drag_factor", self.drag_factor)?;
        require_non_negative("drift_min_speed", self.drift_min_speed)?;
        require_non_negative("drift_speed_ratio_threshold", self.drift_speed_ratio_threshold)?;

        if self.integrator_substeps == 0 {
            return Err(DriftError::InvalidConstant {
                field: "integrator_substeps",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

// --------------------------------------------------
// Host settings
// --------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub ticks: u64,          // 0 = run the whole input script
    pub snapshot_every: u64, // publish every Nth tick
    pub realtime: bool,      // pace ticks against the wall clock
    pub vehicles: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            ticks: 0,
            snapshot_every: 1,
            realtime: false,
            vehicles: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub vehicle: VehicleConfig,
    pub spawn: SpawnSettings,
    pub run: RunSettings,
}

impl Settings {
    /// Defaults, then `path` (if it exists), then `DRIFT__*` environment.
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("DRIFT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.vehicle.validate()?;
        Ok(settings)
    }

    pub fn parse_toml(text: &str) -> Result<Settings> {
        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        settings.vehicle.validate()?;
        Ok(settings)
    }
}
