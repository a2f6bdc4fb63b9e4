use std::f32::consts::FRAC_PI_2;
use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::vehicle::VehicleId;

/// The car sprite faces up; physics heading 0 faces +x.
pub const SPRITE_ROTATION_OFFSET: f32 = FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

impl Pose {
    pub fn display_rotation(&self) -> f32 {
        self.angle + SPRITE_ROTATION_OFFSET
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSnapshot {
    pub id: VehicleId,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub rotation: f32, // display rotation
    pub speed: f32,
    pub drifting: bool,
}

impl VehicleSnapshot {
    pub fn pose(&self) -> Pose {
        Pose { x: self.x, y: self.y, angle: self.angle }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub vehicles: Vec<VehicleSnapshot>,
}

impl Snapshot {
    pub fn vehicle(&self, id: VehicleId) -> Option<&VehicleSnapshot> {
        self.vehicles.iter().find(|v| v.id == id)
    }
}

/// Read-only consumer of the post-step poses.
pub trait Presenter {
    fn present(&mut self, snapshot: &Snapshot) -> Result<()>;
}

/// One JSON object per snapshot, newline separated.
pub struct JsonLinesPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonLinesPresenter<W> {
    fn present(&mut self, snapshot: &Snapshot) -> Result<()> {
        serde_json::to_writer(&mut self.out, snapshot).map_err(std::io::Error::from)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}
