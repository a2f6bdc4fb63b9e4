use serde::{Deserialize, Serialize};
use tracing::debug;

// ---------------------------------------------
// SPAWN POSE
// ---------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPose {
    pub x: f32,
    pub y: f32,
    pub angle: f32, // radians, 0 = facing +x
}

impl Default for SpawnPose {
    fn default() -> Self {
        Self { x: 100.0, y: 100.0, angle: 0.0 }
    }
}

// ---------------------------------------------
// STARTING GRID
// ---------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    Left,
    Right,
}

impl Lane {
    pub fn as_str(&self) -> &str {
        match self {
            Lane::Left => "left",
            Lane::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    pub origin: SpawnPose,  // pole position
    pub lane_spacing: f32,  // px between the two lanes
    pub row_spacing: f32,   // px between consecutive rows
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            origin: SpawnPose::default(),
            lane_spacing: 60.0,
            row_spacing: 140.0,
        }
    }
}

/// Hands out grid slots for cars joining the same world.
#[derive(Debug)]
pub struct SpawnManager {
    settings: SpawnSettings,
    left: usize,
    right: usize,
}

impl SpawnManager {
    pub fn new(settings: SpawnSettings) -> Self {
        Self { settings, left: 0, right: 0 }
    }

    // Lane with fewer cars, left on ties
    fn choose_lane(&self) -> Lane {
        if self.left <= self.right { Lane::Left } else { Lane::Right }
    }

    pub fn allocate(&mut self) -> (Lane, SpawnPose) {
        let lane = self.choose_lane();
        let row = match lane {
            Lane::Left => {
                self.left += 1;
                self.left - 1
            }
            Lane::Right => {
                self.right += 1;
                self.right - 1
            }
        };

        let origin = self.settings.origin;
        let (sin, cos) = origin.angle.sin_cos();

        // Rows step back along -forward, lanes sit either side of the origin
        // along the local right axis.
        let back = row as f32 * self.settings.row_spacing;
        let side = match lane {
            Lane::Left => -0.5 * self.settings.lane_spacing,
            Lane::Right => 0.5 * self.settings.lane_spacing,
        };

        let pose = SpawnPose {
            x: origin.x - cos * back - sin * side,
            y: origin.y - sin * back + cos * side,
            angle: origin.angle,
        };

        debug!(lane = lane.as_str(), row, x = pose.x, y = pose.y, "allocated spawn slot");
        (lane, pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_alternate_starting_left() {
        let mut grid = SpawnManager::new(SpawnSettings::default());
        let lanes: Vec<Lane> = (0..4).map(|_| grid.allocate().0).collect();
        assert_eq!(lanes, vec![Lane::Left, Lane::Right, Lane::Left, Lane::Right]);
    }

    #[test]
    fn rows_step_back_from_origin() {
        let mut grid = SpawnManager::new(SpawnSettings::default());
        let (_, first) = grid.allocate();
        let (_, second) = grid.allocate();
        let (_, third) = grid.allocate();

        assert!((first.x - 100.0).abs() < 1e-4);
        assert!((first.y - 70.0).abs() < 1e-4);
        assert!((second.y - 130.0).abs() < 1e-4);
        assert!((third.x - (100.0 - 140.0)).abs() < 1e-4);
        assert!((third.y - first.y).abs() < 1e-4);
    }
}
