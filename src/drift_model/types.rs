//! Core shared types for `drift_model` (engine-agnostic).
// drift_model/types.rs

pub type Vec2 = nalgebra::Vector2<f32>;

// ============================================
// Kinematic state read from the body each tick
// ============================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub angle: f32,            // heading, radians, 0 = facing +x
    pub velocity: Vec2,        // px/s
    pub angular_velocity: f32, // rad/s, positive = counter-clockwise
}

impl Kinematics {
    pub fn at_rest(x: f32, y: f32, angle: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            angle,
            velocity: Vec2::zeros(),
            angular_velocity: 0.0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}

// ============================================
// Body-local frame
// ============================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub forward: Vec2,
    pub right: Vec2, // forward rotated a quarter turn: (-f.y, f.x)
}

impl Basis {
    #[inline]
    pub fn from_heading(angle: f32) -> Self {
        let forward = Vec2::new(angle.cos(), angle.sin());
        let right = Vec2::new(-forward.y, forward.x);
        Self { forward, right }
    }

    /// Signed speed along the heading.
    #[inline]
    pub fn forward_speed(&self, velocity: &Vec2) -> f32 {
        velocity.dot(&self.forward)
    }

    /// Signed sideways slip.
    #[inline]
    pub fn lateral_speed(&self, velocity: &Vec2) -> f32 {
        velocity.dot(&self.right)
    }
}
