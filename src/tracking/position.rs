use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Viewer position in normalized portal space
///
/// x and y are the offset from the window center (roughly -2..2),
/// z is the distance in front of the window (roughly 1..4, larger = farther).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position3D {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Centered viewer at the given distance
    pub const fn neutral(distance: f32) -> Self {
        Self::new(0.0, 0.0, distance)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn distance(&self, other: &Position3D) -> f32 {
        self.to_vec3().distance(other.to_vec3())
    }
}

impl From<Vec3> for Position3D {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Position3D> for Vec3 {
    fn from(p: Position3D) -> Self {
        p.to_vec3()
    }
}
