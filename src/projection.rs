use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::config::ProjectionConfig;
use crate::tracking::Position3D;

/// The fixed virtual aperture the scene is viewed through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowGeometry {
    pub width: f32,
    pub height: f32,
    /// z of the plane the camera looks at
    pub plane_depth: f32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            width: 6.0,
            height: 4.0,
            plane_depth: -2.0,
        }
    }
}

impl WindowGeometry {
    pub fn center(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.plane_depth)
    }
}

/// Asymmetric view volume at the near plane
///
/// `bottom` holds the upper clip edge and `top` the lower one. The naive
/// window derivation renders upside down once the camera's vertical
/// coordinate is mirrored, so the two are swapped here and the matrix
/// builder reads them accordingly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Horizontal midpoint of the near-plane rectangle
    pub fn horizontal_center(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    pub fn vertical_center(&self) -> f32 {
        (self.top + self.bottom) * 0.5
    }

    pub fn is_finite(&self) -> bool {
        [self.left, self.right, self.bottom, self.top, self.near, self.far]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Off-center perspective matrix, right-handed, depth mapped to [0, 1]
    pub fn projection_matrix(&self) -> Mat4 {
        let (l, r, n, f) = (self.left, self.right, self.near, self.far);
        let (upper, lower) = (self.bottom, self.top);

        let x_scale = 2.0 * n / (r - l);
        let y_scale = 2.0 * n / (upper - lower);
        let x_offset = (r + l) / (r - l);
        let y_offset = (upper + lower) / (upper - lower);
        let depth = f / (n - f);

        Mat4::from_cols(
            Vec4::new(x_scale, 0.0, 0.0, 0.0),
            Vec4::new(0.0, y_scale, 0.0, 0.0),
            Vec4::new(x_offset, y_offset, depth, -1.0),
            Vec4::new(0.0, 0.0, depth * n, 0.0),
        )
    }
}

/// Where the render camera sits and what it looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl CameraPose {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }
}

/// Frustum plus pose for one frame; never cached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub frustum: Frustum,
    pub pose: CameraPose,
}

impl Projection {
    pub fn view_projection(&self) -> Mat4 {
        self.frustum.projection_matrix() * self.pose.view_matrix()
    }
}

/// "Looking through a window" projection
///
/// As the eye moves right the frustum slides left, uncovering content on the
/// right edge of the aperture: motion parallax.
#[derive(Debug, Clone, Copy)]
pub struct OffAxisProjector {
    near: f32,
    far: f32,
    min_eye_distance: f32,
    fallback_distance: f32,
}

impl OffAxisProjector {
    pub fn new(config: ProjectionConfig, fallback_distance: f32) -> Self {
        Self {
            near: config.near,
            far: config.far,
            min_eye_distance: config.min_eye_distance,
            fallback_distance,
        }
    }

    pub fn project(&self, eye: Position3D, window: &WindowGeometry) -> Projection {
        let eye = if eye.is_finite() {
            eye
        } else {
            Position3D::neutral(self.fallback_distance)
        };
        // Eye on or behind the window plane has no meaningful frustum
        let ez = eye.z.max(self.min_eye_distance);

        let frustum = frustum_for(eye.x, eye.y, ez, window, self.near, self.far);
        let pose = CameraPose {
            position: Vec3::new(eye.x, -eye.y, ez),
            target: window.center(),
            up: Vec3::Y,
        };

        Projection { frustum, pose }
    }
}

impl Default for OffAxisProjector {
    fn default() -> Self {
        Self::new(ProjectionConfig::default(), 3.0)
    }
}

fn frustum_for(ex: f32, ey: f32, ez: f32, window: &WindowGeometry, near: f32, far: f32) -> Frustum {
    let hw = window.width * 0.5;
    let hh = window.height * 0.5;
    let scale = near / ez;

    Frustum {
        left: (-hw - ex) * scale,
        right: (hw - ex) * scale,
        bottom: (hh + ey) * scale,
        top: (-hh + ey) * scale,
        near,
        far,
    }
}
