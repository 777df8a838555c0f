use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::asset::Mesh;
use crate::math::hex_rgba;

use super::primitives::{cylinder, torus, uv_sphere};

const SUIT: u32 = 0x00aaff;
const SKIN: u32 = 0xffcc99;
const GLOW: u32 = 0x00ffff;
const PLATFORM: u32 = 0x1a1a3e;

/// The built-in figure shown when no model file is given
///
/// Roughly 2 units tall, standing on a platform at y = -1 with a glowing
/// ring around its waist line.
pub fn create_default_model() -> Mesh {
    let mut model = Mesh::default();

    let body = cylinder(0.3, 0.4, 1.0, 32, hex_rgba(SUIT, 0.9));
    model.append(&body, &Mat4::from_translation(Vec3::new(0.0, -0.3, 0.0)));

    let head = uv_sphere(0.35, 32, 32, hex_rgba(SKIN, 1.0));
    model.append(&head, &Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0)));

    let eye = uv_sphere(0.08, 16, 16, hex_rgba(GLOW, 1.0));
    for x in [-0.12, 0.12] {
        model.append(&eye, &Mat4::from_translation(Vec3::new(x, 0.55, 0.28)));
    }

    let arm = cylinder(0.08, 0.08, 0.6, 16, hex_rgba(SUIT, 1.0));
    for (x, tilt) in [(-0.5, FRAC_PI_4), (0.5, -FRAC_PI_4)] {
        let placement = Mat4::from_translation(Vec3::new(x, -0.1, 0.0)) * Mat4::from_rotation_z(tilt);
        model.append(&arm, &placement);
    }

    let ring = torus(0.7, 0.02, 16, 100, hex_rgba(GLOW, 0.6));
    let placement = Mat4::from_translation(Vec3::new(0.0, -0.8, 0.0)) * Mat4::from_rotation_x(FRAC_PI_2);
    model.append(&ring, &placement);

    let platform = cylinder(0.8, 0.9, 0.1, 32, hex_rgba(PLATFORM, 1.0));
    model.append(&platform, &Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)));

    log::debug!(
        "Default model built: {} vertices, {} triangles",
        model.vertices.len(),
        model.triangle_count()
    );
    model
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_extent() {
        let bounds = create_default_model().bounds().unwrap();
        // Platform bottom to head top
        assert!((bounds.min.y + 1.05).abs() < 1e-3);
        assert!((bounds.max.y - 0.85).abs() < 1e-3);
        // Platform is the widest part
        assert!((bounds.max.x - 0.9).abs() < 1e-3);
    }

    #[test]
    fn test_default_model_has_translucent_parts() {
        let model = create_default_model();
        assert!(model.vertices.iter().any(|v| v.color[3] < 1.0));
        assert!(model.vertices.iter().any(|v| v.color[3] == 1.0));
    }
}
