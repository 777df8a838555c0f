use glam::Vec3;
use std::f32::consts::{PI, TAU};

use crate::asset::{Mesh, Vertex};

/// Capped (possibly tapered) cylinder along Y, centered on the origin
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32, color: [f32; 4]) -> Mesh {
    let segments = segments.max(3);
    let half = height * 0.5;
    let slope = if height > 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side: one ring per end, seam vertex duplicated
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        let normal = Vec3::new(sin, slope, cos).normalize();
        vertices.push(Vertex::new(Vec3::new(radius_bottom * sin, -half, radius_bottom * cos), normal, color));
        vertices.push(Vertex::new(Vec3::new(radius_top * sin, half, radius_top * cos), normal, color));
    }
    for i in 0..segments {
        let bottom = i * 2;
        let top = bottom + 1;
        let next_bottom = bottom + 2;
        let next_top = bottom + 3;
        indices.extend_from_slice(&[bottom, next_bottom, next_top, bottom, next_top, top]);
    }

    cap(&mut vertices, &mut indices, radius_top, half, segments, Vec3::Y, color);
    cap(&mut vertices, &mut indices, radius_bottom, -half, segments, Vec3::NEG_Y, color);

    Mesh::new(vertices, indices)
}

fn cap(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    radius: f32,
    y: f32,
    segments: u32,
    normal: Vec3,
    color: [f32; 4],
) {
    if radius <= 0.0 {
        return;
    }
    let center = vertices.len() as u32;
    vertices.push(Vertex::new(Vec3::new(0.0, y, 0.0), normal, color));
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        vertices.push(Vertex::new(Vec3::new(radius * sin, y, radius * cos), normal, color));
    }
    for i in 0..segments {
        let a = center + 1 + i;
        let b = a + 1;
        if normal.y > 0.0 {
            indices.extend_from_slice(&[center, a, b]);
        } else {
            indices.extend_from_slice(&[center, b, a]);
        }
    }
}

/// Latitude/longitude sphere centered on the origin
pub fn uv_sphere(radius: f32, segments: u32, rings: u32, color: [f32; 4]) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let columns = segments + 1;

    let mut vertices = Vec::with_capacity(((rings + 1) * columns) as usize);
    for j in 0..=rings {
        let phi = j as f32 / rings as f32 * PI;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let normal = Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta);
            vertices.push(Vertex::new(normal * radius, normal, color));
        }
    }

    let mut indices = Vec::new();
    for j in 0..rings {
        for i in 0..segments {
            let a = j * columns + i;
            let b = a + columns;
            let c = b + 1;
            let d = a + 1;
            // Pole rows collapse to a single point; skip the zero-area half
            if j != rings - 1 {
                indices.extend_from_slice(&[a, b, c]);
            }
            if j != 0 {
                indices.extend_from_slice(&[a, c, d]);
            }
        }
    }

    Mesh::new(vertices, indices)
}

/// Torus in the XY plane around the Z axis
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32, color: [f32; 4]) -> Mesh {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);
    let columns = tubular + 1;

    let mut vertices = Vec::with_capacity(((radial + 1) * columns) as usize);
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        let (sin_v, cos_v) = v.sin_cos();
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let (sin_u, cos_u) = u.sin_cos();
            let ring = radius + tube * cos_v;
            let position = Vec3::new(ring * cos_u, ring * sin_u, tube * sin_v);
            let center = Vec3::new(radius * cos_u, radius * sin_u, 0.0);
            vertices.push(Vertex::new(position, (position - center).normalize_or_zero(), color));
        }
    }

    let mut indices = Vec::new();
    for j in 0..radial {
        for i in 0..tubular {
            let a = j * columns + i;
            let b = a + 1;
            let c = b + columns;
            let d = a + columns;
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }

    Mesh::new(vertices, indices)
}
