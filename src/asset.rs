use glam::{Mat4, Vec3};
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::loaders::load_gltf_mesh;
use crate::math::AABB;
use crate::scenes::create_default_model;

pub const MIN_SCALE_MULTIPLIER: f32 = 0.1;
pub const MAX_SCALE_MULTIPLIER: f32 = 3.0;

/// Mesh vertex as uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

    pub fn new(position: Vec3, normal: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounds(&self) -> Option<AABB> {
        AABB::from_points(self.vertices.iter().map(|v| Vec3::from_array(v.position)))
    }

    /// Merge `other` into this mesh, moving it by `transform`
    pub fn append(&mut self, other: &Mesh, transform: &Mat4) {
        let base = self.vertices.len() as u32;
        let normal_matrix = transform.inverse().transpose();

        self.vertices.extend(other.vertices.iter().map(|v| {
            let position = transform.transform_point3(Vec3::from_array(v.position));
            let normal = normal_matrix
                .transform_vector3(Vec3::from_array(v.normal))
                .normalize_or_zero();
            Vertex::new(position, normal, v.color)
        }));
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Replace normals with area-weighted averages of adjacent face normals
    pub fn recompute_normals(&mut self) {
        let mut accumulated = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if a >= accumulated.len() || b >= accumulated.len() || c >= accumulated.len() {
                continue;
            }
            let pa = Vec3::from_array(self.vertices[a].position);
            let pb = Vec3::from_array(self.vertices[b].position);
            let pc = Vec3::from_array(self.vertices[c].position);
            let face = (pb - pa).cross(pc - pa);
            accumulated[a] += face;
            accumulated[b] += face;
            accumulated[c] += face;
        }

        for (vertex, normal) in self.vertices.iter_mut().zip(accumulated) {
            let normal = normal.normalize_or_zero();
            vertex.normal = if normal == Vec3::ZERO { Vec3::Y } else { normal }.to_array();
        }
    }
}

/// Where the displayed model came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// Built-in procedural model
    Default,
    /// User-supplied glTF file
    File(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Model placement: auto-fit, UI controls, and idle motion kept apart
///
/// Composition order: translate(offset + bob) * rotate(ui, plus sway on Y) * scale(base * multiplier).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetTransform {
    offset: Vec3,
    rotation_degrees: Vec3,
    base_scale: f32,
    scale_multiplier: f32,
    bob: f32,
    sway: f32,
}

impl Default for AssetTransform {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            rotation_degrees: Vec3::ZERO,
            base_scale: 1.0,
            scale_multiplier: 1.0,
            bob: 0.0,
            sway: 0.0,
        }
    }
}

impl AssetTransform {
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn rotation_degrees(&self) -> Vec3 {
        self.rotation_degrees
    }

    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    pub fn scale_multiplier(&self) -> f32 {
        self.scale_multiplier
    }

    pub fn scale(&self) -> f32 {
        self.base_scale * self.scale_multiplier
    }

    /// Set one axis; any input wraps into [0, 360)
    pub fn set_rotation_degrees(&mut self, axis: Axis, degrees: f32) {
        let wrapped = if degrees.is_finite() {
            degrees.rem_euclid(360.0)
        } else {
            0.0
        };
        match axis {
            Axis::X => self.rotation_degrees.x = wrapped,
            Axis::Y => self.rotation_degrees.y = wrapped,
            Axis::Z => self.rotation_degrees.z = wrapped,
        }
    }

    /// Uniform multiplier on top of the auto-fit scale, clamped to [0.1, 3.0]
    pub fn set_scale_multiplier(&mut self, multiplier: f32) {
        self.scale_multiplier = if multiplier.is_finite() {
            multiplier.clamp(MIN_SCALE_MULTIPLIER, MAX_SCALE_MULTIPLIER)
        } else {
            1.0
        };
    }

    /// Cosmetic floating offsets written by the render loop every frame
    pub fn set_idle_motion(&mut self, bob: f32, sway: f32) {
        self.bob = bob;
        self.sway = sway;
    }

    /// Zero the UI rotation and multiplier; auto-fit is kept
    pub fn reset_controls(&mut self) {
        self.rotation_degrees = Vec3::ZERO;
        self.scale_multiplier = 1.0;
    }

    pub fn model_matrix(&self) -> Mat4 {
        let r = self.rotation_degrees;
        Mat4::from_translation(self.offset + Vec3::new(0.0, self.bob, 0.0))
            * Mat4::from_rotation_x(r.x.to_radians())
            * Mat4::from_rotation_y(r.y.to_radians() + self.sway)
            * Mat4::from_rotation_z(r.z.to_radians())
            * Mat4::from_scale(Vec3::splat(self.scale()))
    }
}

/// The object shown in the portal
#[derive(Debug, Clone)]
pub struct SceneAsset {
    mesh: Mesh,
    bounds: AABB,
    source: AssetSource,
    pub transform: AssetTransform,
}

impl SceneAsset {
    pub fn new(mesh: Mesh, source: AssetSource) -> Self {
        let bounds = mesh
            .bounds()
            .unwrap_or_else(|| AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5)));
        Self {
            mesh,
            bounds,
            source,
            transform: AssetTransform::default(),
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Bounds in model space, before any transform
    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    pub fn is_user_supplied(&self) -> bool {
        matches!(self.source, AssetSource::File(_))
    }

    /// Scale so the largest side equals `target_size`, then center on the origin
    pub fn auto_fit(&mut self, target_size: f32) {
        let extent = self.bounds.max_extent();
        if !(extent.is_finite() && extent > f32::EPSILON) {
            warn!("Model has degenerate bounds ({:?}), skipping auto-fit", self.bounds);
            return;
        }

        let scale = target_size / extent;
        self.transform.base_scale = scale;
        self.transform.offset = -self.bounds.center() * scale;

        info!(
            "Model auto-scaled: original size {:.2}, scale factor {:.4}",
            extent, scale
        );
    }

    /// Bounds in world space under the current transform
    pub fn world_bounds(&self) -> AABB {
        self.bounds.transformed(&self.transform.model_matrix())
    }
}

/// Load the model at `path` and auto-fit it, or fall back to the built-in figure
///
/// A model that fails to load is logged and replaced; the viewer always has
/// something to show.
pub fn load_scene_asset(path: Option<&Path>, target_size: f32) -> SceneAsset {
    let Some(path) = path else {
        return SceneAsset::new(create_default_model(), AssetSource::Default);
    };

    match load_gltf_mesh(path) {
        Ok(mesh) => {
            let mut asset = SceneAsset::new(mesh, AssetSource::File(path.to_path_buf()));
            asset.auto_fit(target_size);
            asset
        }
        Err(e) => {
            warn!("Failed to load model {:?}, using default: {:#}", path, e);
            SceneAsset::new(create_default_model(), AssetSource::Default)
        }
    }
}
