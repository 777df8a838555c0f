use anyhow::{bail, Context, Result};
use glam::{Mat4, Vec3};
use log::{debug, info, warn};
use std::path::Path;

use crate::asset::{Mesh, Vertex};

/// Loads every triangle primitive of a glTF/GLB file into one mesh
///
/// Node transforms are baked into the vertices. Vertex colors are the
/// material's base color factor times COLOR_0 when present. Textures are
/// not sampled.
pub fn load_gltf_mesh(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    info!("Loading glTF file: {:?}", path);

    let (document, buffers, _images) =
        gltf::import(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    collect_mesh(&document, &buffers).with_context(|| format!("No usable geometry in {:?}", path))
}

/// Same as [`load_gltf_mesh`] for an in-memory document with embedded buffers
pub fn load_gltf_slice(bytes: &[u8]) -> Result<Mesh> {
    let (document, buffers, _images) = gltf::import_slice(bytes).context("Failed to parse glTF data")?;
    collect_mesh(&document, &buffers)
}

fn collect_mesh(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Result<Mesh> {
    debug!(
        "glTF: {} scenes, {} nodes, {} meshes",
        document.scenes().count(),
        document.nodes().count(),
        document.meshes().count()
    );

    let mut mesh = Mesh::default();

    // Prefer the default scene; fall back to everything
    match document.default_scene() {
        Some(scene) => {
            for node in scene.nodes() {
                process_node(&node, buffers, &Mat4::IDENTITY, &mut mesh)?;
            }
        }
        None => {
            for scene in document.scenes() {
                for node in scene.nodes() {
                    process_node(&node, buffers, &Mat4::IDENTITY, &mut mesh)?;
                }
            }
        }
    }

    if mesh.is_empty() {
        bail!("glTF document contains no triangles");
    }

    info!(
        "Extracted {} triangles ({} vertices) from glTF",
        mesh.triangle_count(),
        mesh.vertices.len()
    );
    Ok(mesh)
}

fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    mesh: &mut Mesh,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(node_mesh) = node.mesh() {
        for primitive in node_mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                warn!(
                    "Skipping {:?} primitive in mesh {:?}",
                    primitive.mode(),
                    node_mesh.name()
                );
                continue;
            }
            let part = read_primitive(&primitive, buffers)?;
            mesh.append(&part, &global_transform);
        }
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, mesh)?;
    }

    Ok(())
}

fn read_primitive(primitive: &gltf::Primitive, buffers: &[gltf::buffer::Data]) -> Result<Mesh> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));

    let positions: Vec<Vec3> = reader
        .read_positions()
        .context("Mesh primitive has no positions")?
        .map(Vec3::from_array)
        .collect();

    let base_color = primitive.material().pbr_metallic_roughness().base_color_factor();
    let colors: Vec<[f32; 4]> = match reader.read_colors(0) {
        Some(colors) => colors
            .into_rgba_f32()
            .map(|c| [c[0] * base_color[0], c[1] * base_color[1], c[2] * base_color[2], c[3] * base_color[3]])
            .collect(),
        None => vec![base_color; positions.len()],
    };

    let normals: Option<Vec<Vec3>> = reader
        .read_normals()
        .map(|normals| normals.map(Vec3::from_array).collect());
    let has_normals = normals.as_ref().is_some_and(|n| n.len() == positions.len());

    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, &position)| {
            let normal = normals
                .as_ref()
                .and_then(|n| n.get(i).copied())
                .unwrap_or(Vec3::ZERO);
            let color = colors.get(i).copied().unwrap_or(base_color);
            Vertex::new(position, normal, color)
        })
        .collect::<Vec<_>>();

    let vertex_count = vertices.len() as u32;
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertex_count).collect(),
    };
    // Drop trailing partial triangles and out-of-range references
    let indices = indices
        .chunks_exact(3)
        .filter(|tri| tri.iter().all(|&i| i < vertex_count))
        .flatten()
        .copied()
        .collect();

    let mut part = Mesh::new(vertices, indices);
    if !has_normals {
        part.recompute_normals();
    }
    Ok(part)
}
