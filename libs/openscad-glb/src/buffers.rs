//! Flat vertex and index streams for GPU-style consumers.
//!
//! This module turns a polygon [`Mesh`] into triangle buffers using `f32`
//! precision, expanding per-face colors into per-vertex colors on the way.

use std::collections::HashMap;

use openscad_mesh::{Mesh, MeshColors};

use crate::error::{ExportError, ExportResult};
use crate::triangulate::fan_triangulate;

/// Triangle buffers ready to be packed into a binary asset.
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use openscad_glb::GeometryBuffers;
/// use openscad_mesh::{Mesh, MeshColors};
///
/// let quad = Mesh::new(
///     vec![DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y],
///     vec![vec![0, 1, 2, 3]],
///     MeshColors::None,
/// )
/// .unwrap();
/// let buffers = GeometryBuffers::from_mesh(&quad).unwrap();
///
/// assert_eq!(buffers.vertex_count(), 4);
/// assert_eq!(buffers.triangle_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffers {
    /// Vertex positions, one `[x, y, z]` per emitted vertex.
    pub positions: Vec<[f32; 3]>,

    /// Vertex colors, one RGBA per emitted vertex, when the mesh has colors.
    pub colors: Option<Vec<[f32; 4]>>,

    /// Triangle indices as flat array [i0, i1, i2, i0, i1, i2, ...].
    pub indices: Vec<u32>,
}

impl GeometryBuffers {
    /// Triangulates and flattens a mesh.
    ///
    /// Uncolored and vertex-colored meshes keep their shared vertices. With
    /// per-face colors a vertex is emitted once per distinct color among the
    /// faces using it, so two faces of different color never share a vertex
    /// and each face shades flat in its own color.
    ///
    /// # Errors
    ///
    /// - [`ExportError::EmptyMesh`] when the mesh has no vertices or faces
    /// - [`ExportError::NonFiniteVertex`] when a coordinate is not finite in `f32`
    /// - [`ExportError::TooManyVertices`] when the expanded stream exceeds `u32`
    pub fn from_mesh(mesh: &Mesh) -> ExportResult<Self> {
        if mesh.is_empty() {
            return Err(ExportError::EmptyMesh {
                vertices: mesh.vertex_count(),
                faces: mesh.face_count(),
            });
        }

        let positions = narrow_positions(mesh)?;
        let buffers = match mesh.colors() {
            MeshColors::None => Self {
                indices: shared_indices(mesh),
                positions,
                colors: None,
            },
            MeshColors::PerVertex(colors) => Self {
                indices: shared_indices(mesh),
                positions,
                colors: Some(colors.iter().map(|c| c.to_array()).collect()),
            },
            MeshColors::PerFace(_) => expand_face_colors(mesh, &positions)?,
        };

        Ok(buffers)
    }

    /// Returns the number of emitted vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Component-wise minimum and maximum of all positions.
    pub fn position_bounds(&self) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for p in &self.positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        (min, max)
    }

    /// Returns true when any vertex color is not fully opaque.
    pub fn has_translucency(&self) -> bool {
        self.colors
            .as_ref()
            .is_some_and(|colors| colors.iter().any(|c| c[3] < 1.0))
    }
}

fn narrow_positions(mesh: &Mesh) -> ExportResult<Vec<[f32; 3]>> {
    mesh.vertices()
        .iter()
        .enumerate()
        .map(|(index, v)| {
            let p = [v.x as f32, v.y as f32, v.z as f32];
            if p.iter().all(|c| c.is_finite()) {
                Ok(p)
            } else {
                Err(ExportError::NonFiniteVertex { index })
            }
        })
        .collect()
}

fn shared_indices(mesh: &Mesh) -> Vec<u32> {
    let mut indices = Vec::with_capacity(mesh.triangle_count() * 3);
    for face in mesh.faces() {
        for tri in fan_triangulate(face) {
            indices.extend_from_slice(&tri);
        }
    }
    indices
}

fn expand_face_colors(mesh: &Mesh, positions: &[[f32; 3]]) -> ExportResult<GeometryBuffers> {
    let mut out_positions = Vec::with_capacity(mesh.index_count());
    let mut out_colors = Vec::with_capacity(mesh.index_count());
    let mut indices = Vec::with_capacity(mesh.triangle_count() * 3);
    let mut emitted: HashMap<(u32, [u32; 4]), u32> = HashMap::new();

    for (face_idx, face) in mesh.faces().iter().enumerate() {
        let Some(color) = mesh.face_color(face_idx) else {
            continue;
        };
        let key_bits = color.to_bits();

        let mut remapped = Vec::with_capacity(face.len());
        for &source in face {
            let next = out_positions.len();
            let index = match emitted.get(&(source, key_bits)) {
                Some(&index) => index,
                None => {
                    let index = u32::try_from(next)
                        .map_err(|_| ExportError::TooManyVertices { count: next + 1 })?;
                    out_positions.push(positions[source as usize]);
                    out_colors.push(color.to_array());
                    emitted.insert((source, key_bits), index);
                    index
                }
            };
            remapped.push(index);
        }

        for tri in fan_triangulate(&remapped) {
            indices.extend_from_slice(&tri);
        }
    }

    Ok(GeometryBuffers {
        positions: out_positions,
        colors: Some(out_colors),
        indices,
    })
}
