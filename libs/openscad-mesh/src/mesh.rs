//! # Mesh Data Structure
//!
//! Polygon mesh with vertices, faces of arbitrary arity, and optional colors.

use glam::DVec3;

use crate::color::{Color, MeshColors};
use crate::error::{MeshError, MeshResult};

/// One polygon: an ordered list of vertex indices.
///
/// Winding order is kept exactly as read; it decides which side is outward.
pub type Face = Vec<u32>;

/// A polygon mesh as emitted by the geometry compiler.
///
/// Faces are not triangulated. All coordinates are f64; narrowing to f32
/// only happens when a binary asset is written.
///
/// A `Mesh` is immutable once built: every invariant is checked in
/// [`Mesh::new`] and the fields are only reachable through accessors.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use openscad_mesh::{Mesh, MeshColors};
///
/// let mesh = Mesh::new(
///     vec![DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y],
///     vec![vec![0, 1, 2, 3]],
///     MeshColors::None,
/// )
/// .unwrap();
/// assert_eq!(mesh.face_count(), 1);
/// assert_eq!(mesh.triangle_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<DVec3>,
    faces: Vec<Face>,
    colors: MeshColors,
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            colors: MeshColors::None,
        }
    }
}

impl Mesh {
    /// Builds a mesh, validating topology and color alignment.
    ///
    /// # Errors
    ///
    /// - [`MeshError::DegenerateFace`] for a face with fewer than 3 indices
    /// - [`MeshError::IndexOutOfRange`] for an index `>= vertices.len()`
    /// - [`MeshError::ColorCountMismatch`] when colors do not align 1:1 with
    ///   the vertices or faces they are bound to
    pub fn new(vertices: Vec<DVec3>, faces: Vec<Face>, colors: MeshColors) -> MeshResult<Self> {
        if vertices.len() > u32::MAX as usize {
            return Err(MeshError::TooManyVertices {
                count: vertices.len(),
                max: u32::MAX as usize,
            });
        }

        let vertex_count = vertices.len();
        for (face_idx, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::DegenerateFace {
                    face: face_idx,
                    arity: face.len(),
                });
            }
            if let Some(&index) = face.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    face: face_idx,
                    index,
                    vertex_count,
                });
            }
        }

        let expected = match &colors {
            MeshColors::None => None,
            MeshColors::PerVertex(c) => Some((c.len(), vertex_count)),
            MeshColors::PerFace(c) => Some((c.len(), faces.len())),
        };
        if let Some((color_count, element_count)) = expected {
            if color_count != element_count {
                return Err(MeshError::ColorCountMismatch {
                    binding: colors.binding(),
                    color_count,
                    element_count,
                });
            }
        }

        Ok(Self {
            vertices,
            faces,
            colors,
        })
    }

    /// Rebuilds this mesh with new positions, keeping topology and colors.
    pub(crate) fn with_vertices(&self, vertices: Vec<DVec3>) -> Self {
        debug_assert_eq!(vertices.len(), self.vertices.len());
        Self {
            vertices,
            faces: self.faces.clone(),
            colors: self.colors.clone(),
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns the number of color records.
    #[inline]
    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Returns the total number of face index entries.
    pub fn index_count(&self) -> usize {
        self.faces.iter().map(Vec::len).sum()
    }

    /// Number of triangles after fan triangulation (`n - 2` per face).
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.len() - 2).sum()
    }

    /// Returns true if the mesh has no vertices or no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[inline]
    pub fn colors(&self) -> &MeshColors {
        &self.colors
    }

    /// Returns the color of a face, if colors are bound per face.
    pub fn face_color(&self, face: usize) -> Option<Color> {
        match &self.colors {
            MeshColors::PerFace(colors) => colors.get(face).copied(),
            _ => None,
        }
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns `None` for a mesh without vertices.
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let (first, rest) = self.vertices.split_first()?;
        Some(
            rest.iter()
                .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<DVec3> {
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_mesh_default_is_empty() {
        let mesh = Mesh::default();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_mixed_arity_counts() {
        let mesh = Mesh::new(square(), vec![vec![0, 1, 2, 3], vec![0, 1, 2]], MeshColors::None)
            .unwrap();
        assert_eq!(mesh.index_count(), 7);
        assert_eq!(mesh.triangle_count(), 3);
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let err = Mesh::new(square(), vec![vec![0, 1, 4]], MeshColors::None).unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                face: 0,
                index: 4,
                vertex_count: 4
            }
        );
    }

    #[test]
    fn test_degenerate_face_is_rejected() {
        let err = Mesh::new(square(), vec![vec![0, 1]], MeshColors::None).unwrap_err();
        assert!(matches!(err, MeshError::DegenerateFace { face: 0, arity: 2 }));
    }

    #[test]
    fn test_color_alignment() {
        let faces = vec![vec![0, 1, 2], vec![0, 2, 3]];
        let ok = Mesh::new(
            square(),
            faces.clone(),
            MeshColors::PerFace(vec![Color::WHITE; 2]),
        );
        assert!(ok.is_ok());

        let err = Mesh::new(square(), faces, MeshColors::PerVertex(vec![Color::WHITE; 2]))
            .unwrap_err();
        assert!(matches!(
            err,
            MeshError::ColorCountMismatch {
                binding: "vertex",
                color_count: 2,
                element_count: 4
            }
        ));
    }

    #[test]
    fn test_face_color_lookup() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        let mesh = Mesh::new(square(), vec![vec![0, 1, 2]], MeshColors::PerFace(vec![red]))
            .unwrap();
        assert_eq!(mesh.face_color(0), Some(red));
        assert_eq!(mesh.face_color(1), None);
    }

    #[test]
    fn test_bounding_box() {
        let mesh = Mesh::new(
            vec![DVec3::new(-1.0, -2.0, -3.0), DVec3::new(4.0, 5.0, 6.0), DVec3::ZERO],
            vec![vec![0, 1, 2]],
            MeshColors::None,
        )
        .unwrap();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, DVec3::new(4.0, 5.0, 6.0));
    }
}
