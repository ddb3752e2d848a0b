//! Axis remapping between OpenSCAD's Z-up frame and glTF's Y-up frame.

use glam::DVec3;

use crate::Mesh;

/// Maps one point from Z-up to Y-up: `(x, y, z) -> (x, z, -y)`.
///
/// Non-finite components pass through untouched.
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use openscad_mesh::transform::remap_point;
///
/// assert_eq!(remap_point(DVec3::new(1.0, 2.0, 3.0)), DVec3::new(1.0, 3.0, -2.0));
/// ```
#[inline]
pub fn remap_point(p: DVec3) -> DVec3 {
    DVec3::new(p.x, p.z, -p.y)
}

/// Returns a copy of `mesh` with every vertex remapped by [`remap_point`].
///
/// Faces (including winding) and colors are carried over unchanged; the
/// input mesh is left intact.
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use openscad_mesh::{transform::z_up_to_y_up, Mesh, MeshColors};
///
/// let mesh = Mesh::new(
///     vec![DVec3::ZERO, DVec3::X, DVec3::Z],
///     vec![vec![0, 1, 2]],
///     MeshColors::None,
/// )
/// .unwrap();
/// let y_up = z_up_to_y_up(&mesh);
/// assert_eq!(y_up.vertices()[2], DVec3::Y);
/// assert_eq!(y_up.faces(), mesh.faces());
/// ```
pub fn z_up_to_y_up(mesh: &Mesh) -> Mesh {
    let vertices = mesh.vertices().iter().copied().map(remap_point).collect();
    mesh.with_vertices(vertices)
}
