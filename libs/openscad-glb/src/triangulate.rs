// Fan triangulation of convex polygon faces.

/// Splits a polygon into `n - 2` triangles sharing its first vertex.
///
/// Every triangle keeps the polygon's winding, so outward normals are
/// unchanged. Faces with fewer than three indices yield nothing.
///
/// # Examples
/// ```
/// use openscad_glb::triangulate::fan_triangulate;
///
/// let tris: Vec<_> = fan_triangulate(&[0, 1, 2, 3]).collect();
/// assert_eq!(tris, vec![[0, 1, 2], [0, 2, 3]]);
/// ```
pub fn fan_triangulate(face: &[u32]) -> impl Iterator<Item = [u32; 3]> + '_ {
    let anchor = face.first().copied().unwrap_or_default();
    face.windows(2)
        .skip(1)
        .map(move |pair| [anchor, pair[0], pair[1]])
}
