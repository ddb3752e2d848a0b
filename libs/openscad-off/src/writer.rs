//! # OFF Writer
//!
//! Serializes a [`Mesh`] back to OFF text that [`parse_off`](crate::parse_off)
//! reads losslessly: coordinates use Rust's shortest round-trip float
//! formatting and colors are written as fractional RGBA.

use std::fmt::{self, Write};

use openscad_mesh::{Color, Mesh, MeshColors};

/// Writes `mesh` as OFF text.
///
/// Meshes with per-vertex colors use the `COFF` keyword.
///
/// # Example
///
/// ```rust
/// use openscad_off::{parse_off, write_off};
///
/// let text = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";
/// let mesh = parse_off(text)?;
/// assert_eq!(write_off(&mesh), text);
/// # Ok::<(), openscad_off::OffError>(())
/// ```
pub fn write_off(mesh: &Mesh) -> String {
    let mut out = String::with_capacity(32 + mesh.vertex_count() * 24 + mesh.index_count() * 4);
    // formatting into a String only fails if a Display impl does
    write_mesh(&mut out, mesh).ok();
    out
}

fn write_mesh(out: &mut String, mesh: &Mesh) -> fmt::Result {
    let (vertex_colors, face_colors) = match mesh.colors() {
        MeshColors::None => (None, None),
        MeshColors::PerVertex(colors) => (Some(colors.as_slice()), None),
        MeshColors::PerFace(colors) => (None, Some(colors.as_slice())),
    };

    out.push_str(if vertex_colors.is_some() { "COFF\n" } else { "OFF\n" });
    writeln!(out, "{} {} 0", mesh.vertex_count(), mesh.face_count())?;

    for (idx, v) in mesh.vertices().iter().enumerate() {
        write!(out, "{} {} {}", v.x, v.y, v.z)?;
        if let Some(colors) = vertex_colors {
            write_color(out, colors[idx])?;
        }
        out.push('\n');
    }

    for (idx, face) in mesh.faces().iter().enumerate() {
        write!(out, "{}", face.len())?;
        for index in face {
            write!(out, " {index}")?;
        }
        if let Some(colors) = face_colors {
            write_color(out, colors[idx])?;
        }
        out.push('\n');
    }

    Ok(())
}

fn write_color(out: &mut String, color: Color) -> fmt::Result {
    write!(out, " {} {} {} {}", color.r, color.g, color.b, color.a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_face_colors_are_fractional() {
        let mesh = Mesh::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            vec![vec![0, 1, 2]],
            MeshColors::PerFace(vec![Color::rgba(1.0, 0.5, 0.0, 1.0)]),
        )
        .unwrap();
        let text = write_off(&mesh);
        assert!(text.starts_with("OFF\n3 1 0\n"));
        assert!(text.ends_with("3 0 1 2 1 0.5 0 1\n"));
    }

    #[test]
    fn test_vertex_colors_use_coff() {
        let mesh = Mesh::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            vec![vec![0, 1, 2]],
            MeshColors::PerVertex(vec![Color::WHITE; 3]),
        )
        .unwrap();
        let text = write_off(&mesh);
        assert!(text.starts_with("COFF\n"));
        assert!(text.contains("\n1 0 0 1 1 1 1\n"));
    }

    #[test]
    fn test_polygon_faces_keep_arity_and_order() {
        let mesh = Mesh::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y],
            vec![vec![3, 2, 1, 0]],
            MeshColors::None,
        )
        .unwrap();
        assert_eq!(
            write_off(&mesh),
            "OFF\n4 1 0\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 3 2 1 0\n"
        );
    }
}
