//! End-to-end checks on a unit cube, decoded the way a glTF client would.

use approx::assert_relative_eq;
use glam::DVec3;
use openscad_glb::container::read_glb;
use openscad_glb::document::{Document, COLOR_0, POSITION, UNSIGNED_BYTE};
use openscad_glb::{export_glb, inspect};
use openscad_mesh::{transform, Color, Mesh, MeshColors};

fn unit_cube(colors: MeshColors) -> Mesh {
    let vertices = vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(1.0, 1.0, 0.0),
        DVec3::new(0.0, 1.0, 0.0),
        DVec3::new(0.0, 0.0, 1.0),
        DVec3::new(1.0, 0.0, 1.0),
        DVec3::new(1.0, 1.0, 1.0),
        DVec3::new(0.0, 1.0, 1.0),
    ];
    let faces = vec![
        vec![0, 3, 2, 1],
        vec![4, 5, 6, 7],
        vec![0, 1, 5, 4],
        vec![1, 2, 6, 5],
        vec![2, 3, 7, 6],
        vec![3, 0, 4, 7],
    ];
    Mesh::new(vertices, faces, colors).unwrap()
}

fn positions_of(glb: &[u8]) -> Vec<[f32; 3]> {
    let chunks = read_glb(glb).unwrap();
    let doc: Document = serde_json::from_slice(chunks.json).unwrap();
    let accessor = &doc.accessors[doc.meshes[0].primitives[0].attributes[POSITION] as usize];
    let view = &doc.buffer_views[accessor.buffer_view as usize];
    let bin = chunks.bin.unwrap();
    let start = view.byte_offset as usize;
    bin[start..start + accessor.count as usize * 12]
        .chunks_exact(12)
        .map(|c| {
            let f = |i: usize| f32::from_le_bytes([c[i], c[i + 1], c[i + 2], c[i + 3]]);
            [f(0), f(4), f(8)]
        })
        .collect()
}

#[test]
fn uncolored_cube_decodes_to_twelve_triangles() {
    let glb = export_glb(&unit_cube(MeshColors::None)).unwrap();
    let summary = inspect(&glb).unwrap();

    assert_eq!(summary.total_length, glb.len());
    assert_eq!(summary.total_length % 4, 0);
    assert_eq!(summary.vertex_count, 8);
    assert_eq!(summary.triangle_count, 12);
    assert_eq!(summary.index_component_type, Some(UNSIGNED_BYTE));
    assert_eq!(summary.max_index, Some(7));
    assert!(!summary.has_colors);
    assert_eq!(summary.generator.as_deref(), Some("scad2glb"));
}

#[test]
fn face_colored_cube_splits_shared_corners() {
    let palette = [
        Color::rgb(1.0, 0.0, 0.0),
        Color::rgb(0.0, 1.0, 0.0),
        Color::rgb(0.0, 0.0, 1.0),
        Color::rgb(1.0, 1.0, 0.0),
        Color::rgb(0.0, 1.0, 1.0),
        Color::rgb(1.0, 0.0, 1.0),
    ];
    let glb = export_glb(&unit_cube(MeshColors::PerFace(palette.to_vec()))).unwrap();
    let summary = inspect(&glb).unwrap();

    // every corner touches three differently colored faces
    assert_eq!(summary.vertex_count, 24);
    assert_eq!(summary.triangle_count, 12);
    assert!(summary.has_colors);

    let chunks = read_glb(&glb).unwrap();
    let doc: Document = serde_json::from_slice(chunks.json).unwrap();
    let primitive = &doc.meshes[0].primitives[0];
    let color = &doc.accessors[primitive.attributes[COLOR_0] as usize];
    assert_eq!(color.kind, "VEC4");
    assert_eq!(color.count, 24);
}

#[test]
fn y_up_cube_lies_below_the_xy_plane_in_z() {
    let y_up = transform::z_up_to_y_up(&unit_cube(MeshColors::None));
    let glb = export_glb(&y_up).unwrap();
    let positions = positions_of(&glb);

    assert_eq!(positions.len(), 8);
    // (1, 1, 0) in Z-up becomes (1, 0, -1) in Y-up
    assert_relative_eq!(positions[2][0], 1.0);
    assert_relative_eq!(positions[2][1], 0.0);
    assert_relative_eq!(positions[2][2], -1.0);
    assert!(positions.iter().all(|p| p[1] >= 0.0 && p[2] <= 0.0));
}
