use glam::DVec3;
use openscad_mesh::{Color, Mesh, MeshColors};
use openscad_off::{parse_off, write_off};

fn assert_same_mesh(original: &Mesh, parsed: &Mesh) {
    assert_eq!(parsed.vertex_count(), original.vertex_count());
    for (a, b) in original.vertices().iter().zip(parsed.vertices()) {
        assert!((*a - *b).abs().max_element() < 1e-12, "{a:?} != {b:?}");
    }
    assert_eq!(parsed.faces(), original.faces());
    assert_eq!(parsed.color_count(), original.color_count());
    assert_eq!(parsed.colors().binding(), original.colors().binding());
}

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

#[test]
fn uncolored_cube_round_trips() {
    let cube = unit_cube(MeshColors::None);
    let parsed = parse_off(&write_off(&cube)).unwrap();
    assert_same_mesh(&cube, &parsed);
    assert_eq!(parsed, cube);
}

#[test]
fn face_colored_cube_round_trips() {
    let palette = [
        Color::rgb(1.0, 0.0, 0.0),
        Color::rgb(0.0, 1.0, 0.0),
        Color::rgb(0.0, 0.0, 1.0),
        Color::rgba(1.0, 1.0, 0.0, 0.5),
        Color::rgb(0.2, 0.4, 0.6),
        Color::rgb(0.0, 0.0, 0.0),
    ];
    let cube = unit_cube(MeshColors::PerFace(palette.to_vec()));
    let parsed = parse_off(&write_off(&cube)).unwrap();
    assert_same_mesh(&cube, &parsed);
    for (face, expected) in palette.iter().enumerate() {
        let got = parsed.face_color(face).unwrap();
        assert!((got.r - expected.r).abs() < 1e-6);
        assert!((got.a - expected.a).abs() < 1e-6);
    }
}

#[test]
fn vertex_colored_mesh_round_trips() {
    let colors = (0..8)
        .map(|i| Color::rgb(i as f32 / 8.0, 0.5, 1.0))
        .collect();
    let cube = unit_cube(MeshColors::PerVertex(colors));
    let parsed = parse_off(&write_off(&cube)).unwrap();
    assert_same_mesh(&cube, &parsed);
}

#[test]
fn awkward_coordinates_round_trip() {
    let mesh = Mesh::new(
        vec![
            DVec3::new(0.1, -1e-9, 123456.789),
            DVec3::new(-0.30000000000000004, 2.5e10, 1.0 / 3.0),
            DVec3::new(f64::MIN_POSITIVE, -7.0, 0.0),
        ],
        vec![vec![0, 1, 2], vec![2, 1, 0]],
        MeshColors::None,
    )
    .unwrap();
    let parsed = parse_off(&write_off(&mesh)).unwrap();
    assert_eq!(parsed.vertices(), mesh.vertices());
}

#[test]
fn openscad_style_output_parses() {
    // shape of a file written by `openscad -o cube.off` for color("red") cube(10)
    let text = "OFF 8 6 0\n\
        0 0 0\n10 0 0\n10 10 0\n0 10 0\n0 0 10\n10 0 10\n10 10 10\n0 10 10\n\
        4 0 3 2 1 255 0 0 255\n\
        4 4 5 6 7 255 0 0 255\n\
        4 0 1 5 4 255 0 0 255\n\
        4 1 2 6 5 255 0 0 255\n\
        4 2 3 7 6 255 0 0 255\n\
        4 3 0 4 7 255 0 0 255\n";
    let mesh = parse_off(text).unwrap();
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.face_count(), 6);
    assert_eq!(mesh.color_count(), 6);
    assert_eq!(mesh.face_color(3), Some(Color::rgb(1.0, 0.0, 0.0)));
}
