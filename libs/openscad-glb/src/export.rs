//! GLB export of polygon meshes.

use std::collections::BTreeMap;

use config::constants::{DEFAULT_BASE_COLOR, GLB_GENERATOR};
use openscad_mesh::Mesh;
use tracing::debug;

use crate::buffers::GeometryBuffers;
use crate::container::{align4, write_glb};
use crate::document::{
    Accessor, Asset, Buffer, BufferView, Document, Material, MeshDef, Node, PbrMetallicRoughness,
    Primitive, Scene, ARRAY_BUFFER, COLOR_0, ELEMENT_ARRAY_BUFFER, FLOAT, POSITION, TRIANGLES,
    UNSIGNED_BYTE, UNSIGNED_INT, UNSIGNED_SHORT,
};
use crate::error::{ExportError, ExportResult};

const ROUGHNESS: f32 = 0.8;

/// Encodes a mesh as a self-contained GLB file.
///
/// Polygons are fan-triangulated. Per-face colors become per-vertex
/// `COLOR_0` values; without colors the primitive uses a plain material in
/// OpenSCAD's default face color.
///
/// # Errors
///
/// [`ExportError::EmptyMesh`] for a mesh without vertices or faces, plus the
/// buffer errors of [`GeometryBuffers::from_mesh`].
///
/// # Examples
/// ```
/// use glam::DVec3;
/// use openscad_glb::{export_glb, inspect};
/// use openscad_mesh::{Mesh, MeshColors};
///
/// let tri = Mesh::new(
///     vec![DVec3::ZERO, DVec3::X, DVec3::Y],
///     vec![vec![0, 1, 2]],
///     MeshColors::None,
/// )
/// .unwrap();
/// let glb = export_glb(&tri).unwrap();
/// let summary = inspect(&glb).unwrap();
/// assert_eq!(summary.vertex_count, 3);
/// assert_eq!(summary.triangle_count, 1);
/// ```
pub fn export_glb(mesh: &Mesh) -> ExportResult<Vec<u8>> {
    let buffers = GeometryBuffers::from_mesh(mesh)?;
    let (document, bin) = build_document(&buffers)?;
    let json = serde_json::to_vec(&document)?;
    let glb = write_glb(&json, &bin)?;

    debug!(
        vertices = buffers.vertex_count(),
        triangles = buffers.triangle_count(),
        colored = buffers.colors.is_some(),
        json_bytes = json.len(),
        bin_bytes = bin.len(),
        "encoded GLB"
    );
    Ok(glb)
}

/// Smallest index component type able to address `vertex_count` vertices.
///
/// The largest value of each type is reserved (primitive restart), so a
/// type is only chosen when every index stays strictly below its maximum.
pub fn index_component_type(vertex_count: usize) -> u32 {
    if vertex_count <= u8::MAX as usize {
        UNSIGNED_BYTE
    } else if vertex_count <= u16::MAX as usize {
        UNSIGNED_SHORT
    } else {
        UNSIGNED_INT
    }
}

/// Appends `data` to `bin` at a 4-byte aligned offset and records the view.
fn push_view(
    bin: &mut Vec<u8>,
    views: &mut Vec<BufferView>,
    data: &[u8],
    target: u32,
) -> ExportResult<u32> {
    bin.resize(align4(bin.len()), 0);
    let byte_offset = byte_size(bin.len())?;
    bin.extend_from_slice(data);
    views.push(BufferView {
        buffer: 0,
        byte_offset,
        byte_length: byte_size(data.len())?,
        target: Some(target),
    });
    to_u32(views.len() - 1)
}

fn to_u32(value: usize) -> ExportResult<u32> {
    u32::try_from(value).map_err(|_| ExportError::TooManyVertices { count: value })
}

/// Byte offsets and lengths in the binary chunk.
fn byte_size(bytes: usize) -> ExportResult<u32> {
    u32::try_from(bytes).map_err(|_| ExportError::BufferTooLarge { bytes })
}

fn build_document(buffers: &GeometryBuffers) -> ExportResult<(Document, Vec<u8>)> {
    let vertex_count = to_u32(buffers.vertex_count())?;
    let mut bin = Vec::new();
    let mut views = Vec::new();
    let mut accessors = Vec::new();
    let mut attributes = BTreeMap::new();

    let positions: Vec<u8> = buffers
        .positions
        .iter()
        .flatten()
        .flat_map(|c| c.to_le_bytes())
        .collect();
    let view = push_view(&mut bin, &mut views, &positions, ARRAY_BUFFER)?;
    let (min, max) = buffers.position_bounds();
    attributes.insert(POSITION.to_string(), to_u32(accessors.len())?);
    accessors.push(Accessor {
        buffer_view: view,
        byte_offset: 0,
        component_type: FLOAT,
        count: vertex_count,
        kind: "VEC3".to_string(),
        min: Some(min.to_vec()),
        max: Some(max.to_vec()),
    });

    if let Some(colors) = &buffers.colors {
        let bytes: Vec<u8> = colors
            .iter()
            .flatten()
            .flat_map(|c| c.to_le_bytes())
            .collect();
        let view = push_view(&mut bin, &mut views, &bytes, ARRAY_BUFFER)?;
        attributes.insert(COLOR_0.to_string(), to_u32(accessors.len())?);
        accessors.push(Accessor {
            buffer_view: view,
            byte_offset: 0,
            component_type: FLOAT,
            count: vertex_count,
            kind: "VEC4".to_string(),
            min: None,
            max: None,
        });
    }

    let component_type = index_component_type(buffers.vertex_count());
    let index_bytes: Vec<u8> = match component_type {
        // narrowing is lossless: the type was chosen from the vertex count
        UNSIGNED_BYTE => buffers.indices.iter().map(|&i| i as u8).collect(),
        UNSIGNED_SHORT => buffers
            .indices
            .iter()
            .flat_map(|&i| (i as u16).to_le_bytes())
            .collect(),
        _ => buffers.indices.iter().flat_map(|i| i.to_le_bytes()).collect(),
    };
    let view = push_view(&mut bin, &mut views, &index_bytes, ELEMENT_ARRAY_BUFFER)?;
    let indices_accessor = to_u32(accessors.len())?;
    accessors.push(Accessor {
        buffer_view: view,
        byte_offset: 0,
        component_type,
        count: to_u32(buffers.indices.len())?,
        kind: "SCALAR".to_string(),
        min: None,
        max: None,
    });

    bin.resize(align4(bin.len()), 0);

    let document = Document {
        asset: Asset {
            version: "2.0".to_string(),
            generator: Some(GLB_GENERATOR.to_string()),
        },
        scene: Some(0),
        scenes: vec![Scene { nodes: vec![0] }],
        nodes: vec![Node {
            mesh: Some(0),
            name: Some("model".to_string()),
        }],
        meshes: vec![MeshDef {
            primitives: vec![Primitive {
                attributes,
                indices: Some(indices_accessor),
                material: Some(0),
                mode: Some(TRIANGLES),
            }],
            name: Some("model".to_string()),
        }],
        materials: vec![material_for(buffers)],
        accessors,
        buffer_views: views,
        buffers: vec![Buffer {
            byte_length: byte_size(bin.len())?,
        }],
    };

    Ok((document, bin))
}

/// Vertex colors multiply the base color, so colored meshes get white.
fn material_for(buffers: &GeometryBuffers) -> Material {
    let (name, base_color_factor) = match buffers.colors {
        Some(_) => ("vertex-color", [1.0, 1.0, 1.0, 1.0]),
        None => ("default", DEFAULT_BASE_COLOR),
    };
    Material {
        name: Some(name.to_string()),
        pbr_metallic_roughness: Some(PbrMetallicRoughness {
            base_color_factor,
            metallic_factor: 0.0,
            roughness_factor: ROUGHNESS,
        }),
        alpha_mode: buffers.has_translucency().then(|| "BLEND".to_string()),
        double_sided: false,
    }
}
