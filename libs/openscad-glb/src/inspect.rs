//! Read-back of GLB files: validates framing, decodes the scene description
//! and the index buffer of the first primitive.

use serde::Serialize;

use crate::container::read_glb;
use crate::document::{component_size, Document, COLOR_0, POSITION};
use crate::error::{ExportError, ExportResult};

/// What a GLB file contains, as seen by a conforming reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlbSummary {
    pub total_length: usize,
    pub json_length: usize,
    pub bin_length: usize,
    pub generator: Option<String>,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub has_colors: bool,
    pub index_component_type: Option<u32>,
    /// Largest decoded index, `None` for non-indexed primitives.
    pub max_index: Option<u32>,
}

/// Parses a GLB file and summarizes its first mesh primitive.
///
/// # Errors
///
/// [`ExportError::InvalidContainer`] when the framing is broken, the JSON
/// references missing accessors or views, views overrun the binary chunk,
/// or an index points past the vertex count. [`ExportError::Json`] when the
/// JSON chunk is not a glTF document.
pub fn inspect(bytes: &[u8]) -> ExportResult<GlbSummary> {
    let chunks = read_glb(bytes)?;
    let document: Document = serde_json::from_slice(chunks.json)?;
    let bin = chunks.bin.unwrap_or_default();

    let primitive = document
        .meshes
        .first()
        .and_then(|mesh| mesh.primitives.first())
        .ok_or_else(|| ExportError::invalid("document has no mesh primitive"))?;

    let position = primitive
        .attributes
        .get(POSITION)
        .and_then(|&idx| document.accessors.get(idx as usize))
        .ok_or_else(|| ExportError::invalid("primitive has no POSITION accessor"))?;
    let vertex_count = position.count as usize;

    let (triangle_count, index_component_type, max_index) = match primitive.indices {
        None => (vertex_count / 3, None, None),
        Some(idx) => {
            let accessor = document
                .accessors
                .get(idx as usize)
                .ok_or_else(|| ExportError::invalid(format!("missing accessor {idx}")))?;
            let indices = read_indices(&document, bin, accessor)?;
            let max_index = indices.iter().copied().max();
            if let Some(max) = max_index {
                if max as usize >= vertex_count {
                    return Err(ExportError::invalid(format!(
                        "index {max} out of range for {vertex_count} vertices"
                    )));
                }
            }
            (indices.len() / 3, Some(accessor.component_type), max_index)
        }
    };

    Ok(GlbSummary {
        total_length: chunks.total_length,
        json_length: chunks.json.len(),
        bin_length: bin.len(),
        generator: document.asset.generator.clone(),
        vertex_count,
        triangle_count,
        has_colors: primitive.attributes.contains_key(COLOR_0),
        index_component_type,
        max_index,
    })
}

fn read_indices(
    document: &Document,
    bin: &[u8],
    accessor: &crate::document::Accessor,
) -> ExportResult<Vec<u32>> {
    let size = component_size(accessor.component_type).ok_or_else(|| {
        ExportError::invalid(format!("bad index type {}", accessor.component_type))
    })?;
    let view = document
        .buffer_views
        .get(accessor.buffer_view as usize)
        .ok_or_else(|| ExportError::invalid(format!("missing view {}", accessor.buffer_view)))?;

    let start = view.byte_offset as usize + accessor.byte_offset as usize;
    let len = accessor.count as usize * size;
    let data = bin
        .get(start..start + len)
        .ok_or_else(|| ExportError::invalid("index data overruns the binary chunk"))?;

    Ok(data
        .chunks_exact(size)
        .map(|c| match size {
            1 => u32::from(c[0]),
            2 => u32::from(u16::from_le_bytes([c[0], c[1]])),
            _ => u32::from_le_bytes([c[0], c[1], c[2], c[3]]),
        })
        .collect())
}
