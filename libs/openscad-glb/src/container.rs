//! # GLB Container
//!
//! Framing of the glTF binary container:
//!
//! ```text
//! header  magic "glTF" | version 2 | total length        (3 x u32 LE)
//! chunk 0 length | "JSON" | JSON text padded with 0x20
//! chunk 1 length | "BIN\0" | payload padded with 0x00    (optional)
//! ```
//!
//! Every chunk length is a multiple of four bytes.

use crate::error::{ExportError, ExportResult};

/// `"glTF"` read as a little-endian `u32`.
pub const GLB_MAGIC: u32 = 0x4654_6C67;
/// Container version written and accepted.
pub const GLB_VERSION: u32 = 2;
/// Chunk type of the JSON chunk (`"JSON"`).
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
/// Chunk type of the binary chunk (`"BIN\0"`).
pub const CHUNK_BIN: u32 = 0x004E_4942;

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// Rounds `len` up to the next multiple of four.
#[inline]
pub fn align4(len: usize) -> usize {
    (len + 3) & !3
}

/// Frames a JSON scene description and a binary payload as a GLB file.
///
/// An empty `bin` omits the binary chunk.
///
/// # Errors
///
/// [`ExportError::InvalidContainer`] if the result would exceed 4 GiB.
///
/// # Examples
/// ```
/// use openscad_glb::container::{write_glb, read_glb};
///
/// let glb = write_glb(br#"{"asset":{"version":"2.0"}}"#, &[1, 2, 3]).unwrap();
/// assert_eq!(glb.len() % 4, 0);
/// let chunks = read_glb(&glb).unwrap();
/// assert_eq!(&chunks.bin.unwrap()[..3], &[1, 2, 3]);
/// ```
pub fn write_glb(json: &[u8], bin: &[u8]) -> ExportResult<Vec<u8>> {
    let json_len = align4(json.len());
    let bin_len = align4(bin.len());
    let mut total = HEADER_LEN + CHUNK_HEADER_LEN + json_len;
    if !bin.is_empty() {
        total += CHUNK_HEADER_LEN + bin_len;
    }
    let total_u32 = u32::try_from(total)
        .map_err(|_| ExportError::invalid(format!("{total} bytes exceed the 4 GiB limit")))?;

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&total_u32.to_le_bytes());

    // both lengths are bounded by total_u32
    out.extend_from_slice(&(json_len as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(json);
    out.resize(out.len() + json_len - json.len(), b' ');

    if !bin.is_empty() {
        out.extend_from_slice(&(bin_len as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(bin);
        out.resize(out.len() + bin_len - bin.len(), 0);
    }

    debug_assert_eq!(out.len(), total);
    Ok(out)
}

/// Chunks of a parsed GLB file, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlbChunks<'a> {
    /// Total length declared in the header.
    pub total_length: usize,
    /// JSON chunk payload, including trailing space padding.
    pub json: &'a [u8],
    /// Binary chunk payload, including trailing zero padding.
    pub bin: Option<&'a [u8]>,
}

fn read_u32(bytes: &[u8], offset: usize) -> ExportResult<u32> {
    bytes
        .get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| ExportError::invalid(format!("truncated at byte {offset}")))
}

/// Splits a GLB file into its JSON and binary chunks, validating framing.
///
/// # Errors
///
/// [`ExportError::InvalidContainer`] for a bad magic, version, length,
/// chunk type or chunk alignment.
pub fn read_glb(bytes: &[u8]) -> ExportResult<GlbChunks<'_>> {
    if read_u32(bytes, 0)? != GLB_MAGIC {
        return Err(ExportError::invalid("missing glTF magic"));
    }
    let version = read_u32(bytes, 4)?;
    if version != GLB_VERSION {
        return Err(ExportError::invalid(format!("unsupported version {version}")));
    }
    let total_length = read_u32(bytes, 8)? as usize;
    if total_length != bytes.len() {
        return Err(ExportError::invalid(format!(
            "header declares {total_length} bytes, found {}",
            bytes.len()
        )));
    }

    let mut offset = HEADER_LEN;
    let mut json = None;
    let mut bin = None;
    while offset < total_length {
        let chunk_len = read_u32(bytes, offset)? as usize;
        let chunk_type = read_u32(bytes, offset + 4)?;
        if chunk_len % 4 != 0 {
            return Err(ExportError::invalid(format!(
                "chunk at byte {offset} is not 4-byte aligned"
            )));
        }
        let start = offset + CHUNK_HEADER_LEN;
        let data = bytes
            .get(start..start + chunk_len)
            .ok_or_else(|| ExportError::invalid(format!("chunk at byte {offset} overruns file")))?;

        match (chunk_type, json.is_some()) {
            (CHUNK_JSON, false) => json = Some(data),
            (CHUNK_BIN, true) if bin.is_none() => bin = Some(data),
            (CHUNK_JSON, true) | (CHUNK_BIN, _) => {
                return Err(ExportError::invalid(format!(
                    "unexpected chunk {chunk_type:#010x} at byte {offset}"
                )));
            }
            // unknown chunk types must be skipped
            _ => {}
        }
        offset = start + chunk_len;
    }

    let json = json.ok_or_else(|| ExportError::invalid("missing JSON chunk"))?;
    Ok(GlbChunks {
        total_length,
        json,
        bin,
    })
}
