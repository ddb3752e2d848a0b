//! # glTF Scene Description
//!
//! The subset of the glTF 2.0 JSON schema needed to describe one colored,
//! indexed triangle mesh. The same types are used to write and to read back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// ENUM VALUES
// =============================================================================

/// `componentType` of 8-bit unsigned integers.
pub const UNSIGNED_BYTE: u32 = 5121;
/// `componentType` of 16-bit unsigned integers.
pub const UNSIGNED_SHORT: u32 = 5123;
/// `componentType` of 32-bit unsigned integers.
pub const UNSIGNED_INT: u32 = 5125;
/// `componentType` of 32-bit floats.
pub const FLOAT: u32 = 5126;

/// Buffer view target for vertex attributes.
pub const ARRAY_BUFFER: u32 = 34962;
/// Buffer view target for indices.
pub const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Primitive mode for triangle lists.
pub const TRIANGLES: u32 = 4;

/// Attribute name of vertex positions.
pub const POSITION: &str = "POSITION";
/// Attribute name of the first vertex color set.
pub const COLOR_0: &str = "COLOR_0";

/// Size in bytes of one component of the given `componentType`.
pub fn component_size(component_type: u32) -> Option<usize> {
    match component_type {
        UNSIGNED_BYTE => Some(1),
        UNSIGNED_SHORT => Some(2),
        UNSIGNED_INT | FLOAT => Some(4),
        _ => None,
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// Root object of a glTF document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub asset: Asset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenes: Vec<Scene>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meshes: Vec<MeshDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessors: Vec<Accessor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffer_views: Vec<BufferView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffers: Vec<Buffer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub nodes: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshDef {
    pub primitives: Vec<Primitive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub attributes: BTreeMap<String, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_mode: Option<String>,
    #[serde(default)]
    pub double_sided: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    pub base_color_factor: [f32; 4],
    pub metallic_factor: f32,
    pub roughness_factor: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    pub buffer_view: u32,
    #[serde(default)]
    pub byte_offset: u32,
    pub component_type: u32,
    pub count: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    pub buffer: u32,
    #[serde(default)]
    pub byte_offset: u32,
    pub byte_length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    pub byte_length: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessor_uses_gltf_field_names() {
        let accessor = Accessor {
            buffer_view: 1,
            byte_offset: 0,
            component_type: FLOAT,
            count: 8,
            kind: "VEC3".to_string(),
            min: Some(vec![0.0; 3]),
            max: None,
        };
        let json = serde_json::to_value(&accessor).unwrap();
        assert_eq!(json["bufferView"], 1);
        assert_eq!(json["componentType"], FLOAT);
        assert_eq!(json["type"], "VEC3");
        assert!(json.get("max").is_none());
    }

    #[test]
    fn unknown_fields_are_ignored_on_read() {
        let doc: Document = serde_json::from_str(
            r#"{"asset":{"version":"2.0"},"extensionsUsed":["KHR_x"],"buffers":[{"byteLength":4,"uri":"a.bin"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.asset.version, "2.0");
        assert_eq!(doc.buffers[0].byte_length, 4);
        assert!(doc.meshes.is_empty());
    }

    #[test]
    fn component_sizes() {
        assert_eq!(component_size(UNSIGNED_BYTE), Some(1));
        assert_eq!(component_size(UNSIGNED_SHORT), Some(2));
        assert_eq!(component_size(UNSIGNED_INT), Some(4));
        assert_eq!(component_size(0), None);
    }
}
