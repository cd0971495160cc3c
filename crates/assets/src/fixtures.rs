//! Tiny glTF and HDR files built in memory for tests.

pub const TRIANGLE_POSITIONS: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

/// Positions (36 bytes) followed by u16 indices (6 bytes + 2 padding).
pub fn triangle_bin() -> Vec<u8> {
    let mut bin = Vec::new();
    for p in TRIANGLE_POSITIONS {
        for c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin.extend_from_slice(&[0, 0]);
    bin
}

/// One triangle under a translated root node. `uri` names the external
/// buffer; `None` means the buffer lives in a GLB BIN chunk.
pub fn triangle_json(uri: Option<&str>) -> String {
    let buffer = match uri {
        Some(uri) => format!(r#"{{"uri": "{uri}", "byteLength": 44}}"#),
        None => r#"{"byteLength": 44}"#.to_string(),
    };
    format!(
        r#"{{
  "asset": {{"version": "2.0"}},
  "scene": 0,
  "scenes": [{{"nodes": [0]}}],
  "nodes": [
    {{"name": "root", "children": [1], "translation": [0.0, 1.0, 0.0]}},
    {{"name": "blade", "mesh": 0}}
  ],
  "meshes": [
    {{"name": "tri", "primitives": [{{"attributes": {{"POSITION": 0}}, "indices": 1, "material": 0}}]}}
  ],
  "materials": [
    {{"name": "steel", "pbrMetallicRoughness": {{"baseColorFactor": [0.5, 0.5, 0.5, 1.0], "metallicFactor": 0.2, "roughnessFactor": 0.7}}}}
  ],
  "accessors": [
    {{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"}},
    {{"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}}
  ],
  "bufferViews": [
    {{"buffer": 0, "byteOffset": 0, "byteLength": 36}},
    {{"buffer": 0, "byteOffset": 36, "byteLength": 6}}
  ],
  "buffers": [{buffer}]
}}"#
    )
}

/// The triangle packed as a GLB container.
pub fn triangle_glb() -> Vec<u8> {
    let mut json = triangle_json(None).into_bytes();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let bin = triangle_bin();

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&0x4E4F_534Au32.to_le_bytes());
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(&0x004E_4942u32.to_le_bytes());
    out.extend_from_slice(&bin);
    out
}

/// A 2x1 Radiance HDR image: one texel of 1.0 grey, one black.
pub fn tiny_hdr() -> Vec<u8> {
    let mut out = b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y 1 +X 2\n".to_vec();
    out.extend_from_slice(&[128, 128, 128, 129]);
    out.extend_from_slice(&[0, 0, 0, 0]);
    out
}
