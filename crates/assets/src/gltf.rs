//! glTF 2.0 import: JSON documents and the GLB binary container.
//!
//! Only what the scene needs is decoded: the node hierarchy, triangle
//! primitives (positions, normals, indices) and metallic-roughness factors.
//! Textures, skins, animations and morph targets are ignored.

use crate::error::AssetLoadFailure;
use crate::scene::{Mesh, ModelNode, ModelScene, Primitive, SurfaceMaterial};
use glam::{Mat4, Quat, Vec3};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

const GLB_MAGIC: &[u8; 4] = b"glTF";
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

const MODE_TRIANGLES: u32 = 4;

const COMPONENT_I8: u32 = 5120;
const COMPONENT_U8: u32 = 5121;
const COMPONENT_I16: u32 = 5122;
const COMPONENT_U16: u32 = 5123;
const COMPONENT_U32: u32 = 5125;
const COMPONENT_F32: u32 = 5126;

/// Largest element an accessor can describe (MAT4 of f32).
static ZEROS: [u8; 64] = [0; 64];

/// Cap on zero-filled accessors, which have no buffer bytes to bound them.
const MAX_ZERO_ELEMENTS: usize = 1 << 20;

/// How the model file was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GltfSource {
    /// `.gltf`: JSON with external buffers.
    Json,
    /// `.glb`: binary container with an embedded BIN chunk.
    Binary,
}

#[derive(Debug, Deserialize)]
struct AssetInfo {
    version: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Document {
    asset: Option<AssetInfo>,
    scene: Option<usize>,
    #[serde(default)]
    scenes: Vec<SceneDef>,
    #[serde(default)]
    nodes: Vec<NodeDef>,
    #[serde(default)]
    meshes: Vec<MeshDef>,
    #[serde(default)]
    materials: Vec<MaterialDef>,
    #[serde(default)]
    accessors: Vec<AccessorDef>,
    #[serde(default)]
    buffer_views: Vec<BufferViewDef>,
    #[serde(default)]
    pub(crate) buffers: Vec<BufferDef>,
}

#[derive(Debug, Deserialize)]
struct SceneDef {
    #[serde(default)]
    nodes: Vec<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct NodeDef {
    name: Option<String>,
    mesh: Option<usize>,
    #[serde(default)]
    children: Vec<usize>,
    matrix: Option<[f32; 16]>,
    translation: Option<[f32; 3]>,
    rotation: Option<[f32; 4]>,
    scale: Option<[f32; 3]>,
}

#[derive(Debug, Deserialize)]
struct MeshDef {
    name: Option<String>,
    primitives: Vec<PrimitiveDef>,
}

#[derive(Debug, Deserialize)]
struct PrimitiveDef {
    attributes: BTreeMap<String, usize>,
    indices: Option<usize>,
    material: Option<usize>,
    mode: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MaterialDef {
    name: Option<String>,
    pbr_metallic_roughness: Option<PbrDef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PbrDef {
    base_color_factor: Option<[f32; 4]>,
    metallic_factor: Option<f32>,
    roughness_factor: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessorDef {
    buffer_view: Option<usize>,
    #[serde(default)]
    byte_offset: usize,
    component_type: u32,
    count: usize,
    #[serde(rename = "type")]
    kind: String,
    sparse: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BufferViewDef {
    buffer: usize,
    #[serde(default)]
    byte_offset: usize,
    byte_length: usize,
    byte_stride: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BufferDef {
    pub(crate) uri: Option<String>,
    pub(crate) byte_length: usize,
}

/// A parsed model file before its buffers are resolved.
#[derive(Debug)]
pub struct Container {
    pub source: GltfSource,
    pub(crate) document: Document,
    /// BIN chunk of a GLB file.
    pub(crate) bin: Option<Vec<u8>>,
}

impl Container {
    pub fn buffer_count(&self) -> usize {
        self.document.buffers.len()
    }
}

/// Parse either a GLB container or a plain glTF JSON document.
pub fn parse_container(bytes: &[u8]) -> Result<Container, AssetLoadFailure> {
    let (source, json, bin) = if bytes.starts_with(GLB_MAGIC) {
        let (json, bin) = split_glb(bytes)?;
        (GltfSource::Binary, json, bin)
    } else {
        (GltfSource::Json, bytes, None)
    };

    let document: Document = serde_json::from_slice(json)?;
    if let Some(asset) = &document.asset {
        if !asset.version.starts_with('2') {
            return Err(AssetLoadFailure::Unsupported(format!(
                "glTF version {}",
                asset.version
            )));
        }
    }

    Ok(Container {
        source,
        document,
        bin: bin.map(<[u8]>::to_vec),
    })
}

fn read_u32(bytes: &[u8], at: usize) -> Result<u32, AssetLoadFailure> {
    bytes
        .get(at..at + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| AssetLoadFailure::format(format!("GLB truncated at byte {at}")))
}

fn split_glb(bytes: &[u8]) -> Result<(&[u8], Option<&[u8]>), AssetLoadFailure> {
    let version = read_u32(bytes, 4)?;
    if version != 2 {
        return Err(AssetLoadFailure::Unsupported(format!(
            "GLB container version {version}"
        )));
    }
    let length = read_u32(bytes, 8)? as usize;
    if length > bytes.len() {
        return Err(AssetLoadFailure::format(format!(
            "GLB header claims {length} bytes, file has {}",
            bytes.len()
        )));
    }

    let mut json = None;
    let mut bin = None;
    let mut offset = 12;
    while offset + 8 <= length {
        let chunk_len = read_u32(bytes, offset)? as usize;
        let chunk_type = read_u32(bytes, offset + 4)?;
        let start = offset + 8;
        let data = bytes
            .get(start..start + chunk_len)
            .filter(|_| start + chunk_len <= length)
            .ok_or_else(|| AssetLoadFailure::format("GLB chunk runs past end of file"))?;
        match chunk_type {
            CHUNK_JSON if json.is_none() => json = Some(data),
            CHUNK_BIN if bin.is_none() => bin = Some(data),
            other => tracing::trace!(chunk_type = other, "skipping GLB chunk"),
        }
        offset = start + chunk_len.next_multiple_of(4);
    }

    let json = json.ok_or_else(|| AssetLoadFailure::format("GLB has no JSON chunk"))?;
    Ok((json, bin))
}

fn component_size(component_type: u32) -> Result<usize, AssetLoadFailure> {
    match component_type {
        COMPONENT_I8 | COMPONENT_U8 => Ok(1),
        COMPONENT_I16 | COMPONENT_U16 => Ok(2),
        COMPONENT_U32 | COMPONENT_F32 => Ok(4),
        other => Err(AssetLoadFailure::format(format!(
            "unknown accessor component type {other}"
        ))),
    }
}

fn component_count(kind: &str) -> Result<usize, AssetLoadFailure> {
    match kind {
        "SCALAR" => Ok(1),
        "VEC2" => Ok(2),
        "VEC3" => Ok(3),
        "VEC4" | "MAT2" => Ok(4),
        "MAT3" => Ok(9),
        "MAT4" => Ok(16),
        other => Err(AssetLoadFailure::format(format!(
            "unknown accessor type {other:?}"
        ))),
    }
}

/// Import a document whose buffers have already been loaded.
pub(crate) struct Importer<'a> {
    doc: &'a Document,
    buffers: &'a [Vec<u8>],
}

impl<'a> Importer<'a> {
    pub(crate) fn new(doc: &'a Document, buffers: &'a [Vec<u8>]) -> Self {
        Self { doc, buffers }
    }

    pub(crate) fn build_scene(&self, name: &str) -> Result<ModelScene, AssetLoadFailure> {
        let root_indices = self.root_nodes()?;
        let mut roots = Vec::with_capacity(root_indices.len());
        let mut stack = Vec::new();
        for index in root_indices {
            roots.push(self.build_node(index, &mut stack)?);
        }
        Ok(ModelScene {
            name: name.to_string(),
            roots,
        })
    }

    fn root_nodes(&self) -> Result<Vec<usize>, AssetLoadFailure> {
        if !self.doc.scenes.is_empty() {
            let index = self.doc.scene.unwrap_or(0);
            let scene = self
                .doc
                .scenes
                .get(index)
                .ok_or_else(|| AssetLoadFailure::format(format!("scene {index} missing")))?;
            return Ok(scene.nodes.clone());
        }
        // No scene list: every node that is nobody's child is a root.
        let children: HashSet<usize> = self
            .doc
            .nodes
            .iter()
            .flat_map(|n| n.children.iter().copied())
            .collect();
        Ok((0..self.doc.nodes.len())
            .filter(|i| !children.contains(i))
            .collect())
    }

    fn build_node(
        &self,
        index: usize,
        stack: &mut Vec<usize>,
    ) -> Result<ModelNode, AssetLoadFailure> {
        if stack.contains(&index) {
            return Err(AssetLoadFailure::format(format!(
                "node {index} is its own ancestor"
            )));
        }
        let def = self
            .doc
            .nodes
            .get(index)
            .ok_or_else(|| AssetLoadFailure::format(format!("node {index} missing")))?;

        stack.push(index);
        let mut children = Vec::with_capacity(def.children.len());
        for &child in &def.children {
            children.push(self.build_node(child, stack)?);
        }
        stack.pop();

        let mesh = def.mesh.map(|m| self.build_mesh(m)).transpose()?;
        Ok(ModelNode {
            name: def.name.clone().unwrap_or_else(|| format!("node_{index}")),
            local: node_transform(def),
            mesh,
            children,
        })
    }

    fn build_mesh(&self, index: usize) -> Result<Mesh, AssetLoadFailure> {
        let def = self
            .doc
            .meshes
            .get(index)
            .ok_or_else(|| AssetLoadFailure::format(format!("mesh {index} missing")))?;

        let mut primitives = Vec::with_capacity(def.primitives.len());
        for (i, prim) in def.primitives.iter().enumerate() {
            let mode = prim.mode.unwrap_or(MODE_TRIANGLES);
            if mode != MODE_TRIANGLES {
                tracing::warn!(mesh = index, primitive = i, mode, "skipping non-triangle primitive");
                continue;
            }
            primitives.push(self.build_primitive(prim)?);
        }

        Ok(Mesh {
            name: def.name.clone().unwrap_or_else(|| format!("mesh_{index}")),
            primitives,
            cast_shadow: false,
            receive_shadow: false,
        })
    }

    fn build_primitive(&self, def: &PrimitiveDef) -> Result<Primitive, AssetLoadFailure> {
        let position = *def
            .attributes
            .get("POSITION")
            .ok_or_else(|| AssetLoadFailure::format("primitive has no POSITION attribute"))?;
        let positions = self.read_vec3(position)?;

        let indices = match def.indices {
            Some(accessor) => self.read_indices(accessor)?,
            None => (0..positions.len() as u32).collect(),
        };
        if indices.len() % 3 != 0 {
            return Err(AssetLoadFailure::format(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(AssetLoadFailure::format(format!(
                "index {bad} out of range for {} vertices",
                positions.len()
            )));
        }

        let normals = match def.attributes.get("NORMAL") {
            Some(&accessor) => {
                let normals = self.read_vec3(accessor)?;
                if normals.len() != positions.len() {
                    return Err(AssetLoadFailure::format("NORMAL and POSITION counts differ"));
                }
                normals
            }
            None => smooth_normals(&positions, &indices),
        };

        Ok(Primitive {
            positions,
            normals,
            indices,
            material: self.material(def.material)?,
        })
    }

    fn material(&self, index: Option<usize>) -> Result<SurfaceMaterial, AssetLoadFailure> {
        let Some(index) = index else {
            return Ok(SurfaceMaterial::default());
        };
        let def = self
            .doc
            .materials
            .get(index)
            .ok_or_else(|| AssetLoadFailure::format(format!("material {index} missing")))?;
        let defaults = SurfaceMaterial::default();
        let pbr = def.pbr_metallic_roughness.as_ref();
        Ok(SurfaceMaterial {
            name: def
                .name
                .clone()
                .unwrap_or_else(|| format!("material_{index}")),
            base_color: pbr
                .and_then(|p| p.base_color_factor)
                .unwrap_or(defaults.base_color),
            metalness: pbr
                .and_then(|p| p.metallic_factor)
                .unwrap_or(defaults.metalness),
            roughness: pbr
                .and_then(|p| p.roughness_factor)
                .unwrap_or(defaults.roughness),
            ..defaults
        })
    }

    /// Raw bytes of each element of an accessor.
    fn elements(
        &self,
        index: usize,
        kind: &str,
        allowed: &[u32],
    ) -> Result<(u32, Vec<&'a [u8]>), AssetLoadFailure> {
        let acc = self
            .doc
            .accessors
            .get(index)
            .ok_or_else(|| AssetLoadFailure::format(format!("accessor {index} missing")))?;
        if acc.sparse.is_some() {
            return Err(AssetLoadFailure::Unsupported("sparse accessors".into()));
        }
        if acc.kind != kind || !allowed.contains(&acc.component_type) {
            return Err(AssetLoadFailure::format(format!(
                "accessor {index} is {} of {}, expected {kind}",
                acc.kind, acc.component_type
            )));
        }

        let elem = component_size(acc.component_type)? * component_count(&acc.kind)?;
        let Some(view_index) = acc.buffer_view else {
            // Accessors without a view read as zeros.
            if acc.count > MAX_ZERO_ELEMENTS {
                return Err(AssetLoadFailure::format(format!(
                    "accessor {index} has {} zero elements, limit is {MAX_ZERO_ELEMENTS}",
                    acc.count
                )));
            }
            return Ok((acc.component_type, vec![&ZEROS[..elem]; acc.count]));
        };

        let view = self
            .doc
            .buffer_views
            .get(view_index)
            .ok_or_else(|| AssetLoadFailure::format(format!("buffer view {view_index} missing")))?;
        let buffer = self.buffers.get(view.buffer).ok_or_else(|| {
            AssetLoadFailure::format(format!("buffer {} not loaded", view.buffer))
        })?;
        let past_view = || {
            AssetLoadFailure::format(format!(
                "buffer view {view_index} runs past buffer {}",
                view.buffer
            ))
        };
        let view_end = view
            .byte_offset
            .checked_add(view.byte_length)
            .filter(|&end| end <= buffer.len())
            .ok_or_else(past_view)?;

        let stride = view.byte_stride.unwrap_or(elem);
        if stride < elem {
            return Err(AssetLoadFailure::format(format!(
                "buffer view {view_index} stride {stride} is smaller than element size {elem}"
            )));
        }
        let past_accessor = || {
            AssetLoadFailure::format(format!(
                "accessor {index} runs past buffer view {view_index}"
            ))
        };
        let start = view
            .byte_offset
            .checked_add(acc.byte_offset)
            .ok_or_else(past_accessor)?;
        if let Some(last) = acc.count.checked_sub(1) {
            // Last element must end inside the view.
            last.checked_mul(stride)
                .and_then(|span| span.checked_add(start))
                .and_then(|at| at.checked_add(elem))
                .filter(|&end| end <= view_end)
                .ok_or_else(past_accessor)?;
        }

        let out = (0..acc.count)
            .map(move |i| {
                let at = start + i * stride;
                &buffer[at..at + elem]
            })
            .collect();
        Ok((acc.component_type, out))
    }

    fn read_vec3(&self, index: usize) -> Result<Vec<[f32; 3]>, AssetLoadFailure> {
        let (_, elements) = self.elements(index, "VEC3", &[COMPONENT_F32])?;
        Ok(elements
            .into_iter()
            .map(|e| {
                let f = |i: usize| f32::from_le_bytes([e[i], e[i + 1], e[i + 2], e[i + 3]]);
                [f(0), f(4), f(8)]
            })
            .collect())
    }

    fn read_indices(&self, index: usize) -> Result<Vec<u32>, AssetLoadFailure> {
        let (component, elements) = self.elements(
            index,
            "SCALAR",
            &[COMPONENT_U8, COMPONENT_U16, COMPONENT_U32],
        )?;
        Ok(elements
            .into_iter()
            .map(|e| match component {
                COMPONENT_U8 => e[0] as u32,
                COMPONENT_U16 => u16::from_le_bytes([e[0], e[1]]) as u32,
                _ => u32::from_le_bytes([e[0], e[1], e[2], e[3]]),
            })
            .collect())
    }
}

fn node_transform(def: &NodeDef) -> Mat4 {
    if let Some(m) = def.matrix {
        return Mat4::from_cols_array(&m);
    }
    let t = def.translation.map(Vec3::from_array).unwrap_or(Vec3::ZERO);
    let r = def
        .rotation
        .map(|q| Quat::from_array(q).normalize())
        .unwrap_or(Quat::IDENTITY);
    let s = def.scale.map(Vec3::from_array).unwrap_or(Vec3::ONE);
    Mat4::from_scale_rotation_translation(s, r, t)
}

/// Area-weighted vertex normals for primitives that ship without them.
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let pa = Vec3::from_array(positions[a]);
        let face = (Vec3::from_array(positions[b]) - pa).cross(Vec3::from_array(positions[c]) - pa);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    acc.into_iter()
        .map(|n| n.normalize_or(Vec3::Y).to_array())
        .collect()
}
