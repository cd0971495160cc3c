use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use silverscene_assets::ModelScene;

/// Interleaved vertex with its material baked in, so one model is a single
/// draw call regardless of how many primitives it had.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub base_color: [f32; 4],
    /// metalness, roughness, env map intensity, unused.
    pub surface: [f32; 4],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4, 3 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// A model scene flattened into model-space vertices.
#[derive(Debug, Default)]
pub(crate) struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Bake node transforms into vertex positions and normals.
    pub fn from_scene(scene: &ModelScene) -> Self {
        let mut out = MeshData::default();
        for (world, prim) in scene.primitives() {
            let normal_matrix = world.inverse().transpose();
            let base = out.vertices.len() as u32;
            let m = &prim.material;
            for (i, p) in prim.positions.iter().enumerate() {
                let n = prim.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]);
                out.vertices.push(Vertex {
                    position: world.transform_point3(Vec3::from_array(*p)).to_array(),
                    normal: normal_matrix
                        .transform_vector3(Vec3::from_array(n))
                        .normalize_or(Vec3::Y)
                        .to_array(),
                    base_color: m.base_color,
                    surface: [m.metalness, m.roughness, m.env_map_intensity, 0.0],
                });
            }
            out.indices.extend(prim.indices.iter().map(|i| base + i));
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use silverscene_assets::{Mesh, ModelNode, Primitive, SurfaceMaterial};
    use silverscene_render::{MaterialSettings, Paintable};

    fn quad_scene() -> ModelScene {
        let tri = |offset: f32| Primitive {
            positions: vec![[offset, 0.0, 0.0], [offset + 1.0, 0.0, 0.0], [offset, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            indices: vec![0, 1, 2],
            material: SurfaceMaterial::default(),
        };
        ModelScene {
            name: "quad".into(),
            roots: vec![ModelNode {
                name: "root".into(),
                local: Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)),
                mesh: Some(Mesh {
                    name: "m".into(),
                    primitives: vec![tri(0.0), tri(5.0)],
                    cast_shadow: false,
                    receive_shadow: false,
                }),
                children: vec![],
            }],
        }
    }

    #[test]
    fn indices_are_rebased_per_primitive() {
        let data = MeshData::from_scene(&quad_scene());
        assert_eq!(data.vertices.len(), 6);
        assert_eq!(data.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(data.vertices[0].position, [0.0, 2.0, 0.0]);
        assert_eq!(data.vertices[3].position, [5.0, 2.0, 0.0]);
    }

    #[test]
    fn painted_material_is_baked() {
        let mut scene = quad_scene();
        scene.apply_material(&MaterialSettings::silver());
        let data = MeshData::from_scene(&scene);
        for v in &data.vertices {
            assert_eq!(v.surface, [1.0, 0.05, 4.0, 0.0]);
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn empty_scene() {
        assert!(MeshData::from_scene(&ModelScene::default()).is_empty());
    }
}
