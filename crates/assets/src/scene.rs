use glam::{Mat4, Vec3};
use silverscene_render::{MaterialSettings, Paintable};

/// Surface parameters of one primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMaterial {
    pub name: String,
    pub base_color: [f32; 4],
    pub metalness: f32,
    pub roughness: f32,
    pub env_map_intensity: f32,
    /// Set whenever parameters change so a backend can re-upload them.
    pub needs_update: bool,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            name: "default".into(),
            base_color: [1.0, 1.0, 1.0, 1.0],
            metalness: 1.0,
            roughness: 1.0,
            env_map_intensity: 1.0,
            needs_update: false,
        }
    }
}

impl SurfaceMaterial {
    /// Overwrite colour and PBR parameters, keeping the source alpha.
    pub fn paint(&mut self, settings: &MaterialSettings) {
        let [r, g, b] = settings.color.to_f32();
        self.base_color = [r, g, b, self.base_color[3]];
        self.roughness = settings.roughness;
        self.metalness = settings.metalness;
        self.env_map_intensity = settings.env_map_intensity;
        self.needs_update = true;
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub material: SurfaceMaterial,
}

impl Primitive {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub primitives: Vec<Primitive>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

/// A node in an imported scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    pub name: String,
    /// Transform relative to the parent node.
    pub local: Mat4,
    pub mesh: Option<Mesh>,
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    /// Depth-first visit with the accumulated world transform.
    pub fn walk<'a>(&'a self, parent: Mat4, visit: &mut impl FnMut(&'a ModelNode, Mat4)) {
        let world = parent * self.local;
        visit(self, world);
        for child in &self.children {
            child.walk(world, visit);
        }
    }

    fn walk_mut(&mut self, visit: &mut impl FnMut(&mut ModelNode)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }
}

/// An imported model: one or more root nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelScene {
    pub name: String,
    pub roots: Vec<ModelNode>,
}

impl ModelScene {
    pub fn node_count(&self) -> usize {
        let mut n = 0;
        self.walk(|_, _| n += 1);
        n
    }

    pub fn mesh_count(&self) -> usize {
        let mut n = 0;
        self.walk(|node, _| {
            if node.mesh.is_some() {
                n += 1
            }
        });
        n
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives().len()
    }

    pub fn vertex_count(&self) -> usize {
        self.primitives()
            .iter()
            .map(|(_, p)| p.positions.len())
            .sum()
    }

    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a ModelNode, Mat4)) {
        for root in &self.roots {
            root.walk(Mat4::IDENTITY, &mut visit);
        }
    }

    /// Every primitive with its model-space transform.
    pub fn primitives(&self) -> Vec<(Mat4, &Primitive)> {
        let mut out = Vec::new();
        self.walk(|node, world| {
            if let Some(mesh) = &node.mesh {
                out.extend(mesh.primitives.iter().map(|p| (world, p)));
            }
        });
        out
    }

    /// Axis-aligned bounds of all vertices in model space.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut bounds: Option<(Vec3, Vec3)> = None;
        for (world, prim) in self.primitives() {
            for p in &prim.positions {
                let v = world.transform_point3(Vec3::from_array(*p));
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        }
        bounds
    }
}

impl Paintable for ModelScene {
    /// Paints every primitive of every mesh node; meshless nodes are left alone.
    fn apply_material(&mut self, settings: &MaterialSettings) -> usize {
        let mut painted = 0;
        for root in &mut self.roots {
            root.walk_mut(&mut |node| {
                if let Some(mesh) = &mut node.mesh {
                    mesh.cast_shadow = true;
                    mesh.receive_shadow = true;
                    for prim in &mut mesh.primitives {
                        prim.material.paint(settings);
                        painted += 1;
                    }
                }
            });
        }
        tracing::debug!(model = %self.name, painted, "material applied");
        painted
    }
}
