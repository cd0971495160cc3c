//! CPU-side layouts of the uniform buffers shared with the shaders.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use silverscene_common::{Placement, Rgb};
use silverscene_render::{PostEffect, SceneSettings, ToneMapping};

fn light(color: Rgb, intensity: f32) -> [f32; 4] {
    let [r, g, b] = color.to_f32();
    [r * intensity, g * intensity, b * intensity, intensity]
}

/// Per-frame camera and light rig.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    /// Ambient radiance, already scaled by intensity.
    pub ambient: [f32; 4],
    /// Unit direction from the surface towards the key light.
    pub key_dir: [f32; 4],
    pub key_color: [f32; 4],
    pub fill_pos: [f32; 4],
    pub fill_color: [f32; 4],
}

impl SceneUniforms {
    pub fn new(settings: &SceneSettings, aspect: f32) -> Self {
        let cam = &settings.camera;
        let lights = &settings.lights;
        let key_dir = lights.key.position.normalize_or(Vec3::Y);
        Self {
            view_proj: cam.view_projection(aspect).to_cols_array_2d(),
            eye: cam.eye.extend(1.0).to_array(),
            ambient: light(lights.ambient.color, lights.ambient.intensity),
            key_dir: key_dir.extend(0.0).to_array(),
            key_color: light(lights.key.color, lights.key.intensity),
            fill_pos: lights.fill.position.extend(1.0).to_array(),
            fill_color: light(lights.fill.color, lights.fill.intensity),
        }
    }
}

/// Per-object transform. The normal matrix is the inverse transpose of the
/// model matrix so non-uniform scale keeps normals perpendicular.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

impl ObjectUniforms {
    pub fn from_matrix(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
        }
    }

    pub fn at(placement: &Placement, orientation: silverscene_common::Orientation) -> Self {
        Self::from_matrix(placement.model_matrix(orientation))
    }
}

/// Parameters of the composite pass: RGB shift then tone mapping.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct PostUniforms {
    /// Shift as a UV offset, already rotated by the effect angle.
    pub shift: [f32; 2],
    pub exposure: f32,
    /// 0 = none, 1 = ACES filmic.
    pub tone_mapping: u32,
}

impl PostUniforms {
    pub fn new(settings: &SceneSettings) -> Self {
        let shift = settings
            .post_chain
            .iter()
            .fold(glam::Vec2::ZERO, |acc, effect| match *effect {
                PostEffect::RgbShift { amount, angle } => {
                    acc + glam::Vec2::new(angle.cos(), angle.sin()) * amount
                }
                PostEffect::RenderScene => acc,
            });
        let tone_mapping = match settings.renderer.tone_mapping {
            ToneMapping::None => 0,
            ToneMapping::AcesFilmic => 1,
        };
        Self {
            shift: shift.to_array(),
            exposure: settings.renderer.exposure,
            tone_mapping,
        }
    }
}
