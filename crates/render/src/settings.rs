//! Scene look: camera, lights, renderer output, post chain and model slots.
//!
//! Defaults reproduce the silver scene. Every section can be overridden from a
//! YAML file; missing keys fall back to the defaults.

use crate::material::MaterialSettings;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use silverscene_common::{Placement, Rgb};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Perspective camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    /// Viewing direction; the camera is never re-aimed at a target.
    pub forward: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            eye: Vec3::new(0.0, 7.0, 30.0),
            forward: Vec3::NEG_Z,
        }
    }
}

impl CameraSettings {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.eye, self.forward.normalize_or(Vec3::NEG_Z), Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Rgb::SILVER,
            intensity: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub intensity: f32,
    /// Light shines from this position towards the origin.
    pub position: Vec3,
    pub cast_shadow: bool,
    pub shadow_map_size: u32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Rgb::SILVER,
            intensity: 10.0,
            position: Vec3::new(5.0, 5.0, 5.0),
            cast_shadow: true,
            shadow_map_size: 2048,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Vec3,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            color: Rgb::SILVER,
            intensity: 7.0,
            position: Vec3::new(-5.0, 0.0, -5.0),
        }
    }
}

/// Ambient + key + fill lighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub key: DirectionalLight,
    pub fill: PointLight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMapping {
    None,
    AcesFilmic,
}

/// Output configuration of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Premultiplied-free RGBA clear colour; alpha 0 keeps the canvas transparent.
    pub clear_color: [f32; 4],
    /// Upper bound on device pixel ratio.
    pub max_pixel_ratio: f32,
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
    pub srgb_output: bool,
    pub antialias: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 0.0],
            max_pixel_ratio: 2.0,
            tone_mapping: ToneMapping::AcesFilmic,
            exposure: 1.8,
            srgb_output: true,
            antialias: true,
        }
    }
}

impl RendererSettings {
    pub fn pixel_ratio(&self, device_ratio: f32) -> f32 {
        device_ratio.min(self.max_pixel_ratio)
    }
}

/// One pass in the post-processing chain, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostEffect {
    /// Draw the scene into the chain's input buffer.
    RenderScene,
    /// Offset the red and blue channels in opposite directions.
    RgbShift {
        amount: f32,
        #[serde(default)]
        angle: f32,
    },
}

impl PostEffect {
    pub fn rgb_shift(amount: f32) -> Self {
        Self::RgbShift { amount, angle: 0.0 }
    }
}

/// A model to load and place in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSlot {
    pub name: String,
    /// Path relative to the asset root.
    pub path: String,
    pub placement: Placement,
}

impl ModelSlot {
    pub fn new(name: &str, path: &str, placement: Placement) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            placement,
        }
    }
}

/// Equirectangular HDR environment used for reflections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSettings {
    pub path: String,
}

/// Complete look of the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub camera: CameraSettings,
    pub lights: LightRig,
    pub renderer: RendererSettings,
    pub material: MaterialSettings,
    pub post_chain: Vec<PostEffect>,
    pub models: Vec<ModelSlot>,
    pub environment: Option<EnvironmentSettings>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            lights: LightRig::default(),
            renderer: RendererSettings::default(),
            material: MaterialSettings::silver(),
            post_chain: vec![PostEffect::RenderScene, PostEffect::rgb_shift(0.0015)],
            models: vec![
                ModelSlot::new(
                    "helmet",
                    "helmet-future/source/1.glb",
                    Placement::new(Vec3::new(0.0, 8.0, 0.0), 10.0),
                ),
                ModelSlot::new(
                    "sword",
                    "sword/scene.gltf",
                    Placement::new(Vec3::new(2.0, 8.0, 0.0), 1.0),
                ),
                ModelSlot::new(
                    "additional",
                    "model.glb",
                    Placement::new(Vec3::new(0.0, 8.0, 0.0), 1.0),
                ),
            ],
            environment: Some(EnvironmentSettings {
                path: "pond_bridge_night_2k.hdr".into(),
            }),
        }
    }
}

impl SceneSettings {
    pub fn from_yaml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.as_ref().display(), "scene settings loaded");
        Ok(settings)
    }

    pub fn to_yaml(&self) -> Result<String, SettingsError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Total RGB shift amount across the post chain (0.0 when absent).
    pub fn rgb_shift_amount(&self) -> f32 {
        self.post_chain
            .iter()
            .map(|e| match e {
                PostEffect::RgbShift { amount, .. } => *amount,
                PostEffect::RenderScene => 0.0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_silver_scene() {
        let s = SceneSettings::default();
        assert_eq!(s.camera.fov_degrees, 45.0);
        assert_eq!(s.camera.eye, Vec3::new(0.0, 7.0, 30.0));
        assert_eq!(s.lights.key.shadow_map_size, 2048);
        assert_eq!(s.renderer.exposure, 1.8);
        assert_eq!(s.models.len(), 3);
        assert_eq!(s.models[0].placement.scale, Vec3::splat(10.0));
        assert!((s.rgb_shift_amount() - 0.0015).abs() < 1e-9);
    }

    #[test]
    fn pixel_ratio_is_capped() {
        let r = RendererSettings::default();
        assert_eq!(r.pixel_ratio(3.0), 2.0);
        assert_eq!(r.pixel_ratio(1.25), 1.25);
    }

    #[test]
    fn camera_projection_is_finite() {
        let cam = CameraSettings::default();
        let vp = cam.view_projection(16.0 / 9.0);
        assert!(vp.is_finite());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = r##"
renderer:
  exposure: 1.2
material:
  roughness: 0.3
lights:
  key:
    intensity: 12.0
post_chain:
  - kind: render_scene
  - kind: rgb_shift
    amount: 0.003
"##;
        let s = SceneSettings::from_yaml_str(yaml).unwrap();
        assert_eq!(s.renderer.exposure, 1.2);
        assert_eq!(s.renderer.max_pixel_ratio, 2.0);
        assert_eq!(s.material.roughness, 0.3);
        assert_eq!(s.material.metalness, 1.0);
        assert_eq!(s.lights.key.intensity, 12.0);
        assert_eq!(s.lights.key.color, Rgb::SILVER);
        assert_eq!(s.lights.key.shadow_map_size, 2048);
        assert_eq!(s.lights.fill, PointLight::default());
        assert_eq!(s.post_chain[1], PostEffect::rgb_shift(0.003));
        assert_eq!(s.models.len(), 3);
    }

    #[test]
    fn yaml_round_trips_through_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let original = SceneSettings::default();
        std::fs::write(tmp.path(), original.to_yaml().unwrap()).unwrap();
        let loaded = SceneSettings::from_yaml_file(tmp.path()).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn invalid_colour_is_rejected() {
        let yaml = "material:\n  color: silver\n";
        assert!(matches!(
            SceneSettings::from_yaml_str(yaml),
            Err(SettingsError::Yaml(_))
        ));
    }
}
