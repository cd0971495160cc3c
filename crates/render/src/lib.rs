//! Rendering adapter: renderer-agnostic backend contract and scene look.
//!
//! # Invariants
//! - Backends never mutate tracked orientations; they only read a frame view.
//! - Material and look settings are plain data; backends decide how to apply them.
//!
//! The [`RenderBackend`] trait is the only surface the animator talks to. A
//! [`DebugTextBackend`] stands in for the GPU backend in headless runs and tests.

mod backend;
mod material;
mod settings;

pub use backend::{DebugTextBackend, FrameView, ObjectPose, RenderBackend};
pub use material::{MaterialSettings, Paintable};
pub use settings::{
    AmbientLight, CameraSettings, DirectionalLight, EnvironmentSettings, LightRig, ModelSlot, PointLight,
    PostEffect, RendererSettings, SceneSettings, SettingsError, ToneMapping,
};

pub fn crate_info() -> &'static str {
    "silverscene-render v0.1.0"
}
