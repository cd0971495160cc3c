//! Asset loading: glTF/GLB models and Radiance HDR environment maps.
//!
//! Loads are asynchronous and return a `Result`; byte progress goes to a
//! [`ProgressObserver`] and never affects control flow. Loaded models are
//! identified by a content hash of their source bytes.

mod environment;
mod error;
mod gltf;
mod loader;
mod progress;
mod scene;

#[cfg(test)]
mod fixtures;

pub use environment::{EnvironmentMap, ReflectionMapping};
pub use error::AssetLoadFailure;
pub use gltf::{Container, GltfSource, parse_container};
pub use loader::{AssetId, LoadedModel, load_environment, load_model};
pub use progress::{LoadProgress, LogProgress, NoProgress, ProgressObserver};
pub use scene::{Mesh, ModelNode, ModelScene, Primitive, SurfaceMaterial};

pub fn crate_info() -> &'static str {
    "silverscene-assets v0.1.0"
}
