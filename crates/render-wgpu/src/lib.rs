//! wgpu render backend.
//!
//! Draws loaded models with a metallic PBR-style shader that reflects an
//! equirectangular environment map, into an offscreen HDR target. A
//! composite pass then applies the RGB shift, exposure and ACES tone mapping
//! on the way to the window surface.
//!
//! # Invariants
//! - The backend never mutates tracked objects; it only reads frame poses.
//! - Only models whose id is in the frame's poses are drawn, so pending
//!   objects stay invisible even if their geometry is already uploaded.
//! - Surface loss reconfigures the surface and drops that one frame.

mod backend;
mod mesh;
mod shaders;
mod target;
mod uniforms;

pub use backend::{BackendError, WgpuBackend};
