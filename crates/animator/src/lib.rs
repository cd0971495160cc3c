//! Orientation animator: steers tracked objects toward a pointer-derived target.
//!
//! # Invariants
//! - Each tick moves every ready object a fixed fraction of the way to the
//!   target, so rotations never overshoot and stay finite.
//! - Damping is applied per tick, not per elapsed millisecond.
//! - A tick whose elapsed time reaches the stall threshold still updates
//!   rotations but does not render.
//! - Every tick requests the next one, rendered or not.

mod animator;
mod object;
mod scheduler;
mod timing;

pub use animator::{AnimatorConfig, AnimatorStats, OrientationAnimator};
pub use object::{Readiness, TrackableObject};
pub use scheduler::{FrameScheduler, ManualScheduler};
pub use timing::FrameTimer;

pub fn crate_info() -> &'static str {
    "silverscene-animator v0.1.0"
}
