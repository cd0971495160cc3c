//! Shared types used across the silverscene crates.

mod types;

pub use types::{ColorParseError, ObjectId, Orientation, Placement, Rgb, Viewport};

pub fn crate_info() -> &'static str {
    "silverscene-common v0.1.0"
}
