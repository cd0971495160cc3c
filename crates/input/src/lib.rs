//! Pointer source: raw pointer positions mapped to viewport-centred offsets.
//!
//! # Invariants
//! - The offset basis is captured once and only changes on an explicit resize.
//! - The latest pointer write wins; intermediate moves may be dropped.

pub mod pointer;

pub use pointer::{PointerEvent, PointerState, ViewportBasis};

pub fn crate_info() -> &'static str {
    "silverscene-input v0.1.0"
}
