use glam::Vec2;
use silverscene_common::Viewport;

/// A pointer notification from the host windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved to absolute viewport coordinates (pixels, origin top-left).
    Moved { client_x: f64, client_y: f64 },
    /// Pointer left the viewport. The last offset is kept.
    Left,
}

/// Half-viewport dimensions used as the origin for pointer offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBasis {
    half_width: f64,
    half_height: f64,
}

impl ViewportBasis {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            half_width: viewport.width as f64 / 2.0,
            half_height: viewport.height as f64 / 2.0,
        }
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    pub fn half_height(&self) -> f64 {
        self.half_height
    }

    /// Offset of an absolute position from the viewport centre.
    pub fn offset(&self, client_x: f64, client_y: f64) -> Vec2 {
        Vec2::new(
            (client_x - self.half_width) as f32,
            (client_y - self.half_height) as f32,
        )
    }
}

/// Latest pointer offset relative to the viewport centre, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    offset: Vec2,
    moves: u64,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Number of move notifications applied so far.
    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// Overwrite the offset directly.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
        self.moves += 1;
    }

    /// Apply a pointer event against the given basis.
    pub fn apply(&mut self, event: PointerEvent, basis: &ViewportBasis) {
        match event {
            PointerEvent::Moved { client_x, client_y } => {
                self.set_offset(basis.offset(client_x, client_y));
            }
            PointerEvent::Left => {
                tracing::trace!(offset = ?self.offset, "pointer left viewport");
            }
        }
    }

    /// Pointer offset scaled into a rotation target (radians).
    pub fn target(&self, scale: f32) -> Vec2 {
        self.offset * scale
    }
}
