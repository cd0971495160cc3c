use silverscene_common::{ObjectId, Orientation, Viewport};
use std::collections::VecDeque;

/// Orientation of one ready object at the time a frame is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectPose {
    pub id: ObjectId,
    pub orientation: Orientation,
}

/// Read-only snapshot handed to a backend for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    /// Number of frames rendered before this one.
    pub frame: u64,
    /// Host timestamp of the tick that produced this frame, in milliseconds.
    pub timestamp_ms: f64,
    /// Ready objects in id order.
    pub poses: &'a [ObjectPose],
}

/// Renderer-agnostic interface. All backends implement this trait.
///
/// The backend draws whatever it has been configured with (models, lights,
/// post-processing chain) using the orientations in the frame view.
pub trait RenderBackend {
    /// Draw the current frame.
    fn render_frame(&mut self, frame: &FrameView<'_>);

    /// Viewport changed; projection and framebuffers must follow.
    fn on_resize(&mut self, width: u32, height: u32);
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    fn render_frame(&mut self, frame: &FrameView<'_>) {
        (**self).render_frame(frame)
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        (**self).on_resize(width, height)
    }
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn render_frame(&mut self, frame: &FrameView<'_>) {
        (**self).render_frame(frame)
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        (**self).on_resize(width, height)
    }
}

/// Debug text backend for headless runs.
///
/// Produces a human-readable dump per rendered frame. Useful for CLI output,
/// logging, and testing the render contract.
#[derive(Debug, Default)]
pub struct DebugTextBackend {
    viewport: Option<Viewport>,
    frames: VecDeque<String>,
    keep: Option<usize>,
}

impl DebugTextBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the most recent `count` frame dumps. Zero keeps none.
    pub fn with_history(count: usize) -> Self {
        Self {
            keep: Some(count),
            ..Self::default()
        }
    }

    /// Number of frames currently held.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Held frame dumps, oldest first.
    pub fn frames(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(String::as_str)
    }

    pub fn last_frame(&self) -> Option<&str> {
        self.frames.back().map(String::as_str)
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}

impl RenderBackend for DebugTextBackend {
    fn render_frame(&mut self, frame: &FrameView<'_>) {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame {} (t={:.1}ms) ===\n",
            frame.frame, frame.timestamp_ms
        ));
        if let Some(vp) = self.viewport {
            out.push_str(&format!("Viewport: {}x{}\n", vp.width, vp.height));
        }
        out.push_str(&format!("Objects: {}\n", frame.poses.len()));
        for pose in frame.poses {
            out.push_str(&format!(
                "  [{}] rot=({:.4}, {:.4})\n",
                pose.id.short(),
                pose.orientation.x,
                pose.orientation.y
            ));
        }

        self.frames.push_back(out);
        if let Some(keep) = self.keep {
            while self.frames.len() > keep {
                self.frames.pop_front();
            }
        }
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        tracing::debug!(width, height, "debug backend resized");
        self.viewport = Some(Viewport::new(width, height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_backend_empty_frame() {
        let mut backend = DebugTextBackend::new();
        backend.render_frame(&FrameView {
            frame: 0,
            timestamp_ms: 16.0,
            poses: &[],
        });

        let out = backend.last_frame().unwrap();
        assert!(out.contains("Frame 0"));
        assert!(out.contains("Objects: 0"));
    }

    #[test]
    fn debug_backend_lists_poses() {
        let id = ObjectId::new();
        let poses = [ObjectPose {
            id,
            orientation: Orientation::new(0.25, -0.5),
        }];
        let mut backend = DebugTextBackend::new();
        backend.on_resize(640, 480);
        backend.render_frame(&FrameView {
            frame: 3,
            timestamp_ms: 50.0,
            poses: &poses,
        });

        let out = backend.last_frame().unwrap();
        assert!(out.contains("Viewport: 640x480"));
        assert!(out.contains(&id.short()));
        assert!(out.contains("rot=(0.2500, -0.5000)"));
    }

    #[test]
    fn history_is_bounded() {
        let mut backend = DebugTextBackend::with_history(2);
        for frame in 0..5 {
            backend.render_frame(&FrameView {
                frame,
                timestamp_ms: frame as f64 * 16.0,
                poses: &[],
            });
        }
        assert_eq!(backend.frame_count(), 2);
        assert!(backend.last_frame().unwrap().contains("Frame 4"));
    }

    #[test]
    fn zero_history_keeps_nothing() {
        let mut backend = DebugTextBackend::with_history(0);
        backend.render_frame(&FrameView {
            frame: 0,
            timestamp_ms: 0.0,
            poses: &[],
        });
        assert_eq!(backend.frame_count(), 0);
        assert!(backend.last_frame().is_none());
    }

    #[test]
    fn history_drops_oldest_first() {
        let mut backend = DebugTextBackend::with_history(3);
        for frame in 0..10 {
            backend.render_frame(&FrameView {
                frame,
                timestamp_ms: frame as f64 * 16.0,
                poses: &[],
            });
        }
        let held: Vec<&str> = backend.frames().collect();
        assert_eq!(held.len(), 3);
        assert!(held[0].contains("Frame 7"));
        assert!(held[2].contains("Frame 9"));
    }

    #[test]
    fn mutable_reference_forwards() {
        let mut backend = DebugTextBackend::new();
        {
            let mut borrowed: &mut DebugTextBackend = &mut backend;
            RenderBackend::on_resize(&mut borrowed, 10, 20);
        }
        assert_eq!(backend.viewport(), Some(Viewport::new(10, 20)));
    }
}
