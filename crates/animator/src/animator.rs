use crate::object::TrackableObject;
use crate::scheduler::FrameScheduler;
use crate::timing::FrameTimer;
use glam::Vec2;
use silverscene_common::{ObjectId, Viewport};
use silverscene_input::{PointerEvent, PointerState, ViewportBasis};
use silverscene_render::{FrameView, ObjectPose, RenderBackend};
use std::collections::BTreeMap;

/// Tuning for the animator. Captured at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatorConfig {
    /// Viewport whose centre is the pointer origin.
    pub viewport: Viewport,
    /// Radians of target rotation per pixel of pointer offset.
    pub pointer_scale: f32,
    /// Fraction of the remaining gap closed on each tick.
    pub damping: f32,
    /// Ticks at least this far apart (ms) skip rendering.
    pub stall_threshold_ms: f64,
}

impl AnimatorConfig {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            viewport: Viewport::new(viewport_width, viewport_height),
            ..Self::default()
        }
    }
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            pointer_scale: 0.001,
            damping: 0.05,
            stall_threshold_ms: 160.0,
        }
    }
}

/// Counters describing the tick loop so far.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimatorStats {
    pub ticks: u64,
    pub frames_rendered: u64,
    pub frames_skipped: u64,
    pub last_delta_ms: f64,
}

/// Smooths tracked objects' rotations toward the pointer and drives the
/// backend once per tick.
///
/// Objects are kept in a BTreeMap so every tick visits them, and hands them
/// to the backend, in the same order.
pub struct OrientationAnimator<B, S> {
    config: AnimatorConfig,
    basis: ViewportBasis,
    pointer: PointerState,
    objects: BTreeMap<ObjectId, TrackableObject>,
    last_tick_ms: f64,
    stats: AnimatorStats,
    timer: FrameTimer,
    poses: Vec<ObjectPose>,
    backend: B,
    scheduler: S,
}

impl<B: RenderBackend, S: FrameScheduler> OrientationAnimator<B, S> {
    pub fn new(config: AnimatorConfig, backend: B, scheduler: S) -> Self {
        Self {
            basis: ViewportBasis::new(config.viewport),
            config,
            pointer: PointerState::new(),
            objects: BTreeMap::new(),
            last_tick_ms: 0.0,
            stats: AnimatorStats::default(),
            timer: FrameTimer::default(),
            poses: Vec::new(),
            backend,
            scheduler,
        }
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    pub fn stats(&self) -> AnimatorStats {
        self.stats
    }

    /// Rolling history of tick intervals.
    pub fn frame_timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub fn last_tick_ms(&self) -> f64 {
        self.last_tick_ms
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn basis(&self) -> &ViewportBasis {
        &self.basis
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Consume the animator, returning its collaborators.
    pub fn into_parts(self) -> (B, S) {
        (self.backend, self.scheduler)
    }

    /// Rotation every ready object is currently heading toward.
    pub fn target(&self) -> Vec2 {
        self.pointer.target(self.config.pointer_scale)
    }

    /// Start tracking an object. Replaces (and returns) any previous entry
    /// with the same id.
    pub fn register(&mut self, object: TrackableObject) -> Option<TrackableObject> {
        tracing::info!(id = %object.id(), ready = object.is_ready(), "tracking object");
        self.objects.insert(object.id(), object)
    }

    /// Stop tracking an object. Its rotation is never touched again.
    pub fn unregister(&mut self, id: ObjectId) -> Option<TrackableObject> {
        let removed = self.objects.remove(&id);
        if removed.is_some() {
            tracing::info!(%id, "stopped tracking object");
        }
        removed
    }

    /// Flip a pending object to ready. Returns false for unknown ids.
    pub fn mark_ready(&mut self, id: ObjectId) -> bool {
        match self.objects.get_mut(&id) {
            Some(obj) => {
                obj.set_ready();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&TrackableObject> {
        self.objects.get(&id)
    }

    /// All tracked objects, pending ones included, in id order.
    pub fn objects(&self) -> impl Iterator<Item = &TrackableObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Record an absolute pointer position against the cached basis.
    pub fn on_pointer_move(&mut self, client_x: f64, client_y: f64) {
        self.apply_pointer(PointerEvent::Moved { client_x, client_y });
    }

    pub fn apply_pointer(&mut self, event: PointerEvent) {
        self.pointer.apply(event, &self.basis);
    }

    /// Viewport changed: recompute the pointer basis and tell the backend.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.config.viewport = Viewport::new(width, height);
        self.basis = ViewportBasis::new(self.config.viewport);
        self.backend.on_resize(width, height);
    }

    /// Advance one display refresh.
    ///
    /// Rotations move even when rendering is skipped, and the next frame is
    /// always requested.
    pub fn tick(&mut self, now_ms: f64) {
        let _span = tracing::trace_span!("animator_tick", now_ms).entered();

        let delta_ms = now_ms - self.last_tick_ms;
        self.last_tick_ms = now_ms;

        let target = self.target();
        let damping = self.config.damping;
        for obj in self.objects.values_mut().filter(|o| o.is_ready()) {
            obj.approach(target.x, target.y, damping);
        }

        self.stats.ticks += 1;
        self.stats.last_delta_ms = delta_ms;
        self.timer.record_ms(delta_ms);

        if delta_ms < self.config.stall_threshold_ms {
            self.poses.clear();
            self.poses
                .extend(self.objects.values().filter(|o| o.is_ready()).map(|o| ObjectPose {
                    id: o.id(),
                    orientation: o.orientation(),
                }));
            let view = FrameView {
                frame: self.stats.frames_rendered,
                timestamp_ms: now_ms,
                poses: &self.poses,
            };
            self.backend.render_frame(&view);
            self.stats.frames_rendered += 1;
        } else {
            tracing::debug!(delta_ms, "frame stalled, skipping render");
            self.stats.frames_skipped += 1;
        }

        self.scheduler.request_next_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use silverscene_common::Orientation;
    use silverscene_render::DebugTextBackend;

    /// Backend that remembers every pose it was handed.
    #[derive(Default)]
    struct RecordingBackend {
        frames: Vec<Vec<ObjectPose>>,
        resizes: Vec<(u32, u32)>,
    }

    impl RenderBackend for RecordingBackend {
        fn render_frame(&mut self, frame: &FrameView<'_>) {
            self.frames.push(frame.poses.to_vec());
        }

        fn on_resize(&mut self, width: u32, height: u32) {
            self.resizes.push((width, height));
        }
    }

    type TestAnimator = OrientationAnimator<RecordingBackend, ManualScheduler>;

    fn animator() -> TestAnimator {
        OrientationAnimator::new(
            AnimatorConfig::new(800, 600),
            RecordingBackend::default(),
            ManualScheduler::new(),
        )
    }

    /// Pointer sits `dx`, `dy` pixels from the 800x600 centre.
    fn point_at(a: &mut TestAnimator, dx: f64, dy: f64) {
        a.on_pointer_move(400.0 + dx, 300.0 + dy);
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn starts_empty() {
        let a = animator();
        assert!(a.is_empty());
        assert_eq!(a.last_tick_ms(), 0.0);
        assert_eq!(a.stats(), AnimatorStats::default());
    }

    #[test]
    fn single_tick_moves_five_percent() {
        let mut a = animator();
        let id = ObjectId::new();
        a.register(TrackableObject::ready(id));
        point_at(&mut a, 100.0, 0.0);

        a.tick(16.0);

        let obj = a.get(id).unwrap();
        assert!(approx(obj.rotation_y(), 0.005));
        assert_eq!(obj.rotation_x(), 0.0);
    }

    #[test]
    fn ten_ticks_follow_exponential_decay() {
        let mut a = animator();
        let id = ObjectId::new();
        a.register(TrackableObject::ready(id));
        point_at(&mut a, 100.0, 0.0);

        for i in 1..=10 {
            a.tick(i as f64 * 16.0);
        }

        let expected = 0.1 * (1.0 - 0.95f32.powi(10));
        let got = a.get(id).unwrap().rotation_y();
        assert!(approx(got, expected), "got {got}, expected {expected}");
        assert!((got - 0.0401).abs() < 1e-4);
    }

    #[test]
    fn every_tick_strictly_closes_the_gap() {
        let mut a = animator();
        let id = ObjectId::new();
        a.register(
            TrackableObject::ready(id).with_orientation(Orientation::new(0.4, -0.3)),
        );
        point_at(&mut a, -120.0, 75.0);
        let target = a.target();

        let mut t = 0.0;
        for _ in 0..50 {
            let before = a.get(id).unwrap().orientation();
            t += 16.0;
            a.tick(t);
            let after = a.get(id).unwrap().orientation();

            let gap_y = before.y - target.x;
            let gap_x = before.x - target.y;
            assert!((after.y - target.x).abs() < gap_y.abs());
            assert!((after.x - target.y).abs() < gap_x.abs());
            assert!(((after.y - target.x) - gap_y * 0.95).abs() < 1e-6);
            assert!(((after.x - target.y) - gap_x * 0.95).abs() < 1e-6);
            // never crosses the target
            assert!((after.y - target.x).signum() == gap_y.signum());
            assert!(after.is_finite());
        }
    }

    #[test]
    fn stalled_tick_skips_render_but_still_animates() {
        let mut a = animator();
        let id = ObjectId::new();
        a.register(TrackableObject::ready(id));
        point_at(&mut a, 100.0, 0.0);

        a.tick(16.0);
        assert_eq!(a.backend().frames.len(), 1);

        a.tick(216.0); // 200ms gap
        assert_eq!(a.backend().frames.len(), 1);
        assert_eq!(a.last_tick_ms(), 216.0);
        assert_eq!(a.stats().frames_skipped, 1);
        assert_eq!(a.stats().last_delta_ms, 200.0);

        let expected = 0.1 * (1.0 - 0.95f32.powi(2));
        assert!(approx(a.get(id).unwrap().rotation_y(), expected));
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut a = animator();
        a.tick(100.0);
        assert_eq!(a.stats().frames_rendered, 1);
        a.tick(260.0); // exactly 160ms later
        assert_eq!(a.stats().frames_rendered, 1);
        assert_eq!(a.stats().frames_skipped, 1);
    }

    #[test]
    fn stalled_tick_at_rest_is_a_no_op() {
        let mut a = animator();
        let id = ObjectId::new();
        a.register(TrackableObject::ready(id));
        point_at(&mut a, 0.0, 0.0);

        a.tick(500.0);

        assert_eq!(a.get(id).unwrap().orientation(), Orientation::ZERO);
        assert!(a.backend().frames.is_empty());
    }

    #[test]
    fn converged_object_unchanged_on_stall() {
        let mut a = animator();
        point_at(&mut a, 50.0, -25.0);
        let target = a.target();
        let id = ObjectId::new();
        let at_target = Orientation::new(target.y, target.x);
        a.register(TrackableObject::ready(id).with_orientation(at_target));

        a.tick(1000.0);

        assert_eq!(a.get(id).unwrap().orientation(), at_target);
        assert!(a.backend().frames.is_empty());
    }

    #[test]
    fn next_frame_requested_every_tick() {
        let mut a = animator();
        a.tick(16.0);
        a.tick(1000.0);
        a.tick(1016.0);
        assert_eq!(a.scheduler().requested(), 3);
        assert_eq!(a.stats().ticks, 3);
        assert_eq!(a.stats().frames_rendered, 2);
    }

    #[test]
    fn pending_objects_are_skipped_until_ready() {
        let mut a = animator();
        let id = ObjectId::new();
        a.register(TrackableObject::pending(id));
        point_at(&mut a, 100.0, 100.0);

        a.tick(16.0);
        assert_eq!(a.get(id).unwrap().orientation(), Orientation::ZERO);
        assert!(a.backend().frames[0].is_empty());

        assert!(a.mark_ready(id));
        a.tick(32.0);
        assert!(approx(a.get(id).unwrap().rotation_y(), 0.005));
        assert_eq!(a.backend().frames[1].len(), 1);
    }

    #[test]
    fn mark_ready_unknown_id() {
        let mut a = animator();
        assert!(!a.mark_ready(ObjectId::new()));
    }

    #[test]
    fn mid_run_registration_tracks_from_next_tick() {
        let mut a = animator();
        let first = ObjectId::new();
        a.register(TrackableObject::ready(first));
        point_at(&mut a, 100.0, 0.0);
        for i in 1..=5 {
            a.tick(i as f64 * 16.0);
        }

        let late = ObjectId::new();
        a.register(TrackableObject::ready(late));
        assert_eq!(a.get(late).unwrap().orientation(), Orientation::ZERO);

        a.tick(96.0);
        assert!(approx(a.get(late).unwrap().rotation_y(), 0.005));
        assert!(a.get(first).unwrap().rotation_y() > a.get(late).unwrap().rotation_y());

        for i in 7..=400 {
            a.tick(i as f64 * 16.0);
        }
        assert!(approx(a.get(late).unwrap().rotation_y(), 0.1));
        assert!(approx(a.get(first).unwrap().rotation_y(), 0.1));
    }

    #[test]
    fn unregistered_object_stops_changing() {
        let mut a = animator();
        let keep = ObjectId::new();
        let gone = ObjectId::new();
        a.register(TrackableObject::ready(keep));
        a.register(TrackableObject::ready(gone));
        point_at(&mut a, 100.0, 50.0);

        a.tick(16.0);
        let removed = a.unregister(gone).unwrap();
        let frozen = removed.orientation();
        let keep_before = a.get(keep).unwrap().orientation();

        a.tick(32.0);
        a.tick(48.0);

        assert!(a.get(gone).is_none());
        assert_eq!(removed.orientation(), frozen);
        assert_ne!(a.get(keep).unwrap().orientation(), keep_before);
        assert!(a.backend().frames[2].iter().all(|p| p.id != gone));
        assert!(a.unregister(gone).is_none());
    }

    #[test]
    fn re_registering_replaces_entry() {
        let mut a = animator();
        let id = ObjectId::new();
        a.register(TrackableObject::ready(id).with_orientation(Orientation::new(1.0, 1.0)));
        let old = a.register(TrackableObject::pending(id));
        assert_eq!(old.unwrap().orientation(), Orientation::new(1.0, 1.0));
        assert_eq!(a.len(), 1);
        assert!(!a.get(id).unwrap().is_ready());
    }

    #[test]
    fn pointer_basis_is_cached_until_resize() {
        let mut a = animator();
        a.on_pointer_move(500.0, 300.0);
        assert_eq!(a.pointer().offset(), Vec2::new(100.0, 0.0));

        a.on_resize(1000, 600);
        assert_eq!(a.backend().resizes, vec![(1000, 600)]);
        // stored offset is not retroactively rebased
        assert_eq!(a.pointer().offset(), Vec2::new(100.0, 0.0));

        a.on_pointer_move(500.0, 300.0);
        assert_eq!(a.pointer().offset(), Vec2::ZERO);
        assert_eq!(a.config().viewport, Viewport::new(1000, 600));
    }

    #[test]
    fn first_tick_at_zero_renders() {
        let mut a = animator();
        a.tick(0.0);
        assert_eq!(a.stats().frames_rendered, 1);
    }

    #[test]
    fn frames_carry_poses_in_id_order() {
        let mut a = animator();
        let mut ids: Vec<ObjectId> = (0..4).map(|_| ObjectId::new()).collect();
        for id in &ids {
            a.register(TrackableObject::ready(*id));
        }
        a.tick(16.0);
        ids.sort();
        let seen: Vec<ObjectId> = a.backend().frames[0].iter().map(|p| p.id).collect();
        assert_eq!(seen, ids);
    }

    #[test]
    fn drives_debug_text_backend() {
        let mut a = OrientationAnimator::new(
            AnimatorConfig::new(200, 100),
            DebugTextBackend::new(),
            ManualScheduler::new(),
        );
        let id = ObjectId::new();
        a.register(TrackableObject::ready(id));
        a.on_pointer_move(200.0, 50.0);
        a.tick(16.0);

        let out = a.backend().last_frame().unwrap();
        assert!(out.contains("Objects: 1"));
        assert!(out.contains("rot=(0.0000, 0.0050)"));
    }

    #[test]
    fn frame_timer_sees_each_interval() {
        let mut a = animator();
        a.tick(10.0);
        a.tick(30.0);
        assert_eq!(a.frame_timer().count(), 2);
        assert_eq!(a.frame_timer().max(), std::time::Duration::from_millis(20));
    }
}
