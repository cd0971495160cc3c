use silverscene_common::{ObjectId, Orientation};

/// Load state of a tracked object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Asset still loading; the animator leaves it alone.
    Pending,
    /// Asset loaded; rotations are animated every tick.
    Ready,
}

/// An object whose two-axis rotation the animator steers.
///
/// The renderable itself lives in the backend; this is the animator's view of
/// it, keyed by id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackableObject {
    id: ObjectId,
    orientation: Orientation,
    readiness: Readiness,
}

impl TrackableObject {
    /// A loaded object at zero rotation.
    pub fn ready(id: ObjectId) -> Self {
        Self {
            id,
            orientation: Orientation::ZERO,
            readiness: Readiness::Ready,
        }
    }

    /// An object whose asset has not finished loading.
    pub fn pending(id: ObjectId) -> Self {
        Self {
            readiness: Readiness::Pending,
            ..Self::ready(id)
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn rotation_x(&self) -> f32 {
        self.orientation.x
    }

    pub fn rotation_y(&self) -> f32 {
        self.orientation.y
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    pub(crate) fn set_ready(&mut self) {
        self.readiness = Readiness::Ready;
    }

    /// Move both axes `damping` of the way toward `(target_x, target_y)`.
    ///
    /// `target_x` drives yaw (rotation about Y), `target_y` drives pitch.
    pub(crate) fn approach(&mut self, target_x: f32, target_y: f32, damping: f32) {
        self.orientation.y += (target_x - self.orientation.y) * damping;
        self.orientation.x += (target_y - self.orientation.x) * damping;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_starts_at_zero() {
        let obj = TrackableObject::pending(ObjectId::new());
        assert!(!obj.is_ready());
        assert_eq!(obj.orientation(), Orientation::ZERO);
    }

    #[test]
    fn approach_moves_fraction_of_gap() {
        let mut obj = TrackableObject::ready(ObjectId::new());
        obj.approach(0.1, -0.2, 0.05);
        assert!((obj.rotation_y() - 0.005).abs() < 1e-7);
        assert!((obj.rotation_x() + 0.01).abs() < 1e-7);
    }

    #[test]
    fn approach_at_target_is_stable() {
        let mut obj =
            TrackableObject::ready(ObjectId::new()).with_orientation(Orientation::new(0.3, 0.2));
        obj.approach(0.2, 0.3, 0.05);
        assert_eq!(obj.orientation(), Orientation::new(0.3, 0.2));
    }
}
