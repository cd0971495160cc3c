use serde::{Deserialize, Serialize};
use silverscene_common::Rgb;

/// Physically-based material parameters applied uniformly to every mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSettings {
    pub color: Rgb,
    pub roughness: f32,
    pub metalness: f32,
    /// Multiplier on environment-map reflections.
    pub env_map_intensity: f32,
}

impl MaterialSettings {
    /// Polished silver.
    pub fn silver() -> Self {
        Self {
            color: Rgb::SILVER,
            roughness: 0.05,
            metalness: 1.0,
            env_map_intensity: 4.0,
        }
    }

    /// Clamp roughness and metalness into `0.0..=1.0` and intensity to non-negative.
    pub fn clamped(self) -> Self {
        Self {
            roughness: self.roughness.clamp(0.0, 1.0),
            metalness: self.metalness.clamp(0.0, 1.0),
            env_map_intensity: self.env_map_intensity.max(0.0),
            ..self
        }
    }
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self::silver()
    }
}

/// Anything that carries meshes whose material can be overwritten.
///
/// Implementors walk their own node structure; callers never need to know
/// concrete node types.
pub trait Paintable {
    /// Apply `settings` to every mesh. Returns the number of meshes painted.
    fn apply_material(&mut self, settings: &MaterialSettings) -> usize;
}

impl<P: Paintable> Paintable for [P] {
    fn apply_material(&mut self, settings: &MaterialSettings) -> usize {
        self.iter_mut().map(|p| p.apply_material(settings)).sum()
    }
}

impl<P: Paintable> Paintable for Vec<P> {
    fn apply_material(&mut self, settings: &MaterialSettings) -> usize {
        self.as_mut_slice().apply_material(settings)
    }
}

impl<P: Paintable> Paintable for Option<P> {
    fn apply_material(&mut self, settings: &MaterialSettings) -> usize {
        self.as_mut().map_or(0, |p| p.apply_material(settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Swatch {
        meshes: usize,
        applied: Option<MaterialSettings>,
    }

    impl Paintable for Swatch {
        fn apply_material(&mut self, settings: &MaterialSettings) -> usize {
            self.applied = Some(*settings);
            self.meshes
        }
    }

    #[test]
    fn silver_defaults() {
        let m = MaterialSettings::default();
        assert_eq!(m.color, Rgb::SILVER);
        assert_eq!(m.roughness, 0.05);
        assert_eq!(m.metalness, 1.0);
        assert_eq!(m.env_map_intensity, 4.0);
    }

    #[test]
    fn clamping_bounds_parameters() {
        let m = MaterialSettings {
            roughness: -1.0,
            metalness: 3.0,
            env_map_intensity: -2.0,
            ..MaterialSettings::silver()
        }
        .clamped();
        assert_eq!(m.roughness, 0.0);
        assert_eq!(m.metalness, 1.0);
        assert_eq!(m.env_map_intensity, 0.0);
    }

    #[test]
    fn pending_slots_paint_nothing() {
        let mut models: Vec<Option<Swatch>> = vec![
            Some(Swatch {
                meshes: 3,
                applied: None,
            }),
            None,
            Some(Swatch {
                meshes: 2,
                applied: None,
            }),
        ];
        let painted = models.apply_material(&MaterialSettings::silver());
        assert_eq!(painted, 5);
        assert!(models[0].as_ref().unwrap().applied.is_some());
    }
}
