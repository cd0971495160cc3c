use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a tracked scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and debug output.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}

/// Two-axis rotation in radians (pitch around X, yaw around Y).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub x: f32,
    pub y: f32,
}

impl Orientation {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Quaternion equivalent, applied X first then Y (XYZ Euler order).
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(glam::EulerRot::XYZ, self.x, self.y, 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Static placement of a model in the scene: translation and uniform-or-not scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec3,
    pub scale: Vec3,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Placement {
    pub fn new(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            scale: Vec3::splat(scale),
        }
    }

    /// Model matrix combining this placement with an animated orientation.
    pub fn model_matrix(&self, orientation: Orientation) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, orientation.to_quat(), self.position)
    }
}

/// Viewport size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Linear 8-bit RGB colour, parsed from `#RRGGBB` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid colour {0:?}: expected #RRGGBB")]
pub struct ColorParseError(pub String);

impl Rgb {
    /// Silver, the colour used for every material and light in the scene.
    pub const SILVER: Self = Self::from_hex(0xC0C0C0);

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Components as floats in `0.0..=1.0`.
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| ColorParseError(s.to_string()))?;
        let hex = u32::from_str_radix(digits, 16).map_err(|_| ColorParseError(s.to_string()))?;
        Ok(Self::from_hex(hex))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_uniqueness() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn placement_default_is_identity() {
        let p = Placement::default();
        assert_eq!(p.position, Vec3::ZERO);
        assert_eq!(p.scale, Vec3::ONE);
        assert_eq!(p.model_matrix(Orientation::ZERO), Mat4::IDENTITY);
    }

    #[test]
    fn orientation_quat_matches_axis_rotation() {
        let q = Orientation::new(0.0, 0.5).to_quat();
        let expected = Quat::from_rotation_y(0.5);
        assert!(q.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn silver_parses_from_hex_string() {
        let c: Rgb = "#C0C0C0".parse().unwrap();
        assert_eq!(c, Rgb::SILVER);
        assert_eq!(c.to_string(), "#C0C0C0");
    }

    #[test]
    fn bad_colour_strings_rejected() {
        assert!("C0C0C0".parse::<Rgb>().is_err());
        assert!("#C0C0".parse::<Rgb>().is_err());
        assert!("#GGGGGG".parse::<Rgb>().is_err());
    }

    #[test]
    fn viewport_aspect_never_divides_by_zero() {
        assert_eq!(Viewport::new(100, 0).aspect(), 100.0);
        assert_eq!(Viewport::new(1920, 1080).aspect(), 1920.0 / 1080.0);
    }
}
