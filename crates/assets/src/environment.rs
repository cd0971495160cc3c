use crate::error::AssetLoadFailure;

/// How an environment image is wrapped around the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionMapping {
    /// Longitude along X, latitude along Y.
    Equirectangular,
}

/// Linear-light RGBA environment image used for reflections.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMap {
    pub width: u32,
    pub height: u32,
    /// Row-major, top row first.
    pub texels: Vec<[f32; 4]>,
    pub mapping: ReflectionMapping,
}

impl EnvironmentMap {
    /// Decode a Radiance `.hdr` image.
    pub fn decode_hdr(bytes: &[u8]) -> Result<Self, AssetLoadFailure> {
        let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Hdr)?;
        let rgba = image.into_rgba32f();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(AssetLoadFailure::format("environment map has no pixels"));
        }
        let texels = rgba.pixels().map(|p| p.0).collect();
        Ok(Self {
            width,
            height,
            texels,
            mapping: ReflectionMapping::Equirectangular,
        })
    }

    /// Texel data as a flat float slice, ready for upload.
    pub fn as_floats(&self) -> &[f32] {
        self.texels.as_flattened()
    }

    /// Mean RGB over all texels, a cheap stand-in for ambient irradiance.
    pub fn average_radiance(&self) -> [f32; 3] {
        let n = self.texels.len().max(1) as f32;
        let sum = self.texels.iter().fold([0.0f32; 3], |acc, t| {
            [acc[0] + t[0], acc[1] + t[1], acc[2] + t[2]]
        });
        sum.map(|c| c / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn decodes_tiny_hdr() {
        let env = EnvironmentMap::decode_hdr(&fixtures::tiny_hdr()).unwrap();
        assert_eq!((env.width, env.height), (2, 1));
        assert_eq!(env.texels.len(), 2);
        assert!((env.texels[0][0] - 1.0).abs() < 0.01);
        assert_eq!(env.texels[1][..3], [0.0, 0.0, 0.0]);
        assert_eq!(env.as_floats().len(), 8);
        assert_eq!(env.mapping, ReflectionMapping::Equirectangular);
    }

    #[test]
    fn average_of_half_lit_map() {
        let env = EnvironmentMap::decode_hdr(&fixtures::tiny_hdr()).unwrap();
        let avg = env.average_radiance();
        assert!((avg[0] - 0.5).abs() < 0.01);
    }

    #[test]
    fn rejects_non_hdr_bytes() {
        let err = EnvironmentMap::decode_hdr(b"definitely not radiance").unwrap_err();
        assert!(matches!(err, AssetLoadFailure::Decode(_)));
    }
}
