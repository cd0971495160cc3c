/// Offscreen HDR colour and depth targets the scene pass draws into.
pub(crate) struct RenderTarget {
    /// Multisampled colour, present only when antialiasing is on.
    pub msaa_view: Option<wgpu::TextureView>,
    /// Single-sampled colour read by the composite pass.
    pub color_view: wgpu::TextureView,
    pub depth_view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

pub(crate) const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Ratio of offscreen pixels to surface pixels once the device pixel ratio
/// is capped at `max_ratio`.
pub(crate) fn render_scale(scale_factor: f32, max_ratio: f32) -> f32 {
    if scale_factor <= 0.0 || !scale_factor.is_finite() {
        return 1.0;
    }
    scale_factor.min(max_ratio.max(0.1)) / scale_factor
}

pub(crate) fn scaled_extent(width: u32, height: u32, scale: f32) -> (u32, u32) {
    let w = ((width as f32) * scale).round().max(1.0) as u32;
    let h = ((height as f32) * scale).round().max(1.0) as u32;
    (w, h)
}

impl RenderTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32, sample_count: u32) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = |label: &str,
                       format: wgpu::TextureFormat,
                       samples: u32,
                       usage: wgpu::TextureUsages| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size,
                    mip_level_count: 1,
                    sample_count: samples,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage,
                    view_formats: &[],
                })
                .create_view(&Default::default())
        };

        let color_view = texture(
            "scene_color",
            COLOR_FORMAT,
            1,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let msaa_view = (sample_count > 1).then(|| {
            texture(
                "scene_color_msaa",
                COLOR_FORMAT,
                sample_count,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
            )
        });
        let depth_view = texture(
            "scene_depth",
            DEPTH_FORMAT,
            sample_count,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );

        Self {
            msaa_view,
            color_view,
            depth_view,
            width: size.width,
            height: size.height,
        }
    }

    /// Attachment to draw into and the optional resolve target.
    pub fn color_attachment(&self) -> (&wgpu::TextureView, Option<&wgpu::TextureView>) {
        match &self.msaa_view {
            Some(msaa) => (msaa, Some(&self.color_view)),
            None => (&self.color_view, None),
        }
    }
}
