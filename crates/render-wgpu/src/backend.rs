use crate::mesh::{MeshData, Vertex};
use crate::shaders;
use crate::target::{self, COLOR_FORMAT, DEPTH_FORMAT, RenderTarget};
use crate::uniforms::{ObjectUniforms, PostUniforms, SceneUniforms};
use silverscene_assets::{EnvironmentMap, ModelScene};
use silverscene_common::{ObjectId, Placement};
use silverscene_render::{FrameView, RenderBackend, SceneSettings};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

/// Errors raised while bringing up the GPU.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

struct GpuModel {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    placement: Placement,
}

/// Window-backed renderer. Draws every uploaded model whose id appears in
/// the frame's poses, then composites to the surface.
pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    settings: SceneSettings,
    scale_factor: f32,
    sample_count: u32,

    scene_pipeline: wgpu::RenderPipeline,
    scene_layout: wgpu::BindGroupLayout,
    object_layout: wgpu::BindGroupLayout,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    env_view: wgpu::TextureView,

    post_pipeline: wgpu::RenderPipeline,
    post_layout: wgpu::BindGroupLayout,
    post_buffer: wgpu::Buffer,
    post_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,

    target: RenderTarget,
    models: BTreeMap<ObjectId, GpuModel>,
}

impl WgpuBackend {
    /// Create the surface, device and pipelines for a window of the given
    /// physical size.
    pub fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        scale_factor: f32,
        settings: SceneSettings,
    ) -> Result<Self, BackendError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(BackendError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("silverscene_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb() == settings.renderer.srgb_output)
            .or(caps.formats.first())
            .copied()
            .ok_or(BackendError::NoSurfaceFormat)?;
        let alpha_mode = [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ]
        .into_iter()
        .find(|m| caps.alpha_modes.contains(m))
        .or(caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let msaa_supported = [COLOR_FORMAT, DEPTH_FORMAT].iter().all(|f| {
            adapter
                .get_texture_format_features(*f)
                .flags
                .sample_count_supported(4)
        });
        let sample_count = if settings.renderer.antialias && msaa_supported {
            4
        } else {
            1
        };

        // Scene pass: camera + lights + environment, then per-object transform.
        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });
        let scene_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&scene_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let scene_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&scene_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: COLOR_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        });

        // Composite pass: sample the HDR target, shift, tone map.
        let post_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::POST_SHADER.into()),
        });
        let post_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("post_pipeline_layout"),
            bind_group_layouts: &[&post_layout],
            push_constant_ranges: &[],
        });
        let post_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("post_pipeline"),
            layout: Some(&post_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &post_shader,
                entry_point: Some("vs_fullscreen"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &post_shader,
                entry_point: Some("fs_composite"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let scale = target::render_scale(scale_factor, settings.renderer.max_pixel_ratio);
        let (tw, th) = target::scaled_extent(config.width, config.height, scale);
        let target = RenderTarget::new(&device, tw, th, sample_count);

        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scene_uniforms"),
            contents: bytemuck::bytes_of(&SceneUniforms::new(
                &settings,
                config.width as f32 / config.height as f32,
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let env_view = placeholder_environment(&device, &queue);
        let scene_bind_group = scene_bind_group(&device, &scene_layout, &scene_buffer, &env_view);

        let post_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("post_uniforms"),
            contents: bytemuck::bytes_of(&PostUniforms::new(&settings)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("scene_color_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post_bind_group =
            post_bind_group(&device, &post_layout, &target, &sampler, &post_buffer);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            format = ?format,
            width = config.width,
            height = config.height,
            samples = sample_count,
            "GPU initialized"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            settings,
            scale_factor,
            sample_count,
            scene_pipeline,
            scene_layout,
            object_layout,
            scene_buffer,
            scene_bind_group,
            env_view,
            post_pipeline,
            post_layout,
            post_buffer,
            post_bind_group,
            sampler,
            target,
            models: BTreeMap::new(),
        })
    }

    /// Upload (or replace) the geometry drawn for `id`.
    pub fn upload_model(&mut self, id: ObjectId, scene: &ModelScene, placement: Placement) {
        let data = MeshData::from_scene(scene);
        if data.is_empty() {
            tracing::warn!(model = %scene.name, "model has no triangles, nothing uploaded");
            return;
        }

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("model_vertices"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("model_indices"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let object_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("object_uniforms"),
            contents: bytemuck::bytes_of(&ObjectUniforms::at(
                &placement,
                silverscene_common::Orientation::ZERO,
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let object_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout: &self.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_buffer.as_entire_binding(),
            }],
        });

        tracing::debug!(
            object = %id.short(),
            vertices = data.vertices.len(),
            triangles = data.indices.len() / 3,
            "model uploaded"
        );
        self.models.insert(
            id,
            GpuModel {
                vertex_buffer,
                index_buffer,
                index_count: data.indices.len() as u32,
                object_buffer,
                object_bind_group,
                placement,
            },
        );
    }

    /// Replace the reflection map.
    pub fn set_environment(&mut self, env: &EnvironmentMap) {
        let texture = self.device.create_texture_with_data(
            &self.queue,
            &wgpu::TextureDescriptor {
                label: Some("environment_map"),
                size: wgpu::Extent3d {
                    width: env.width,
                    height: env.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba32Float,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            bytemuck::cast_slice(env.as_floats()),
        );
        self.env_view = texture.create_view(&Default::default());
        self.scene_bind_group = scene_bind_group(
            &self.device,
            &self.scene_layout,
            &self.scene_buffer,
            &self.env_view,
        );
        tracing::debug!(width = env.width, height = env.height, "environment uploaded");
    }

    /// Track a new display scale factor (window moved between monitors).
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor;
        self.rebuild_target();
    }

    fn rebuild_target(&mut self) {
        let scale = target::render_scale(self.scale_factor, self.settings.renderer.max_pixel_ratio);
        let (w, h) = target::scaled_extent(self.config.width, self.config.height, scale);
        self.target = RenderTarget::new(&self.device, w, h, self.sample_count);
        self.post_bind_group = post_bind_group(
            &self.device,
            &self.post_layout,
            &self.target,
            &self.sampler,
            &self.post_buffer,
        );
    }

    fn write_uniforms(&self, frame: &FrameView<'_>) {
        let aspect = self.config.width as f32 / self.config.height as f32;
        self.queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::bytes_of(&SceneUniforms::new(&self.settings, aspect)),
        );
        for pose in frame.poses {
            if let Some(model) = self.models.get(&pose.id) {
                self.queue.write_buffer(
                    &model.object_buffer,
                    0,
                    bytemuck::bytes_of(&ObjectUniforms::at(&model.placement, pose.orientation)),
                );
            }
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn render_frame(&mut self, frame: &FrameView<'_>) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                tracing::debug!(frame = frame.frame, "surface reconfigured, frame skipped");
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.write_uniforms(frame);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        let [r, g, b, a] = self.settings.renderer.clear_color;
        let (color, resolve_target) = self.target.color_attachment();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.scene_pipeline);
            pass.set_bind_group(0, &self.scene_bind_group, &[]);
            for pose in frame.poses {
                let Some(model) = self.models.get(&pose.id) else {
                    continue;
                };
                pass.set_bind_group(1, &model.object_bind_group, &[]);
                pass.set_vertex_buffer(0, model.vertex_buffer.slice(..));
                pass.set_index_buffer(model.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..model.index_count, 0, 0..1);
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("composite_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            pass.set_pipeline(&self.post_pipeline);
            pass.set_bind_group(0, &self.post_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.rebuild_target();
        tracing::debug!(
            width = self.config.width,
            height = self.config.height,
            target_width = self.target.width,
            target_height = self.target.height,
            "surface resized"
        );
    }
}

fn placeholder_environment(device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::TextureView {
    let texel: [f32; 4] = [0.02, 0.02, 0.025, 1.0];
    device
        .create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("environment_placeholder"),
                size: wgpu::Extent3d {
                    width: 1,
                    height: 1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba32Float,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            bytemuck::cast_slice(&texel),
        )
        .create_view(&Default::default())
}

fn scene_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniforms: &wgpu::Buffer,
    env: &wgpu::TextureView,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("scene_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(env),
            },
        ],
    })
}

fn post_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    target: &RenderTarget,
    sampler: &wgpu::Sampler,
    uniforms: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("post_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&target.color_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: uniforms.as_entire_binding(),
            },
        ],
    })
}
