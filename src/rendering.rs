//! Rendering system with wgpu pipeline and shader management.
//!
//! One pass per frame: skybox (fullscreen triangle, no depth), then the
//! static and dynamic scene meshes, then the instanced rain on top.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use image::RgbaImage;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::FrameCamera;
use crate::error::{Error, Result};
use crate::lighting::LightLevels;
use crate::mesh::{Mesh, Vertex};
use crate::weather::{Fog, RainDrop, RainField};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Vertices per rain instance: a streak quad plus the splash ring
const RAIN_RING_SEGMENTS: u32 = 8;
pub const RAIN_VERTICES_PER_DROP: u32 = 6 + 6 * RAIN_RING_SEGMENTS;

/// Starting size of the per-frame mesh buffers
const DYNAMIC_INITIAL_VERTICES: usize = 16 * 1024;
const DYNAMIC_INITIAL_INDICES: usize = 32 * 1024;

/// Uniform buffer for the scene shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Eye position (w unused)
    pub eye: [f32; 4],
    /// Light position, w = 1 when lighting is on
    pub light_position: [f32; 4],
    /// Ambient, diffuse, specular levels (w unused)
    pub light_levels: [f32; 4],
    /// Fog colour (w unused)
    pub fog_color: [f32; 4],
    /// `[mode, start, end, density]`
    pub fog: [f32; 4],
}

impl SceneUniforms {
    /// `light` is `None` when lighting is switched off
    pub fn new(camera: &FrameCamera, light: Option<(Vec3, LightLevels)>, fog: &Fog) -> Self {
        let (light_position, light_levels) = match light {
            Some((pos, levels)) => (
                pos.extend(1.0).to_array(),
                [levels.ambient, levels.diffuse, levels.specular, 0.0],
            ),
            None => ([0.0; 4], [0.0; 4]),
        };
        Self {
            view_proj: camera.view_proj.to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
            light_position,
            light_levels,
            fog_color: Vec3::from(fog.color).extend(1.0).to_array(),
            fog: fog.packed(),
        }
    }
}

/// Uniform buffer for skybox shader (inverse rotation-only view-projection)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SkyboxUniforms {
    pub inv_view_proj: [[f32; 4]; 4],
}

/// Uniform buffer for the rain shader; the motion constants match
/// `weather::drop_position`
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct RainUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    /// `[height, wind_strength, turbulence_amp, turbulence_freq]`
    pub motion: [f32; 4],
    /// `[turbulence_speed, time, splash_duration, splash_radius]`
    pub timing: [f32; 4],
    pub fog_color: [f32; 4],
    pub fog: [f32; 4],
}

impl RainUniforms {
    pub fn new(camera: &FrameCamera, rain: &RainField, fog: &Fog) -> Self {
        let p = &rain.params;
        Self {
            view_proj: camera.view_proj.to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
            motion: [
                p.height,
                p.wind_strength,
                p.turbulence_amp,
                p.turbulence_freq,
            ],
            timing: [
                p.turbulence_speed,
                rain.time,
                p.splash_duration,
                p.splash_radius,
            ],
            fog_color: Vec3::from(fog.color).extend(1.0).to_array(),
            fog: fog.packed(),
        }
    }
}

/// Vertex and index buffers for one mesh
struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    vertex_capacity: usize,
    index_capacity: usize,
}

impl MeshBuffers {
    fn from_mesh(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            vertex_capacity: mesh.vertices.len(),
            index_capacity: mesh.indices.len(),
        }
    }

    fn with_capacity(device: &wgpu::Device, label: &str, vertices: usize, indices: usize) -> Self {
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            size: (vertices * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            size: (indices * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: 0,
            vertex_capacity: vertices,
            index_capacity: indices,
        }
    }

    /// Overwrite the contents, reallocating when the mesh no longer fits
    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, label: &str, mesh: &Mesh) {
        if mesh.vertices.len() > self.vertex_capacity || mesh.indices.len() > self.index_capacity {
            let vertices = mesh.vertices.len().max(self.vertex_capacity).next_power_of_two();
            let indices = mesh.indices.len().max(self.index_capacity).next_power_of_two();
            log::debug!("Growing {label} buffers to {vertices} vertices / {indices} indices");
            *self = Self::with_capacity(device, label, vertices, indices);
        }
        if !mesh.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&mesh.vertices));
            queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&mesh.indices));
        }
        self.index_count = mesh.indices.len() as u32;
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.index_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Rendering system managing wgpu device, pipelines, and buffers
pub struct RenderSystem {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    scene_pipeline: wgpu::RenderPipeline,
    skybox_pipeline: wgpu::RenderPipeline,
    rain_pipeline: wgpu::RenderPipeline,

    scene_uniform_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    skybox_uniform_buffer: wgpu::Buffer,
    skybox_bind_group_layout: wgpu::BindGroupLayout,
    skybox_bind_group: wgpu::BindGroup,
    skybox_sampler: wgpu::Sampler,
    skybox_face_size: u32,
    rain_uniform_buffer: wgpu::Buffer,
    rain_bind_group: wgpu::BindGroup,

    static_mesh: MeshBuffers,
    dynamic_mesh: MeshBuffers,
    rain_buffer: wgpu::Buffer,
    rain_count: u32,
}

impl RenderSystem {
    /// Create new rendering system
    ///
    /// # Arguments
    /// * `window` - Target window (must outlive the surface, hence `Arc`)
    /// * `static_mesh` - Initial scene geometry
    /// * `textures` - Scene texture array layers, all the same square size
    /// * `skybox` - Six cube faces in +X, -X, +Y, -Y, +Z, -Z order
    /// * `rain` - Drops uploaded once as the instance buffer
    pub async fn new(
        window: Arc<Window>,
        static_mesh: &Mesh,
        textures: &[RgbaImage],
        skybox: &[RgbaImage],
        rain: &RainField,
    ) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(Error::Adapter)?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(Error::Adapter)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, &config);

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });
        let skybox_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Skybox Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("skybox.wgsl").into()),
        });
        let rain_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Rain Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("rain.wgsl").into()),
        });

        // Scene: uniforms + texture array + sampler
        let texture_view = upload_texture_array(&device, &queue, textures);
        let texture_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Scene Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let scene_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Bind Group Layout"),
                entries: &[
                    uniform_entry(0),
                    texture_entry(1, wgpu::TextureViewDimension::D2Array),
                    sampler_entry(2),
                ],
            });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture_sampler),
                },
            ],
        });

        let scene_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout],
            push_constant_ranges: &[],
        });

        let scene_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&scene_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: triangle_list(),
            depth_stencil: Some(depth_state(true, wgpu::CompareFunction::Less)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Skybox: uniforms + cube map + sampler
        let skybox_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skybox Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SkyboxUniforms {
                inv_view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let skybox_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Skybox Bind Group Layout"),
                entries: &[
                    uniform_entry(0),
                    texture_entry(1, wgpu::TextureViewDimension::Cube),
                    sampler_entry(2),
                ],
            });

        let skybox_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Skybox Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let skybox_face_size = skybox.first().map(|f| f.width()).unwrap_or(1);
        let cube_view = upload_cube_map(&device, &queue, skybox, skybox_face_size);
        let skybox_bind_group = create_skybox_bind_group(
            &device,
            &skybox_bind_group_layout,
            &skybox_uniform_buffer,
            &cube_view,
            &skybox_sampler,
        );

        let skybox_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Skybox Pipeline Layout"),
                bind_group_layouts: &[&skybox_bind_group_layout],
                push_constant_ranges: &[],
            });

        let skybox_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Skybox Pipeline"),
            layout: Some(&skybox_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &skybox_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &skybox_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: triangle_list(),
            depth_stencil: Some(depth_state(false, wgpu::CompareFunction::Always)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Rain: uniforms + per-drop instance buffer
        let rain_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Rain Uniform Buffer"),
            size: std::mem::size_of::<RainUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let rain_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Rain Bind Group Layout"),
                entries: &[uniform_entry(0)],
            });

        let rain_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Rain Bind Group"),
            layout: &rain_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: rain_uniform_buffer.as_entire_binding(),
            }],
        });

        let rain_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Rain Pipeline Layout"),
            bind_group_layouts: &[&rain_bind_group_layout],
            push_constant_ranges: &[],
        });

        let rain_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Rain Pipeline"),
            layout: Some(&rain_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &rain_shader,
                entry_point: Some("vs_main"),
                buffers: &[RainDrop::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &rain_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: triangle_list(),
            depth_stencil: Some(depth_state(false, wgpu::CompareFunction::Less)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let rain_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Rain Instance Buffer"),
            contents: bytemuck::cast_slice(&rain.drops),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let static_mesh = MeshBuffers::from_mesh(&device, "Static", static_mesh);
        let dynamic_mesh = MeshBuffers::with_capacity(
            &device,
            "Dynamic",
            DYNAMIC_INITIAL_VERTICES,
            DYNAMIC_INITIAL_INDICES,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            scene_pipeline,
            skybox_pipeline,
            rain_pipeline,
            scene_uniform_buffer,
            scene_bind_group,
            skybox_uniform_buffer,
            skybox_bind_group_layout,
            skybox_bind_group,
            skybox_sampler,
            skybox_face_size,
            rain_uniform_buffer,
            rain_bind_group,
            static_mesh,
            dynamic_mesh,
            rain_buffer,
            rain_count: rain.len() as u32,
        })
    }

    /// Replace the static geometry (display mode change)
    pub fn set_static_mesh(&mut self, mesh: &Mesh) {
        self.static_mesh = MeshBuffers::from_mesh(&self.device, "Static", mesh);
    }

    /// Upload this frame's dynamic geometry
    pub fn update_dynamic_mesh(&mut self, mesh: &Mesh) {
        self.dynamic_mesh
            .write(&self.device, &self.queue, "Dynamic", mesh);
    }

    /// Swap the sky cube map (day/night change)
    pub fn set_skybox(&mut self, faces: &[RgbaImage]) {
        let cube_view = upload_cube_map(&self.device, &self.queue, faces, self.skybox_face_size);
        self.skybox_bind_group = create_skybox_bind_group(
            &self.device,
            &self.skybox_bind_group_layout,
            &self.skybox_uniform_buffer,
            &cube_view,
            &self.skybox_sampler,
        );
    }

    pub fn update_uniforms(&self, scene: &SceneUniforms, skybox: &SkyboxUniforms, rain: &RainUniforms) {
        self.queue
            .write_buffer(&self.scene_uniform_buffer, 0, bytemuck::cast_slice(&[*scene]));
        self.queue
            .write_buffer(&self.skybox_uniform_buffer, 0, bytemuck::cast_slice(&[*skybox]));
        self.queue
            .write_buffer(&self.rain_uniform_buffer, 0, bytemuck::cast_slice(&[*rain]));
    }

    /// Reconfigure the surface and depth buffer; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, &self.config);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Render a frame
    pub fn render(&self, draw_rain: bool) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Render skybox first
            render_pass.set_pipeline(&self.skybox_pipeline);
            render_pass.set_bind_group(0, &self.skybox_bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle

            render_pass.set_pipeline(&self.scene_pipeline);
            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
            self.static_mesh.draw(&mut render_pass);
            self.dynamic_mesh.draw(&mut render_pass);

            if draw_rain && self.rain_count > 0 {
                render_pass.set_pipeline(&self.rain_pipeline);
                render_pass.set_bind_group(0, &self.rain_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.rain_buffer.slice(..));
                render_pass.draw(0..RAIN_VERTICES_PER_DROP, 0..self.rain_count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32, dimension: wgpu::TextureViewDimension) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: dimension,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// No culling: many scene parts are open shells or single planes
fn triangle_list() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

fn depth_state(write: bool, compare: wgpu::CompareFunction) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Upload square RGBA layers into one texture, returning a view of `dimension`
fn upload_layers(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    layers: &[RgbaImage],
    size: u32,
    dimension: wgpu::TextureViewDimension,
) -> wgpu::TextureView {
    let layer_count = layers.len().max(1) as u32;
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: layer_count,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (layer, img) in layers.iter().enumerate() {
        if img.dimensions() != (size, size) {
            log::warn!(
                "{label} layer {layer} is {:?}, expected {size}x{size}; skipped",
                img.dimensions()
            );
            continue;
        }
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: layer as u32,
                },
                aspect: wgpu::TextureAspect::All,
            },
            img.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * size),
                rows_per_image: Some(size),
            },
            wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
        );
    }

    texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some(label),
        dimension: Some(dimension),
        ..Default::default()
    })
}

fn upload_texture_array(device: &wgpu::Device, queue: &wgpu::Queue, layers: &[RgbaImage]) -> wgpu::TextureView {
    let size = layers.first().map(|l| l.width()).unwrap_or(1);
    upload_layers(
        device,
        queue,
        "Scene Textures",
        layers,
        size,
        wgpu::TextureViewDimension::D2Array,
    )
}

fn upload_cube_map(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    faces: &[RgbaImage],
    size: u32,
) -> wgpu::TextureView {
    if faces.len() != 6 {
        log::warn!("Skybox has {} faces, expected 6", faces.len());
    }
    // A cube view needs exactly six layers
    let mut padded: Vec<RgbaImage> = faces.iter().take(6).cloned().collect();
    padded.resize_with(6, || RgbaImage::new(size, size));
    upload_layers(
        device,
        queue,
        "Skybox",
        &padded,
        size,
        wgpu::TextureViewDimension::Cube,
    )
}

fn create_skybox_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniforms: &wgpu::Buffer,
    cube_view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Skybox Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(cube_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{frame_camera, OrbitCamera, ViewMode};
    use crate::params::{ChaseCamera, FogParams, RainParams, RenderConfig};
    use crate::vehicle::CarState;
    use crate::weather::TimeOfDay;

    fn frame() -> FrameCamera {
        frame_camera(
            ViewMode::Orbit,
            &OrbitCamera::default(),
            &CarState::default(),
            &ChaseCamera::default(),
            &RenderConfig::default(),
        )
    }

    #[test]
    fn test_uniform_sizes_are_16_byte_multiples() {
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<SkyboxUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<RainUniforms>() % 16, 0);
    }

    #[test]
    fn test_scene_uniforms_flag_lighting() {
        let fog = Fog::select(&FogParams::default(), TimeOfDay::Night, ViewMode::Orbit);
        let levels = LightLevels {
            ambient: 0.35,
            diffuse: 0.56,
            specular: 0.8,
        };
        let lit = SceneUniforms::new(&frame(), Some((Vec3::new(0.0, 4.0, 6.0), levels)), &fog);
        assert_eq!(lit.light_position, [0.0, 4.0, 6.0, 1.0]);
        assert_eq!(lit.light_levels[1], 0.56);
        assert_eq!(lit.fog[0], 1.0);

        let unlit = SceneUniforms::new(&frame(), None, &fog);
        assert_eq!(unlit.light_position[3], 0.0);
    }

    #[test]
    fn test_rain_uniforms_carry_clock() {
        let mut rain = RainField::new(
            RainParams {
                drop_count: 4,
                ..Default::default()
            },
            1,
        );
        rain.advance();
        rain.advance();
        let fog = Fog::select(&FogParams::default(), TimeOfDay::Day, ViewMode::Orbit);
        let u = RainUniforms::new(&frame(), &rain, &fog);
        assert_eq!(u.timing[1], rain.time);
        assert_eq!(u.motion[0], rain.params.height);
        assert_eq!(u.fog, [0.0; 4]);
    }
}
