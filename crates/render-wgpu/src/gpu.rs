use crate::frame::{
    LineVertex, ObjectUniforms, SHADOW_MAP_SIZE, SceneUniforms, Vertex, axes_vertices,
    mesh_object_uniforms, model_object_uniforms, scene_uniforms, vertices,
};
use crate::shaders;
use diorama_common::NodeId;
use diorama_render::{
    DEFAULT_CAMERA_ASPECT, DrawingBuffer, Engine, RenderError, clear_color, resize_to_display,
};
use diorama_scene::{PerspectiveCamera, Scene, SceneObject, Side};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

const SAMPLE_COUNT: u32 = 4;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Everything an overlay needs to draw on top of a finished frame.
pub struct OverlayTarget<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub view: &'a wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub size_in_pixels: [u32; 2],
}

/// Extra drawing done after the scene, before the frame is presented.
pub trait Overlay {
    fn draw(&mut self, target: OverlayTarget<'_>);
}

impl Overlay for () {
    fn draw(&mut self, _target: OverlayTarget<'_>) {}
}

/// Buffers for one drawable part of a node.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    double_sided: bool,
    cast_shadow: bool,
    generation: u64,
}

struct AxesLines {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

struct Pipelines {
    front: wgpu::RenderPipeline,
    double_sided: wgpu::RenderPipeline,
    shadow: wgpu::RenderPipeline,
    lines: wgpu::RenderPipeline,
    object_layout: wgpu::BindGroupLayout,
}

/// GPU state created by [`Engine::initialize`].
struct Gpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipelines: Pipelines,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    shadow_scene_bind_group: wgpu::BindGroup,
    shadow_view: wgpu::TextureView,
    color_target: wgpu::TextureView,
    depth_target: wgpu::TextureView,
    meshes: BTreeMap<(NodeId, usize), GpuMesh>,
    axes: BTreeMap<NodeId, AxesLines>,
}

/// wgpu engine drawing a [`Scene`] into a window surface, with 4x MSAA and
/// a shadow map for the first shadow-casting directional light.
pub struct WgpuEngine<O: Overlay = ()> {
    instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    buffer: DrawingBuffer,
    display: (u32, u32),
    camera_aspect: f32,
    gpu: Option<Gpu>,
    overlay: O,
}

impl WgpuEngine {
    /// `display` is the current size of the window, in physical pixels.
    pub fn new(instance: wgpu::Instance, surface: wgpu::Surface<'static>, display: (u32, u32)) -> Self {
        Self::with_overlay(instance, surface, display, ())
    }
}

impl<O: Overlay> WgpuEngine<O> {
    pub fn with_overlay(
        instance: wgpu::Instance,
        surface: wgpu::Surface<'static>,
        display: (u32, u32),
        overlay: O,
    ) -> Self {
        Self {
            instance,
            surface,
            buffer: DrawingBuffer::new(300, 150),
            display,
            camera_aspect: DEFAULT_CAMERA_ASPECT,
            gpu: None,
            overlay,
        }
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut O {
        &mut self.overlay
    }

    pub fn surface_format(&self) -> Option<wgpu::TextureFormat> {
        self.gpu.as_ref().map(|gpu| gpu.config.format)
    }

    pub fn drawing_buffer(&self) -> DrawingBuffer {
        self.buffer
    }
}

impl<O: Overlay> Engine for WgpuEngine<O> {
    fn initialize(&mut self) -> Result<(), RenderError> {
        let adapter = pollster::block_on(self.instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&self.surface),
                force_fallback_adapter: false,
            },
        ))
        .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("diorama_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::Device(e.to_string()))?;

        let caps = self.surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Surface("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: self.buffer.width.max(1),
            height: self.buffer.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        self.surface.configure(&device, &config);

        self.gpu = Some(Gpu::new(device, queue, config));
        tracing::info!(
            "GPU initialized with {} backend, {format:?}, shadow maps enabled",
            adapter.get_info().backend.to_str()
        );
        Ok(())
    }

    fn update(&mut self, _elapsed_ms: f64) {}

    fn render(
        &mut self,
        scene: &Scene,
        camera: &mut PerspectiveCamera,
    ) -> Result<(), RenderError> {
        let gpu = self.gpu.as_mut().ok_or(RenderError::NotInitialized)?;

        if resize_to_display(&mut self.buffer, self.display, &mut self.camera_aspect, camera) {
            gpu.resize(&self.surface, self.buffer.width, self.buffer.height);
        }

        gpu.sync_scene(scene);
        gpu.queue.write_buffer(
            &gpu.scene_buffer,
            0,
            bytemuck::bytes_of(&scene_uniforms(scene, camera)),
        );

        let output = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost, reconfiguring");
                self.surface.configure(&gpu.device, &gpu.config);
                return Ok(());
            }
            Err(e) => return Err(RenderError::Surface(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        gpu.encode_shadow_pass(&mut encoder);
        gpu.encode_main_pass(&mut encoder, &view);
        self.overlay.draw(OverlayTarget {
            device: &gpu.device,
            queue: &gpu.queue,
            encoder: &mut encoder,
            view: &view,
            format: gpu.config.format,
            size_in_pixels: [gpu.config.width, gpu.config.height],
        });
        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn camera_aspect(&self) -> f32 {
        self.camera_aspect
    }

    fn set_display_size(&mut self, width: u32, height: u32) {
        self.display = (width, height);
    }
}

impl Gpu {
    fn new(device: wgpu::Device, queue: wgpu::Queue, config: wgpu::SurfaceConfiguration) -> Self {
        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let shadow_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow_map"),
            size: wgpu::Extent3d {
                width: SHADOW_MAP_SIZE,
                height: SHADOW_MAP_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let shadow_view = shadow_texture.create_view(&Default::default());
        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let uniform_entry = |binding: u32, visibility: wgpu::ShaderStages| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });
        let shadow_scene_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("shadow_scene_layout"),
                entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
            });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout: &scene_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow_sampler),
                },
            ],
        });
        let shadow_scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_scene_bind_group"),
            layout: &shadow_scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let pipelines = Pipelines::new(
            &device,
            config.format,
            &scene_layout,
            &shadow_scene_layout,
            object_layout,
        );
        let (color_target, depth_target) =
            create_frame_targets(&device, config.format, config.width, config.height);

        Self {
            device,
            queue,
            config,
            pipelines,
            scene_buffer,
            scene_bind_group,
            shadow_scene_bind_group,
            shadow_view,
            color_target,
            depth_target,
            meshes: BTreeMap::new(),
            axes: BTreeMap::new(),
        }
    }

    fn resize(&mut self, surface: &wgpu::Surface<'static>, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        surface.configure(&self.device, &self.config);
        let (color, depth) = create_frame_targets(
            &self.device,
            self.config.format,
            self.config.width,
            self.config.height,
        );
        self.color_target = color;
        self.depth_target = depth;
    }

    /// Create buffers for new nodes, refresh transforms and posed vertices,
    /// and drop buffers of removed nodes.
    fn sync_scene(&mut self, scene: &Scene) {
        self.meshes.retain(|(id, _), _| scene.get(*id).is_some());
        self.axes.retain(|id, _| scene.get(*id).is_some());

        for (id, node) in scene.nodes() {
            match &node.object {
                SceneObject::Mesh {
                    geometry,
                    material,
                    cast_shadow,
                    receive_shadow,
                } => {
                    let uniforms = mesh_object_uniforms(&node.transform, material, *receive_shadow);
                    if !self.meshes.contains_key(&(id, 0)) {
                        let data = geometry.build();
                        let mesh = self.create_mesh(
                            &vertices(&data.positions, &data.normals),
                            &data.indices,
                            &uniforms,
                            material.side() == Side::Double,
                            *cast_shadow,
                        );
                        self.meshes.insert((id, 0), mesh);
                    }
                    if let Some(mesh) = self.meshes.get(&(id, 0)) {
                        self.queue
                            .write_buffer(&mesh.object_buffer, 0, bytemuck::bytes_of(&uniforms));
                    }
                }
                SceneObject::Model(model) => {
                    for (part, (skinned, posed)) in
                        model.meshes.iter().zip(model.posed()).enumerate()
                    {
                        let uniforms = model_object_uniforms(
                            &node.transform,
                            skinned.base_color,
                            model.receive_shadow,
                        );
                        let verts = vertices(&posed.positions, &posed.normals);
                        match self.meshes.get_mut(&(id, part)) {
                            Some(mesh) => {
                                if mesh.generation != model.generation() {
                                    self.queue.write_buffer(
                                        &mesh.vertex_buffer,
                                        0,
                                        bytemuck::cast_slice(&verts),
                                    );
                                    mesh.generation = model.generation();
                                }
                                self.queue.write_buffer(
                                    &mesh.object_buffer,
                                    0,
                                    bytemuck::bytes_of(&uniforms),
                                );
                            }
                            None => {
                                let mut mesh = self.create_mesh(
                                    &verts,
                                    &skinned.indices,
                                    &uniforms,
                                    false,
                                    model.cast_shadow,
                                );
                                mesh.generation = model.generation();
                                self.meshes.insert((id, part), mesh);
                            }
                        }
                    }
                }
                SceneObject::AxesHelper { size } => {
                    if !self.axes.contains_key(&id) {
                        let lines: Vec<LineVertex> = axes_vertices(*size, &node.transform);
                        let vertex_buffer =
                            self.device
                                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                                    label: Some("axes_vertices"),
                                    contents: bytemuck::cast_slice(&lines),
                                    usage: wgpu::BufferUsages::VERTEX,
                                });
                        self.axes.insert(
                            id,
                            AxesLines {
                                vertex_buffer,
                                vertex_count: lines.len() as u32,
                            },
                        );
                    }
                }
                SceneObject::Light(_) => {}
            }
        }
    }

    fn create_mesh(
        &self,
        verts: &[Vertex],
        indices: &[u32],
        uniforms: &ObjectUniforms,
        double_sided: bool,
        cast_shadow: bool,
    ) -> GpuMesh {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertices"),
                contents: bytemuck::cast_slice(verts),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_indices"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let object_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("object_uniforms"),
                contents: bytemuck::bytes_of(uniforms),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let object_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout: &self.pipelines.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_buffer.as_entire_binding(),
            }],
        });
        GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            object_buffer,
            object_bind_group,
            double_sided,
            cast_shadow,
            generation: 0,
        }
    }

    fn encode_shadow_pass(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("shadow_pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.shadow_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });
        pass.set_pipeline(&self.pipelines.shadow);
        pass.set_bind_group(0, &self.shadow_scene_bind_group, &[]);
        for mesh in self.meshes.values().filter(|m| m.cast_shadow) {
            mesh.draw(&mut pass);
        }
    }

    fn encode_main_pass(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let [r, g, b] = clear_color().to_linear();
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("main_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_target,
                resolve_target: Some(view),
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Discard,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_target,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        pass.set_bind_group(0, &self.scene_bind_group, &[]);
        for double_sided in [false, true] {
            let pipeline = if double_sided {
                &self.pipelines.double_sided
            } else {
                &self.pipelines.front
            };
            pass.set_pipeline(pipeline);
            for mesh in self.meshes.values().filter(|m| m.double_sided == double_sided) {
                mesh.draw(&mut pass);
            }
        }

        if !self.axes.is_empty() {
            pass.set_pipeline(&self.pipelines.lines);
            for axes in self.axes.values() {
                pass.set_vertex_buffer(0, axes.vertex_buffer.slice(..));
                pass.draw(0..axes.vertex_count, 0..1);
            }
        }
    }
}

impl GpuMesh {
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.object_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

impl Pipelines {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        scene_layout: &wgpu::BindGroupLayout,
        shadow_scene_layout: &wgpu::BindGroupLayout,
        object_layout: wgpu::BindGroupLayout,
    ) -> Self {
        let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[scene_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let shadow_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shadow_pipeline_layout"),
            bind_group_layouts: &[shadow_scene_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let line_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("line_pipeline_layout"),
            bind_group_layouts: &[scene_layout],
            push_constant_ranges: &[],
        });

        let phong_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("phong_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::PHONG_SHADER.into()),
        });
        let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shadow_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SHADOW_SHADER.into()),
        });
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::LINE_SHADER.into()),
        });

        let mesh_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![
                0 => Float32x3,
                1 => Float32x3,
            ],
        }];
        let shadow_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3],
        }];
        let line_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![
                0 => Float32x3,
                1 => Float32x4,
            ],
        }];

        let depth_state = |bias: wgpu::DepthBiasState| wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias,
        };
        let msaa = wgpu::MultisampleState {
            count: SAMPLE_COUNT,
            ..Default::default()
        };
        let color_targets = [Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let mesh_pipeline = |label: &'static str, cull_mode: Option<wgpu::Face>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&mesh_layout),
                vertex: wgpu::VertexState {
                    module: &phong_shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &mesh_buffers,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &phong_shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &color_targets,
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode,
                    ..Default::default()
                },
                depth_stencil: Some(depth_state(Default::default())),
                multisample: msaa,
                multiview: None,
                cache: None,
            })
        };
        let front = mesh_pipeline("phong_front_pipeline", Some(wgpu::Face::Back));
        let double_sided = mesh_pipeline("phong_double_pipeline", None);

        let shadow = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow_pipeline"),
            layout: Some(&shadow_layout),
            vertex: wgpu::VertexState {
                module: &shadow_shader,
                entry_point: Some("vs_shadow"),
                compilation_options: Default::default(),
                buffers: &shadow_buffers,
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_state(wgpu::DepthBiasState {
                constant: 2,
                slope_scale: 2.0,
                clamp: 0.0,
            })),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let lines = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line_pipeline"),
            layout: Some(&line_layout),
            vertex: wgpu::VertexState {
                module: &line_shader,
                entry_point: Some("vs_line"),
                compilation_options: Default::default(),
                buffers: &line_buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &line_shader,
                entry_point: Some("fs_line"),
                compilation_options: Default::default(),
                targets: &color_targets,
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(depth_state(Default::default())),
            multisample: msaa,
            multiview: None,
            cache: None,
        });

        Self {
            front,
            double_sided,
            shadow,
            lines,
            object_layout,
        }
    }
}

/// Multisampled color and depth attachments matching the surface size.
fn create_frame_targets(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> (wgpu::TextureView, wgpu::TextureView) {
    let size = wgpu::Extent3d {
        width: width.max(1),
        height: height.max(1),
        depth_or_array_layers: 1,
    };
    let target = |label: &'static str, format: wgpu::TextureFormat| {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size,
                mip_level_count: 1,
                sample_count: SAMPLE_COUNT,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&Default::default())
    };
    (target("msaa_color", format), target("msaa_depth", DEPTH_FORMAT))
}
