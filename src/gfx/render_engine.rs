//! WGPU-based forward renderer for the preview card
//!
//! Provides the rendering half of a session: surface and device
//! management, the single forward pipeline, per-frame uniform updates,
//! resize handling, and explicit release of GPU resources on teardown.
//!
//! The engine supports deferred initialization: when created against a
//! zero-size host, the surface stays unconfigured and frames are skipped
//! until the first non-zero resize arrives.

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::gfx::{
    bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightRig},
    camera::CameraUniform,
    mesh::Vertex3D,
    scene::PreviewScene,
    texture::TextureResource,
};

/// Background clear color of the card's viewport
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.039,
    g: 0.039,
    b: 0.055,
    a: 1.0,
};

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    /// None after release: dropping the surface detaches it from the host
    surface: Option<wgpu::Surface<'static>>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    configured: bool,
    depth_texture: Option<TextureResource>,
    format: TextureFormat,
    pipeline: wgpu::RenderPipeline,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    transform_layout: wgpu::BindGroupLayout,
    material_layout: wgpu::BindGroupLayout,
    light_rig: LightRig,
    released: bool,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Initializes wgpu with default settings and builds the forward
    /// pipeline. If either dimension is zero the surface is left
    /// unconfigured and rendering is deferred until the first non-zero
    /// resize.
    ///
    /// # Panics
    /// Panics if unable to create a wgpu adapter or device
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> RenderEngine {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to request adapter!");

        let (device, queue) = {
            adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("WGPU Device"),
                    required_features: wgpu::Features::default(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    memory_hints: wgpu::MemoryHints::default(),
                    trace: wgpu::Trace::Off,
                })
                .await
                .expect("Failed to request a device!")
        };

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let configured = width > 0 && height > 0;
        let depth_texture = if configured {
            surface.configure(&device, &config);
            Some(TextureResource::create_depth_texture(
                &device,
                &config,
                "depth_texture",
            ))
        } else {
            log::debug!("host has zero size; deferring surface configuration");
            None
        };
        let surface = Some(surface);

        // Bind group layouts: 0 globals, 1 per-draw transform, 2 material
        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let transform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Transform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: crate::wgpu_utils::binding_types::uniform(),
                count: None,
            }],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: crate::wgpu_utils::binding_types::uniform(),
                count: None,
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("forward"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Forward Layout"),
            bind_group_layouts: &[
                global_bindings.bind_group_layouts(),
                &transform_layout,
                &material_layout,
            ],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("FORWARD"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: TextureResource::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        RenderEngine {
            surface,
            device: device.into(),
            queue: queue.into(),
            config,
            configured,
            depth_texture,
            format,
            pipeline,
            global_ubo,
            global_bindings,
            transform_layout,
            material_layout,
            light_rig: LightRig::default(),
            released: false,
        }
    }

    /// Renders a frame with an optional UI overlay
    ///
    /// Performs the forward pass over the scene, then hands the encoder
    /// to the overlay callback. Skipped entirely while the surface is
    /// unconfigured (deferred initialization) or after release.
    pub fn render_frame<F>(&mut self, scene: &PreviewScene, ui_callback: Option<F>)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        if self.released || !self.configured {
            log::debug!("skipping frame: surface not ready");
            return;
        }
        let (Some(surface), Some(depth_texture)) = (&self.surface, &self.depth_texture) else {
            return;
        };

        let surface_texture = match surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(&self.device, &self.config);
                return;
            }
            Err(err) => {
                log::warn!("failed to acquire surface texture: {:?}", err);
                return;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, self.global_bindings.bind_groups(), &[]);
            scene.draw(&mut render_pass);
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Updates the camera and light uniform buffer
    ///
    /// Should be called each frame with the current camera data.
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            camera_uniform,
            self.light_rig,
        );
    }

    /// Resizes the render surface and recreates the depth buffer
    ///
    /// A zero dimension is ignored. Also completes deferred
    /// initialization after a zero-size start.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.released {
            return;
        }
        if width == 0 || height == 0 {
            return;
        }
        let Some(surface) = &self.surface else {
            return;
        };

        self.config.width = width;
        self.config.height = height;
        surface.configure(&self.device, &self.config);

        if let Some(depth) = self.depth_texture.take() {
            depth.destroy();
        }
        self.depth_texture = Some(TextureResource::create_depth_texture(
            &self.device,
            &self.config,
            "depth_texture",
        ));
        self.configured = true;
    }

    /// Detaches the surface and destroys the engine's own GPU resources.
    /// Idempotent; rendering after release is a no-op.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.global_ubo.destroy();
        if let Some(depth) = self.depth_texture.take() {
            depth.destroy();
        }
        self.surface = None;
    }

    /// Returns current surface dimensions
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Returns reference to the wgpu device
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns reference to the wgpu command queue
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Layout for per-draw transform bind groups (slot 1)
    pub fn transform_layout(&self) -> &wgpu::BindGroupLayout {
        &self.transform_layout
    }

    /// Layout for material bind groups (slot 2)
    pub fn material_layout(&self) -> &wgpu::BindGroupLayout {
        &self.material_layout
    }
}
