//! The main rendering engine.

mod textures;

use std::sync::Arc;

use pickscene_core::{FlushStats, Options, PixelInfo, TransformMatrixTable};

use crate::batcher::Batcher;
use crate::camera::CameraUniforms;
use crate::error::{RenderError, RenderResult};
use crate::matrix_buffer::MatrixTableBuffer;
use crate::pick::{PickingTarget, PixelReader};
use crate::shader::ShaderCache;

/// The texture a frame's visible pass renders into.
pub struct FrameTarget {
    surface_texture: Option<wgpu::SurfaceTexture>,
    /// View of the color target.
    pub view: wgpu::TextureView,
}

/// The main rendering engine backed by wgpu.
pub struct RenderEngine {
    /// The wgpu instance.
    pub instance: wgpu::Instance,
    /// The wgpu adapter.
    pub adapter: wgpu::Adapter,
    /// The wgpu device.
    pub device: wgpu::Device,
    /// The wgpu queue.
    pub queue: wgpu::Queue,
    /// The render surface (None for headless).
    pub surface: Option<wgpu::Surface<'static>>,
    /// Surface configuration.
    pub surface_config: wgpu::SurfaceConfiguration,
    /// Depth texture of the visible pass.
    pub depth_texture: wgpu::Texture,
    /// Depth texture view.
    pub depth_view: wgpu::TextureView,
    /// Color target used instead of the surface when headless.
    headless_target: Option<(wgpu::Texture, wgpu::TextureView)>,
    /// Off-screen id attachments.
    pub picking: PickingTarget,
    /// Pipelines and camera uniforms per shader configuration.
    pub shaders: ShaderCache,
    /// GPU copy of the transform matrix table.
    pub matrices: MatrixTableBuffer,
    /// Batched draw staging per shader configuration.
    pub batcher: Batcher,
    /// Current viewport width.
    pub width: u32,
    /// Current viewport height.
    pub height: u32,
    /// Clear color of the visible pass.
    pub clear_color: wgpu::Color,
}

/// Device features and limits this engine needs from `adapter`.
fn device_descriptor(
    adapter: &wgpu::Adapter,
    label: &'static str,
    wireframe: bool,
) -> wgpu::DeviceDescriptor<'static> {
    let mut required_features = wgpu::Features::empty();
    if wireframe {
        if adapter.features().contains(wgpu::Features::POLYGON_MODE_LINE) {
            required_features |= wgpu::Features::POLYGON_MODE_LINE;
        } else {
            log::warn!("adapter does not support line polygon mode, drawing filled");
        }
    }

    wgpu::DeviceDescriptor {
        label: Some(label),
        required_features,
        required_limits: wgpu::Limits {
            max_uniform_buffer_binding_size: MatrixTableBuffer::SIZE as u32,
            ..wgpu::Limits::downlevel_defaults()
        }
        .using_resolution(adapter.limits()),
        memory_hints: wgpu::MemoryHints::default(),
        trace: wgpu::Trace::Off,
        experimental_features: wgpu::ExperimentalFeatures::default(),
    }
}

impl RenderEngine {
    /// Creates a new windowed render engine.
    pub async fn new_windowed(
        window: Arc<winit::window::Window>,
        options: &Options,
    ) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&device_descriptor(&adapter, "pickscene device", options.wireframe))
            .await?;

        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::SurfaceConfigurationFailed)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(RenderError::SurfaceConfigurationFailed)?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        Self::assemble(
            instance,
            adapter,
            device,
            queue,
            Some(surface),
            surface_config,
            options,
        )
    }

    /// Creates a new headless render engine.
    pub async fn new_headless(width: u32, height: u32, options: &Options) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) = adapter
            .request_device(&device_descriptor(
                &adapter,
                "pickscene device (headless)",
                options.wireframe,
            ))
            .await?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            format: textures::HEADLESS_FORMAT,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        Self::assemble(instance, adapter, device, queue, None, surface_config, options)
    }

    fn assemble(
        instance: wgpu::Instance,
        adapter: wgpu::Adapter,
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: Option<wgpu::Surface<'static>>,
        surface_config: wgpu::SurfaceConfiguration,
        options: &Options,
    ) -> RenderResult<Self> {
        let (width, height) = (surface_config.width, surface_config.height);
        let (depth_texture, depth_view) = Self::create_depth_texture(&device, width, height);
        let headless_target = surface
            .is_none()
            .then(|| Self::create_headless_target(&device, width, height));

        let wireframe =
            options.wireframe && device.features().contains(wgpu::Features::POLYGON_MODE_LINE);
        let polygon_mode = if wireframe {
            wgpu::PolygonMode::Line
        } else {
            wgpu::PolygonMode::Fill
        };

        let matrices = MatrixTableBuffer::new(&device, &TransformMatrixTable::new());
        let shaders = ShaderCache::new(
            &device,
            surface_config.format,
            matrices.bind_group_layout(),
            polygon_mode,
        )?;
        let batcher = Batcher::new(&device);

        let mut picking = PickingTarget::new();
        picking.initialize(&device, width, height)?;

        let clear = options.clear_color.as_dvec3();
        log::info!("render engine ready at {width}x{height} (wireframe: {wireframe})");

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            surface,
            surface_config,
            depth_texture,
            depth_view,
            headless_target,
            picking,
            shaders,
            matrices,
            batcher,
            width,
            height,
            clear_color: wgpu::Color {
                r: clear.x,
                g: clear.y,
                b: clear.z,
                a: 1.0,
            },
        })
    }

    /// Resizes every render target, including the picking target.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }

        self.width = width;
        self.height = height;
        self.surface_config.width = width;
        self.surface_config.height = height;

        if let Some(ref surface) = self.surface {
            surface.configure(&self.device, &self.surface_config);
        }

        let (depth_texture, depth_view) = Self::create_depth_texture(&self.device, width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;

        if self.headless_target.is_some() {
            self.headless_target = Some(Self::create_headless_target(&self.device, width, height));
        }

        self.picking.resize(&self.device, width, height)
    }

    /// Reconfigures the surface at the current size after it was lost or outdated.
    pub fn reconfigure(&mut self) {
        if let Some(ref surface) = self.surface {
            surface.configure(&self.device, &self.surface_config);
        }
    }

    /// Returns the viewport dimensions.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Gets the texture the next visible pass renders into.
    pub fn acquire_frame(&self) -> RenderResult<FrameTarget> {
        if let Some(ref surface) = self.surface {
            let surface_texture = surface.get_current_texture()?;
            let view = surface_texture
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            return Ok(FrameTarget {
                surface_texture: Some(surface_texture),
                view,
            });
        }

        let (_, view) = self
            .headless_target
            .as_ref()
            .ok_or(RenderError::SurfaceConfigurationFailed)?;
        Ok(FrameTarget {
            surface_texture: None,
            view: view.clone(),
        })
    }

    /// Presents a windowed frame. Headless frames are simply dropped.
    pub fn present(&self, frame: FrameTarget) {
        if let Some(surface_texture) = frame.surface_texture {
            surface_texture.present();
        }
    }

    /// Creates a command encoder.
    pub fn create_encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }

    /// Submits recorded work.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Begins a render pass.
    ///
    /// While picking target writing is enabled the pass renders into the
    /// picking target; otherwise it clears and renders into `frame`.
    pub fn begin_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        frame: &FrameTarget,
    ) -> RenderResult<wgpu::RenderPass<'e>> {
        if self.picking.is_writing() {
            return self.picking.begin_pass(encoder);
        }

        Ok(encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("visible pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
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
        }))
    }

    /// Writes the camera uniforms of every shader configuration.
    pub fn set_camera(&self, uniforms: &CameraUniforms) {
        self.shaders.set_camera_all(&self.queue, uniforms);
    }

    /// Uploads the whole transform matrix table.
    pub fn upload_matrices(&self, table: &TransformMatrixTable) {
        self.matrices.upload(&self.queue, table);
    }

    /// Flushes the id-pass batch into `pass`.
    pub fn flush_object_ids(&mut self, pass: &mut wgpu::RenderPass<'_>) -> FlushStats {
        self.batcher.object_id.draw_everything(
            &self.device,
            &self.queue,
            pass,
            &self.shaders,
            &self.matrices,
        )
    }

    /// Flushes the colored batch into `pass`.
    pub fn flush_colored(&mut self, pass: &mut wgpu::RenderPass<'_>) -> FlushStats {
        self.batcher.colored_vertex.draw_everything(
            &self.device,
            &self.queue,
            pass,
            &self.shaders,
            &self.matrices,
        )
    }

    /// Reads one texel of the picking target, origin bottom-left.
    pub fn read_pixel(&self, x: u32, y: u32) -> RenderResult<PixelInfo> {
        self.picking.read_pixel(&self.device, &self.queue, x, y)
    }

    /// A pick source over the picking target.
    pub fn pixel_reader(&self) -> PixelReader<'_> {
        self.picking.reader(&self.device, &self.queue)
    }
}
