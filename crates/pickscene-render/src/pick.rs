//! Off-screen object id target.
//!
//! The id-pass renders into an unsigned-integer color attachment, one
//! `(object_id, draw_id, primitive_id, unused)` tuple per pixel, with its own
//! depth buffer so the closest object wins. A single pixel is read back on
//! demand through a small mappable staging buffer.

use pickscene_core::{PickSource, PixelInfo};

use crate::error::{RenderError, RenderResult};

/// Color format of the picking attachment.
///
/// Four channels because wgpu has no three-channel integer format; alpha is unused.
pub const PICKING_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Uint;

/// Depth format used by every pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Bytes per texel of [`PICKING_FORMAT`].
const TEXEL_BYTES: usize = 16;

/// Staging buffer size: one aligned row.
const STAGING_BYTES: u64 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as u64;

/// Lifecycle of a [`PickingTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// No attachments yet.
    Uninitialized,
    /// Attachments exist; the next pass renders to the window.
    WritingDisabled,
    /// Attachments exist; the next pass renders into this target.
    WritingEnabled,
}

/// Converts a bottom-left origin row to the texture's top-left origin row.
pub(crate) fn texture_row(height: u32, y: u32) -> u32 {
    height - 1 - y
}

struct Attachments {
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    staging: wgpu::Buffer,
}

/// Color and depth attachments the id-pass renders into.
pub struct PickingTarget {
    attachments: Option<Attachments>,
    size: (u32, u32),
    writing: bool,
}

impl Default for PickingTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl PickingTarget {
    /// Creates an uninitialized target.
    pub fn new() -> Self {
        Self {
            attachments: None,
            size: (0, 0),
            writing: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TargetState {
        match (&self.attachments, self.writing) {
            (None, _) => TargetState::Uninitialized,
            (Some(_), false) => TargetState::WritingDisabled,
            (Some(_), true) => TargetState::WritingEnabled,
        }
    }

    /// Attachment size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Creates the attachments at `width` x `height`.
    ///
    /// Any validation error raised while creating them is reported as
    /// [`RenderError::PickingTargetIncomplete`]. Writing starts disabled.
    pub fn initialize(&mut self, device: &wgpu::Device, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::PickingTargetIncomplete(format!(
                "zero-sized attachments ({width}x{height})"
            )));
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let attachments = Self::create_attachments(device, width, height);
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::PickingTargetIncomplete(err.to_string()));
        }

        self.attachments = Some(attachments);
        self.size = (width, height);
        self.writing = false;
        log::info!("picking target initialized at {width}x{height}");
        Ok(())
    }

    /// Recreates the attachments at a new size, keeping the writing state.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) -> RenderResult<()> {
        if self.attachments.is_some() && self.size == (width, height) {
            return Ok(());
        }
        let writing = self.writing;
        self.initialize(device, width, height)?;
        self.writing = writing;
        Ok(())
    }

    fn create_attachments(device: &wgpu::Device, width: u32, height: u32) -> Attachments {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("picking color"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: PICKING_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());

        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("picking depth"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("picking readback"),
            size: STAGING_BYTES,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Attachments {
            color,
            color_view,
            depth_view,
            staging,
        }
    }

    /// Routes the next pass into this target. Idempotent.
    pub fn enable_writing(&mut self) {
        self.writing = true;
    }

    /// Routes the next pass to the window again. Idempotent.
    pub fn disable_writing(&mut self) {
        self.writing = false;
    }

    /// Returns true if the next pass should render into this target.
    pub fn is_writing(&self) -> bool {
        self.state() == TargetState::WritingEnabled
    }

    /// Begins a pass into the attachments, clearing ids to 0 and depth to 1.
    pub fn begin_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
    ) -> RenderResult<wgpu::RenderPass<'e>> {
        let attachments = self
            .attachments
            .as_ref()
            .ok_or(RenderError::PickingTargetUninitialized)?;

        Ok(encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("id pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &attachments.color_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    // integer targets clear to the raw value 0
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &attachments.depth_view,
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

    /// Reads the texel at `(x, y)`, origin bottom-left.
    ///
    /// Blocks until the GPU has finished all submitted work.
    pub fn read_pixel(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        x: u32,
        y: u32,
    ) -> RenderResult<PixelInfo> {
        let attachments = self
            .attachments
            .as_ref()
            .ok_or(RenderError::PickingTargetUninitialized)?;

        let (width, height) = self.size;
        if x >= width || y >= height {
            return Err(RenderError::PixelOutOfBounds {
                x,
                y,
                width,
                height,
            });
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("picking readback encoder"),
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &attachments.color,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x,
                    y: texture_row(height, y),
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &attachments.staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );

        queue.submit(std::iter::once(encoder.finish()));

        let slice = attachments.staging.slice(..TEXEL_BYTES as u64);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            // the receiver outlives the poll below
            let _ = tx.send(result);
        });

        let mapped = device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))
            .and_then(|_| {
                rx.recv()
                    .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?
                    .map_err(|e| RenderError::ReadbackFailed(e.to_string()))
            });
        if let Err(e) = mapped {
            // cancels a still pending map so the next read can map again
            attachments.staging.unmap();
            return Err(e);
        }

        let data = slice.get_mapped_range();
        let pixel: PixelInfo =
            bytemuck::pod_read_unaligned(&data[..std::mem::size_of::<PixelInfo>()]);
        drop(data);
        attachments.staging.unmap();

        Ok(pixel)
    }

    /// A [`PickSource`] reading from this target.
    pub fn reader<'a>(&'a self, device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> PixelReader<'a> {
        PixelReader {
            target: self,
            device,
            queue,
        }
    }
}

/// Borrows a [`PickingTarget`] together with the device needed to read it.
pub struct PixelReader<'a> {
    target: &'a PickingTarget,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
}

impl PickSource for PixelReader<'_> {
    type Error = RenderError;

    fn pick(&mut self, x: u32, y: u32) -> RenderResult<PixelInfo> {
        self.target.read_pixel(self.device, self.queue, x, y)
    }
}
