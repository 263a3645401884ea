//! GPU copy of the transform matrix table.

use std::num::NonZeroU64;

use pickscene_core::TransformMatrixTable;
use wgpu::util::DeviceExt;

/// Bind group index of the matrix table in every pipeline.
pub const MATRIX_TABLE_GROUP: u32 = 1;

/// Uniform buffer holding the whole [`TransformMatrixTable`].
pub struct MatrixTableBuffer {
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl MatrixTableBuffer {
    /// Size of the uniform binding in bytes.
    pub const SIZE: u64 = TransformMatrixTable::BYTE_SIZE as u64;

    /// Creates the buffer with `table` as its initial contents.
    pub fn new(device: &wgpu::Device, table: &TransformMatrixTable) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("transform matrix table"),
            contents: table.as_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = Self::create_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("transform matrix table bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    /// Layout shared by every shader configuration.
    pub fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("transform matrix table layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(Self::SIZE),
                },
                count: None,
            }],
        })
    }

    /// Writes the entire table.
    pub fn upload(&self, queue: &wgpu::Queue, table: &TransformMatrixTable) {
        queue.write_buffer(&self.buffer, 0, table.as_bytes());
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_size_matches_shader_array() {
        // array<mat4x4<f32>, 1024>
        assert_eq!(MatrixTableBuffer::SIZE, 1024 * 64);
    }
}
