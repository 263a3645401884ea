//! GPU side of batched drawing.
//!
//! A [`BatchRenderer`] owns one [`DrawBatch`] plus the vertex and index
//! buffers it is flushed into. Queue draws through the batch (the renderer
//! derefs to it), then call [`BatchRenderer::draw_everything`] once per pass.

use std::ops::{Deref, DerefMut};

use pickscene_core::{ColoredVertex, DrawBatch, FlushStats, ObjectIdVertex};

use crate::buffer::GrowableBuffer;
use crate::matrix_buffer::{MatrixTableBuffer, MATRIX_TABLE_GROUP};
use crate::shader::{ShaderCache, ShaderType};

/// A vertex format drawn by exactly one shader configuration.
pub trait BatchVertex: bytemuck::Pod {
    /// The configuration that consumes this format.
    const SHADER: ShaderType;

    /// Vertex buffer layout matching the shader's `VertexInput`.
    fn layout() -> wgpu::VertexBufferLayout<'static>;
}

impl BatchVertex for ObjectIdVertex {
    const SHADER: ShaderType = ShaderType::ObjectId;

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Uint32, 2 => Uint32];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

impl BatchVertex for ColoredVertex {
    const SHADER: ShaderType = ShaderType::ColoredVertex;

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Uint32];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Initial buffer sizes, enough for a handful of small meshes.
const INITIAL_VERTEX_BYTES: usize = 16 * 1024;
const INITIAL_INDEX_BYTES: usize = 16 * 1024;

/// Staging plus GPU buffers for one shader configuration.
pub struct BatchRenderer<V> {
    batch: DrawBatch<V>,
    vertex_buffer: GrowableBuffer,
    index_buffer: GrowableBuffer,
}

impl<V: BatchVertex> BatchRenderer<V> {
    pub fn new(device: &wgpu::Device) -> Self {
        let label = V::SHADER.label();
        Self {
            batch: DrawBatch::new(),
            vertex_buffer: GrowableBuffer::new(
                device,
                &format!("{label} batch vertices"),
                INITIAL_VERTEX_BYTES,
                wgpu::BufferUsages::VERTEX,
            ),
            index_buffer: GrowableBuffer::new(
                device,
                &format!("{label} batch indices"),
                INITIAL_INDEX_BYTES,
                wgpu::BufferUsages::INDEX,
            ),
        }
    }

    /// Uploads everything queued and draws it with one indexed call.
    ///
    /// The batch is empty afterwards. An empty batch records nothing.
    pub fn draw_everything(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pass: &mut wgpu::RenderPass<'_>,
        shaders: &ShaderCache,
        matrices: &MatrixTableBuffer,
    ) -> FlushStats {
        let prepared = self.batch.take();
        if prepared.is_empty() {
            return FlushStats::default();
        }

        self.vertex_buffer.write(device, queue, &prepared.vertices);
        self.index_buffer.write(device, queue, &prepared.indices);

        pass.set_pipeline(shaders.pipeline(V::SHADER));
        pass.set_bind_group(0, shaders.camera_bind_group(V::SHADER), &[]);
        pass.set_bind_group(MATRIX_TABLE_GROUP, matrices.bind_group(), &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice());
        pass.set_index_buffer(self.index_buffer.slice(), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..prepared.indices.len() as u32, 0, 0..1);

        let stats = prepared.stats(1);
        log::trace!("{} flush: {stats:?}", V::SHADER.label());
        stats
    }
}

impl<V> Deref for BatchRenderer<V> {
    type Target = DrawBatch<V>;

    fn deref(&self) -> &Self::Target {
        &self.batch
    }
}

impl<V> DerefMut for BatchRenderer<V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.batch
    }
}

/// One [`BatchRenderer`] per shader configuration.
pub struct Batcher {
    pub object_id: BatchRenderer<ObjectIdVertex>,
    pub colored_vertex: BatchRenderer<ColoredVertex>,
}

impl Batcher {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            object_id: BatchRenderer::new(device),
            colored_vertex: BatchRenderer::new(device),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_layout_offsets() {
        let layout = ObjectIdVertex::layout();
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 16]);
        assert_eq!(layout.array_stride, 20);
    }

    #[test]
    fn test_colored_layout_offsets() {
        let layout = ColoredVertex::layout();
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        assert_eq!(layout.array_stride, 28);
    }

    #[test]
    fn test_vertex_formats_map_to_distinct_shaders() {
        assert_ne!(ObjectIdVertex::SHADER, ColoredVertex::SHADER);
    }
}
