//! Shader management.
//!
//! Each [`ShaderType`] is one shader configuration: its own WGSL program,
//! vertex format, render pipeline and camera uniform buffer. All of them share
//! the transform matrix table at group 1.

use std::collections::HashMap;

use crate::batcher::BatchVertex;
use crate::buffer::{create_uniform_buffer, update_buffer};
use crate::camera::CameraUniforms;
use crate::error::{RenderError, RenderResult};
use crate::pick::{DEPTH_FORMAT, PICKING_FORMAT};
use pickscene_core::{ColoredVertex, ObjectIdVertex};

/// A shader configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderType {
    /// Visible pass with per-vertex colors.
    ColoredVertex,
    /// Id-pass writing into the picking target.
    ObjectId,
}

impl ShaderType {
    /// Every configuration.
    pub const ALL: [ShaderType; 2] = [ShaderType::ColoredVertex, ShaderType::ObjectId];

    /// Debug label.
    pub fn label(self) -> &'static str {
        match self {
            ShaderType::ColoredVertex => "colored vertex",
            ShaderType::ObjectId => "object id",
        }
    }

    /// Embedded WGSL source.
    pub fn source(self) -> &'static str {
        match self {
            ShaderType::ColoredVertex => include_str!("shaders/colored_vertex.wgsl"),
            ShaderType::ObjectId => include_str!("shaders/object_id.wgsl"),
        }
    }

    fn vertex_layout(self) -> wgpu::VertexBufferLayout<'static> {
        match self {
            ShaderType::ColoredVertex => ColoredVertex::layout(),
            ShaderType::ObjectId => ObjectIdVertex::layout(),
        }
    }
}

/// Builder for shader modules.
pub struct ShaderBuilder {
    source: Option<String>,
    label: Option<String>,
}

impl ShaderBuilder {
    /// Creates a new shader builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            label: None,
        }
    }

    /// Sets the WGSL source. Entry points are `vs_main` and `fs_main`.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the shader label for debugging.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builds the shader module.
    pub fn build_module(self, device: &wgpu::Device) -> RenderResult<wgpu::ShaderModule> {
        let source = self
            .source
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| RenderError::ShaderCompilationFailed("missing shader source".into()))?;

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: self.label.as_deref(),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        }))
    }
}

impl Default for ShaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct CompiledShader {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
}

/// One pipeline and camera uniform buffer per [`ShaderType`].
pub struct ShaderCache {
    shaders: HashMap<ShaderType, CompiledShader>,
}

impl ShaderCache {
    /// Compiles every configuration.
    ///
    /// `color_format` is the visible pass target; the id-pass always renders
    /// to [`PICKING_FORMAT`].
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        matrix_table_layout: &wgpu::BindGroupLayout,
        polygon_mode: wgpu::PolygonMode,
    ) -> RenderResult<Self> {
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("camera bind group layout"),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("batched draw pipeline layout"),
            bind_group_layouts: &[&camera_bind_group_layout, matrix_table_layout],
            push_constant_ranges: &[],
        });

        let mut shaders = HashMap::new();
        for ty in ShaderType::ALL {
            let (format, blend, mode) = match ty {
                ShaderType::ColoredVertex => {
                    (color_format, Some(wgpu::BlendState::REPLACE), polygon_mode)
                }
                ShaderType::ObjectId => (PICKING_FORMAT, None, wgpu::PolygonMode::Fill),
            };

            let module = ShaderBuilder::new()
                .with_source(ty.source())
                .with_label(ty.label())
                .build_module(device)?;

            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(ty.label()),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some("vs_main"),
                    buffers: &[ty.vertex_layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: mode,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

            let camera_buffer = create_uniform_buffer(
                device,
                &CameraUniforms::default(),
                Some(&format!("{} camera uniforms", ty.label())),
            );
            let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{} camera bind group", ty.label())),
                layout: &camera_bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

            log::debug!("compiled {} shader ({mode:?})", ty.label());
            shaders.insert(
                ty,
                CompiledShader {
                    pipeline,
                    camera_buffer,
                    camera_bind_group,
                },
            );
        }

        Ok(Self { shaders })
    }

    fn get(&self, ty: ShaderType) -> &CompiledShader {
        // every ShaderType is inserted in `new`
        &self.shaders[&ty]
    }

    /// Writes the camera uniforms of one configuration.
    pub fn set_camera(&self, queue: &wgpu::Queue, ty: ShaderType, uniforms: &CameraUniforms) {
        update_buffer(queue, &self.get(ty).camera_buffer, std::slice::from_ref(uniforms));
    }

    /// Writes the same camera uniforms to every configuration.
    pub fn set_camera_all(&self, queue: &wgpu::Queue, uniforms: &CameraUniforms) {
        for ty in ShaderType::ALL {
            self.set_camera(queue, ty, uniforms);
        }
    }

    /// The render pipeline of one configuration.
    pub fn pipeline(&self, ty: ShaderType) -> &wgpu::RenderPipeline {
        &self.get(ty).pipeline
    }

    /// The camera bind group (group 0) of one configuration.
    pub fn camera_bind_group(&self, ty: ShaderType) -> &wgpu::BindGroup {
        &self.get(ty).camera_bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_declare_both_groups() {
        for ty in ShaderType::ALL {
            let source = ty.source();
            assert!(source.contains("@group(0) @binding(0)"), "{}", ty.label());
            assert!(
                source.contains("@group(1) @binding(0) var<uniform> local_to_world: array<mat4x4<f32>, 1024>"),
                "{}",
                ty.label()
            );
            assert!(source.contains("fn vs_main"));
            assert!(source.contains("fn fs_main"));
        }
    }

    #[test]
    fn test_object_id_shader_writes_integers() {
        assert!(ShaderType::ObjectId.source().contains("vec4<u32>"));
    }

    #[test]
    fn test_vertex_layout_strides() {
        assert_eq!(
            ShaderType::ObjectId.vertex_layout().array_stride,
            std::mem::size_of::<ObjectIdVertex>() as u64
        );
        assert_eq!(
            ShaderType::ColoredVertex.vertex_layout().array_stride,
            std::mem::size_of::<ColoredVertex>() as u64
        );
    }
}
