//! Vertex formats, one per shader configuration.
//!
//! Both formats carry the object id per vertex: the shaders use it to index
//! the transform matrix table, and the id-pass writes it to the picking target.

use glam::Vec3;

/// Vertex of the id-pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectIdVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object id tag, also the matrix table slot.
    pub object_id: u32,
    /// 1-based position of the owning request within its batch flush.
    pub draw_id: u32,
}

impl ObjectIdVertex {
    /// Creates an id-pass vertex.
    pub fn new(position: Vec3, object_id: u32, draw_id: u32) -> Self {
        Self {
            position: position.to_array(),
            object_id,
            draw_id,
        }
    }
}

/// Vertex of the visible, per-vertex colored pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColoredVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Object id tag, also the matrix table slot.
    pub object_id: u32,
}

impl ColoredVertex {
    /// Creates a colored vertex.
    pub fn new(position: Vec3, color: Vec3, object_id: u32) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
            object_id,
        }
    }
}
