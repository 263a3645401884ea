//! Fixed-capacity table of model-to-world matrices.
//!
//! The layout mirrors the uniform buffer the shaders read: `CAPACITY`
//! column-major `mat4x4<f32>` values indexed by object id. The whole table is
//! uploaded every frame regardless of how many slots changed.

use glam::Mat4;

use crate::error::{Result, SceneError};
use crate::object::ObjectId;

/// Number of matrix slots, including the reserved slot 0.
pub const CAPACITY: usize = 1024;

/// Model-to-world matrices, one slot per object identifier.
///
/// Slot 0 and every slot not explicitly set hold the identity matrix.
#[derive(Debug, Clone)]
pub struct TransformMatrixTable {
    matrices: Box<[Mat4]>,
}

impl Default for TransformMatrixTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformMatrixTable {
    /// Size of the whole table in bytes, as uploaded to the GPU.
    pub const BYTE_SIZE: usize = CAPACITY * std::mem::size_of::<Mat4>();

    /// Creates a table with every slot set to identity.
    pub fn new() -> Self {
        Self {
            matrices: vec![Mat4::IDENTITY; CAPACITY].into_boxed_slice(),
        }
    }

    /// Replaces the matrix for `id`.
    pub fn set(&mut self, id: ObjectId, matrix: Mat4) {
        self.matrices[id.index()] = matrix;
    }

    /// Returns the matrix for `id`.
    pub fn get(&self, id: ObjectId) -> Mat4 {
        self.matrices[id.index()]
    }

    /// Restores identity in the slot for `id`.
    pub fn reset(&mut self, id: ObjectId) {
        self.matrices[id.index()] = Mat4::IDENTITY;
    }

    /// Replaces a slot by raw index, rejecting slot 0 and anything past the table.
    pub fn try_set_raw(&mut self, index: usize, matrix: Mat4) -> Result<()> {
        if index == 0 {
            return Err(SceneError::ReservedObjectId);
        }
        let slot = self
            .matrices
            .get_mut(index)
            .ok_or(SceneError::ObjectIdOutOfRange {
                id: index,
                capacity: CAPACITY,
            })?;
        *slot = matrix;
        Ok(())
    }

    /// Replaces a slot by raw index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0 or not below [`CAPACITY`].
    pub fn set_raw(&mut self, index: usize, matrix: Mat4) {
        if let Err(e) = self.try_set_raw(index, matrix) {
            panic!("transform matrix table: {e}");
        }
    }

    /// The whole table in upload order.
    pub fn as_slice(&self) -> &[Mat4] {
        &self.matrices
    }

    /// The whole table as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.matrices[..])
    }
}
