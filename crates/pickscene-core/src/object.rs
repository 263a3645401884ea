//! Object identifiers and scene objects.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};
use crate::matrix_table::CAPACITY;
use crate::mesh::IndexedVertexPositions;
use crate::palette::Palette;
use crate::transform::Transform;

/// Identifier of a selectable object.
///
/// Valid values are `1..CAPACITY`. The value 0 means "no object": it is what
/// the id-pass leaves in pixels nothing was drawn to, and it is the identity
/// slot of the [`crate::TransformMatrixTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ObjectId(u32);

impl ObjectId {
    /// Smallest assignable id.
    pub const FIRST: ObjectId = ObjectId(1);

    /// Largest assignable id.
    pub const LAST: ObjectId = ObjectId(CAPACITY as u32 - 1);

    /// Creates an id, rejecting 0 and anything outside the table.
    pub fn new(raw: u32) -> Result<Self> {
        match raw {
            0 => Err(SceneError::ReservedObjectId),
            r if r as usize >= CAPACITY => Err(SceneError::ObjectIdOutOfRange {
                id: r as usize,
                capacity: CAPACITY,
            }),
            r => Ok(Self(r)),
        }
    }

    /// Interprets a value read back from the picking target.
    ///
    /// Returns `None` for background (0) and for values no object could have written.
    #[must_use]
    pub fn from_pixel(raw: u32) -> Option<Self> {
        Self::new(raw).ok()
    }

    /// The raw value, as written into per-vertex tags.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    /// The slot of this object in the transform matrix table.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl TryFrom<u32> for ObjectId {
    type Error = SceneError;

    fn try_from(raw: u32) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<ObjectId> for u32 {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

/// A drawable, selectable entity owned by the [`crate::ObjectRegistry`].
#[derive(Debug, Clone)]
pub struct SceneObject {
    id: ObjectId,
    name: String,
    /// Object-space geometry plus its current pose.
    pub mesh: IndexedVertexPositions,
    /// sRGB color used in the visible pass.
    pub color: Vec3,
}

impl SceneObject {
    pub(crate) fn new(
        id: ObjectId,
        name: impl Into<String>,
        mesh: IndexedVertexPositions,
        color: Vec3,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            mesh,
            color,
        }
    }

    /// The object's identifier.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The object's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The object's pose.
    pub fn transform(&self) -> &Transform {
        &self.mesh.transform
    }

    /// Mutable access to the object's pose.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.mesh.transform
    }

    /// One tag per vertex, every entry equal to this object's id.
    pub fn object_id_tags(&self) -> Vec<u32> {
        vec![self.id.get(); self.mesh.positions.len()]
    }

    /// One linear RGB color per vertex.
    pub fn vertex_colors(&self) -> Vec<Vec3> {
        vec![Palette::to_linear(self.color); self.mesh.positions.len()]
    }
}
