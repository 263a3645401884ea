//! Error types for pickscene.

use thiserror::Error;

/// The main error type for scene-level operations.
#[derive(Error, Debug)]
pub enum SceneError {
    /// An object identifier does not fit in the transform matrix table.
    #[error("object id {id} out of range (table capacity {capacity})")]
    ObjectIdOutOfRange { id: usize, capacity: usize },

    /// Slot 0 is reserved for "no object" and always holds identity.
    #[error("object id 0 is reserved for \"no object\"")]
    ReservedObjectId,

    /// Every assignable object identifier is already in use.
    #[error("object registry is full ({capacity} slots)")]
    RegistryFull { capacity: usize },

    /// No object is registered under the given id.
    #[error("no object registered with id {0}")]
    UnknownObject(u32),

    /// Mesh generation parameters were rejected.
    #[error("invalid mesh parameters: {0}")]
    InvalidMesh(String),

    /// I/O error while reading options.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error while reading options.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A malformed draw request handed to a [`crate::DrawBatch`].
///
/// These are programmer errors. `queue_draw` panics with this message;
/// `try_queue_draw` returns it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// An attribute array does not have one entry per vertex.
    #[error("attribute `{attribute}` has {actual} entries, expected {expected} (one per position)")]
    AttributeLengthMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An object-id tag differs from the id the request was queued under.
    #[error("object id tag {found} at vertex {vertex} does not match queued object id {expected}")]
    ObjectIdTagMismatch {
        vertex: usize,
        expected: u32,
        found: u32,
    },

    /// An index points past the request's own vertices.
    #[error("index {value} at position {position} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        value: u32,
        vertex_count: usize,
    },

    /// The index list does not describe whole triangles.
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
}

/// A specialized Result type for pickscene operations.
pub type Result<T> = std::result::Result<T, SceneError>;
