//! Core data model for pickscene.
//!
//! This crate holds everything about object-id picking that does not need a GPU:
//! - [`ObjectId`] and the [`TransformMatrixTable`] indexed by it
//! - [`DrawBatch`] staging for per-shader batched draws
//! - [`ObjectRegistry`] of selectable scene objects
//! - [`InputState`] snapshots and the [`SelectionController`]
//! - Configuration [`Options`], the immutable [`Palette`] and mesh generation

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Object and id counts are bounded by CAPACITY, which fits in u32
#![allow(clippy::cast_possible_truncation)]

pub mod batch;
pub mod error;
pub mod input;
pub mod matrix_table;
pub mod mesh;
pub mod object;
pub mod options;
pub mod palette;
pub mod pick;
pub mod registry;
pub mod selection;
pub mod transform;
pub mod vertex;

pub use batch::{DrawBatch, DrawRange, FlushStats, PreparedBatch};
pub use error::{BatchError, Result, SceneError};
pub use input::{Action, InputState};
pub use matrix_table::{TransformMatrixTable, CAPACITY};
pub use mesh::{generate_cone, generate_cylinder, IndexedVertexPositions};
pub use object::{ObjectId, SceneObject};
pub use options::{CameraOptions, Options};
pub use palette::Palette;
pub use pick::{PickSource, PixelInfo};
pub use registry::ObjectRegistry;
pub use selection::{CameraPose, SelectionController, SelectionEvent};
pub use transform::Transform;
pub use vertex::{ColoredVertex, ObjectIdVertex};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3};
