//! Rendering backend for pickscene.
//!
//! This crate provides the wgpu-based side of object picking:
//! - [`RenderEngine`] owning the device, surface and per-frame targets
//! - [`PickingTarget`] the id-pass renders into and reads back from
//! - [`BatchRenderer`]s flushing [`pickscene_core::DrawBatch`]es in one draw call
//! - [`ShaderCache`] with one pipeline per [`ShaderType`]
//! - [`MatrixTableBuffer`], the GPU copy of the transform matrix table
//! - [`FpsCamera`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Vertex and index counts fit in u32 by construction
#![allow(clippy::cast_possible_truncation)]

pub mod batcher;
pub mod buffer;
pub mod camera;
pub mod engine;
pub mod error;
pub mod matrix_buffer;
pub mod pick;
pub mod shader;

pub use batcher::{BatchRenderer, BatchVertex, Batcher};
pub use buffer::GrowableBuffer;
pub use camera::{CameraUniforms, FpsCamera};
pub use engine::{FrameTarget, RenderEngine};
pub use error::{RenderError, RenderResult};
pub use matrix_buffer::MatrixTableBuffer;
pub use pick::{PickingTarget, PixelReader, TargetState, DEPTH_FORMAT, PICKING_FORMAT};
pub use shader::{ShaderBuilder, ShaderCache, ShaderType};
