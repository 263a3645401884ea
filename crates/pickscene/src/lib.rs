//! pickscene: click to pick up objects in a 3D scene.
//!
//! Objects are identified on screen by rendering their ids into an
//! off-screen integer target and reading back the pixel under the crosshair.
//! A picked object is then held a fixed distance in front of the camera
//! until it is released.
//!
//! # Quick Start
//!
//! ```no_run
//! use pickscene::{run, Options};
//!
//! run(Options::default()).unwrap();
//! ```
//!
//! Controls: WASD to move, mouse to look, left click to pick up the object
//! under the crosshair, right click to drop it, Escape to quit.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Window sizes and mouse deltas are small enough for f32
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

mod app;
pub mod bindings;
pub mod error;
pub mod frame;
pub mod headless;
pub mod scene;

pub use bindings::KeyBindings;
pub use error::{AppError, Result};
pub use frame::{render_frame, FrameReport};
pub use headless::HeadlessRunner;
pub use scene::Scene;

pub use pickscene_core::{
    Action, InputState, ObjectId, Options, Palette, SelectionController, SelectionEvent,
};
pub use pickscene_render::{FpsCamera, RenderEngine, RenderError};

/// Builds the demo scene and runs it in a window until closed.
pub fn run(options: Options) -> Result<()> {
    let scene = Scene::demo(&options, &Palette::default())?;
    log::info!("starting with {} objects", scene.registry.len());
    app::run_app(options, scene)
}
