//! Application error type.

use pickscene_core::SceneError;
use pickscene_render::RenderError;
use thiserror::Error;

/// Errors that end the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Scene setup or options loading failed.
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    /// Engine, picking target or frame rendering failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// The event loop could not be created or exited abnormally.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The window could not be created.
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
}

/// A specialized Result type for the application.
pub type Result<T> = std::result::Result<T, AppError>;
