//! Application window and event loop management.

mod input;

use std::sync::Arc;
use std::time::Instant;

use pickscene_core::{InputState, Options};
use pickscene_render::{FpsCamera, RenderEngine, RenderError};
use pollster::FutureExt;
use winit::{
    dpi::PhysicalSize,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{CursorGrabMode, Window},
};

use crate::bindings::KeyBindings;
use crate::error::{AppError, Result};
use crate::frame::{prime, render_frame};
use crate::scene::Scene;

/// The pickscene application state.
pub struct App {
    options: Options,
    bindings: KeyBindings,
    scene: Scene,
    camera: FpsCamera,
    input: InputState,
    window: Option<Arc<Window>>,
    engine: Option<RenderEngine>,
    last_frame_time: Option<Instant>,
    /// First fatal error; the event loop exits once it is set.
    fatal: Option<AppError>,
}

impl App {
    /// Creates a new application.
    pub fn new(options: Options, scene: Scene) -> Self {
        let aspect = options.window_width as f32 / options.window_height.max(1) as f32;
        Self {
            camera: FpsCamera::from_options(&options.camera, aspect),
            bindings: KeyBindings::default(),
            scene,
            input: InputState::new(),
            window: None,
            engine: None,
            last_frame_time: None,
            fatal: None,
            options,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        self.fatal.get_or_insert(err);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(self.options.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.options.window_width,
                self.options.window_height,
            ));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let engine = RenderEngine::new_windowed(window.clone(), &self.options).block_on()?;
        let (width, height) = engine.dimensions();
        self.camera.set_aspect_ratio(width as f32 / height as f32);
        prime(&engine, &mut self.scene);

        if self.options.capture_mouse {
            capture_cursor(&window);
        }

        self.window = Some(window);
        self.engine = Some(engine);
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }
        if let Some(engine) = &mut self.engine {
            engine.resize(size.width, size.height)?;
        }
        self.camera.set_aspect_ratio(size.width as f32 / size.height as f32);
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(engine) = &mut self.engine else {
            return Ok(());
        };

        let now = Instant::now();
        let dt = self
            .last_frame_time
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last_frame_time = Some(now);

        self.camera.process_look(self.input.take_look_delta());
        self.camera.process_input(&self.input, dt);

        let result = render_frame(engine, &mut self.scene, &self.camera, &self.input);
        self.input.end_frame();

        match result {
            Ok(_) => Ok(()),
            Err(AppError::Render(RenderError::SurfaceLost | RenderError::SurfaceOutdated)) => {
                engine.reconfigure();
                Ok(())
            }
            Err(AppError::Render(RenderError::Timeout)) => {
                log::warn!("surface timeout");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

fn capture_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    match grabbed {
        Ok(()) => window.set_cursor_visible(false),
        Err(e) => log::warn!("could not capture the cursor: {e}"),
    }
}

/// Opens the window and runs until it is closed.
pub fn run_app(options: Options, scene: Scene) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(options, scene);

    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
