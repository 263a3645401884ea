//! Running frames without a window.
//!
//! Useful for integration tests: input is scripted through [`HeadlessRunner::input_mut`]
//! and every [`HeadlessRunner::step`] runs the same frame as the windowed app.

use pickscene_core::{InputState, Options, PixelInfo};
use pickscene_render::{FpsCamera, RenderEngine};
use pollster::FutureExt;

use crate::error::Result;
use crate::frame::{prime, render_frame, FrameReport};
use crate::scene::Scene;

/// A headless engine plus the state the windowed app would own.
pub struct HeadlessRunner {
    engine: RenderEngine,
    scene: Scene,
    camera: FpsCamera,
    input: InputState,
}

impl HeadlessRunner {
    /// Creates a headless engine of the given size rendering `scene`.
    pub fn new(width: u32, height: u32, options: &Options, mut scene: Scene) -> Result<Self> {
        let engine = RenderEngine::new_headless(width, height, options).block_on()?;
        let (width, height) = engine.dimensions();
        let camera = FpsCamera::from_options(&options.camera, width as f32 / height as f32);
        prime(&engine, &mut scene);

        Ok(Self {
            engine,
            scene,
            camera,
            input: InputState::new(),
        })
    }

    /// Moves the camera for `dt` seconds of input, renders a frame, then
    /// ends the input frame.
    pub fn step(&mut self, dt: f32) -> Result<FrameReport> {
        self.camera.process_look(self.input.take_look_delta());
        self.camera.process_input(&self.input, dt);
        let report = render_frame(&mut self.engine, &mut self.scene, &self.camera, &self.input);
        self.input.end_frame();
        report
    }

    /// Reads the picking target as left by the last frame, origin bottom-left.
    pub fn read_pixel(&self, x: u32, y: u32) -> Result<PixelInfo> {
        Ok(self.engine.read_pixel(x, y)?)
    }

    /// Resizes every render target.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.engine.resize(width, height)?;
        self.camera.set_aspect_ratio(width as f32 / height.max(1) as f32);
        Ok(())
    }

    pub fn engine(&self) -> &RenderEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut RenderEngine {
        &mut self.engine
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &FpsCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut FpsCamera {
        &mut self.camera
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }
}
