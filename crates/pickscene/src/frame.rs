//! One frame: id-pass, pick, selection tracking, visible pass.

use pickscene_core::{FlushStats, InputState, SelectionEvent};
use pickscene_render::{FpsCamera, FrameTarget, RenderEngine, RenderError};

use crate::error::Result;
use crate::scene::Scene;

/// What happened during [`render_frame`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Selection changes caused by this frame's input.
    pub events: Vec<SelectionEvent>,
    /// The id-pass flush.
    pub id_pass: FlushStats,
    /// The visible pass flush.
    pub colored_pass: FlushStats,
}

/// Writes the scene's current poses to the GPU before the first frame.
pub fn prime(engine: &RenderEngine, scene: &mut Scene) {
    scene.sync_table();
    engine.upload_matrices(&scene.table);
}

/// Renders one frame and applies this frame's selection input.
///
/// The id-pass uses the matrices uploaded at the end of the previous frame,
/// so a click resolves against what was on screen. The table is uploaded
/// once, after the held object has been moved.
pub fn render_frame(
    engine: &mut RenderEngine,
    scene: &mut Scene,
    camera: &FpsCamera,
    input: &InputState,
) -> Result<FrameReport> {
    let frame = engine.acquire_frame()?;
    engine.set_camera(&camera.uniforms());

    engine.picking.enable_writing();
    let id_pass = draw_id_pass(engine, scene, &frame);
    engine.picking.disable_writing();
    let id_pass = match id_pass {
        Ok(stats) => stats,
        Err(e) => {
            engine.batcher.object_id.clear();
            return Err(e);
        }
    };

    // pick and track
    let events = scene.selection.process(
        input,
        &mut engine.pixel_reader(),
        engine.dimensions(),
        &mut scene.registry,
        camera.pose(),
    )?;
    for event in &events {
        if let SelectionEvent::Selected(id) | SelectionEvent::Deselected(id) = event {
            let name = scene.registry.get(*id).map_or("?", |o| o.name());
            log::info!("{event:?} ({name})");
        }
    }
    scene.sync_table();

    // visible pass
    scene.queue_colored(&mut engine.batcher.colored_vertex);
    let mut encoder = engine.create_encoder("visible pass encoder");
    let colored_pass = {
        let mut pass = engine.begin_pass(&mut encoder, &frame)?;
        engine.flush_colored(&mut pass)
    };
    engine.upload_matrices(&scene.table);
    engine.submit(encoder);
    engine.present(frame);

    Ok(FrameReport {
        events,
        id_pass,
        colored_pass,
    })
}

/// Queues and flushes the id-pass. Writing must already be enabled.
fn draw_id_pass(engine: &mut RenderEngine, scene: &Scene, frame: &FrameTarget) -> Result<FlushStats> {
    if !engine.picking.is_writing() {
        return Err(RenderError::PickingTargetUninitialized.into());
    }

    scene.queue_id_pass(&mut engine.batcher.object_id);
    let mut encoder = engine.create_encoder("id pass encoder");
    let stats = {
        let mut pass = engine.begin_pass(&mut encoder, frame)?;
        engine.flush_object_ids(&mut pass)
    };
    engine.submit(encoder);
    Ok(stats)
}
