//! Click-to-select and hold-in-front-of-camera logic.
//!
//! The controller is driven once per frame after the id-pass has been drawn.
//! It owns only the current selection; the objects themselves live in the
//! [`ObjectRegistry`] and pixel reads go through a [`PickSource`].

use glam::Vec3;

use crate::input::{Action, InputState};
use crate::object::ObjectId;
use crate::pick::{PickSource, PixelInfo};
use crate::registry::ObjectRegistry;

/// Where the camera is and where it looks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// World-space eye position.
    pub position: Vec3,
    /// Unit view direction.
    pub forward: Vec3,
}

/// Something that changed during [`SelectionController::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// An object was picked and is now held.
    Selected(ObjectId),
    /// The held object was released.
    Deselected(ObjectId),
    /// A select landed on a pixel no registered object covers.
    Missed {
        /// The raw id read back, 0 for background.
        raw_id: u32,
    },
}

/// Tracks which object, if any, is held in front of the camera.
#[derive(Debug, Clone)]
pub struct SelectionController {
    selected: Option<ObjectId>,
    reach: f32,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl SelectionController {
    /// Creates a controller holding objects `reach` units in front of the camera.
    pub fn new(reach: f32) -> Self {
        Self {
            selected: None,
            reach,
        }
    }

    /// The held object.
    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Distance at which a held object floats.
    pub fn reach(&self) -> f32 {
        self.reach
    }

    /// The screen center in bottom-left origin coordinates, or `None` for an
    /// empty framebuffer.
    pub fn aim_point(width: u32, height: u32) -> Option<(u32, u32)> {
        if width == 0 || height == 0 {
            return None;
        }
        let x = width / 2;
        let y_from_top = height / 2;
        Some((x, height - 1 - y_from_top))
    }

    /// Selects the object named by `pixel` if it is registered.
    ///
    /// Background and unknown ids leave the selection unchanged.
    pub fn resolve_pick(&mut self, pixel: PixelInfo, registry: &ObjectRegistry) -> SelectionEvent {
        match ObjectId::from_pixel(pixel.object_id).filter(|id| registry.contains(*id)) {
            Some(id) => {
                self.selected = Some(id);
                SelectionEvent::Selected(id)
            }
            None => SelectionEvent::Missed {
                raw_id: pixel.object_id,
            },
        }
    }

    /// Releases the held object.
    pub fn deselect(&mut self) -> Option<SelectionEvent> {
        self.selected.take().map(SelectionEvent::Deselected)
    }

    /// Drops the selection if it refers to `id`. Call when `id` leaves the registry.
    pub fn forget(&mut self, id: ObjectId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Where a held object is placed for the given camera pose.
    pub fn hold_position(&self, pose: CameraPose) -> Vec3 {
        pose.position + self.reach * pose.forward
    }

    /// Runs one frame of selection.
    ///
    /// Reads the aim point through `picker` when `Select` was just pressed,
    /// clears the selection when `Deselect` was just pressed, then moves the
    /// held object to [`Self::hold_position`].
    pub fn process<P: PickSource>(
        &mut self,
        input: &InputState,
        picker: &mut P,
        framebuffer: (u32, u32),
        registry: &mut ObjectRegistry,
        pose: CameraPose,
    ) -> Result<Vec<SelectionEvent>, P::Error> {
        let mut events = Vec::new();

        if input.just_pressed(Action::Select) {
            if let Some((x, y)) = Self::aim_point(framebuffer.0, framebuffer.1) {
                let pixel = picker.pick(x, y)?;
                let event = self.resolve_pick(pixel, registry);
                match event {
                    SelectionEvent::Selected(id) => log::debug!("picked object {id} at ({x}, {y})"),
                    _ if pixel.is_background() => log::debug!("pick at ({x}, {y}) hit background"),
                    _ => log::debug!("pick at ({x}, {y}) hit unknown id {}", pixel.object_id),
                }
                events.push(event);
            }
        }

        if input.just_pressed(Action::Deselect) {
            events.extend(self.deselect());
        }

        if let Some(id) = self.selected {
            let target = self.hold_position(pose);
            match registry.get_mut(id) {
                Some(object) => object.transform_mut().translation = target,
                None => self.forget(id),
            }
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::generate_cylinder;
    use std::collections::VecDeque;

    /// Replays a fixed sequence of pixel reads.
    #[derive(Default)]
    struct ScriptedPicks {
        answers: VecDeque<u32>,
        reads: Vec<(u32, u32)>,
    }

    impl PickSource for ScriptedPicks {
        type Error = &'static str;

        fn pick(&mut self, x: u32, y: u32) -> Result<PixelInfo, Self::Error> {
            self.reads.push((x, y));
            let object_id = self.answers.pop_front().ok_or("no scripted answer")?;
            Ok(PixelInfo {
                object_id,
                draw_id: u32::from(object_id != 0),
                primitive_id: 0,
            })
        }
    }

    fn two_objects() -> ObjectRegistry {
        let mut registry = ObjectRegistry::new();
        for name in ["one", "two"] {
            registry
                .insert(name, generate_cylinder(8, 1.0, 0.25).unwrap(), Vec3::ONE)
                .unwrap();
        }
        registry
    }

    fn pose() -> CameraPose {
        CameraPose {
            position: Vec3::new(1.0, 2.0, 3.0),
            forward: Vec3::NEG_Z,
        }
    }

    #[test]
    fn test_aim_point_is_bottom_left_center() {
        assert_eq!(SelectionController::aim_point(640, 480), Some((320, 239)));
        assert_eq!(SelectionController::aim_point(1, 1), Some((0, 0)));
        assert_eq!(SelectionController::aim_point(0, 480), None);
    }

    #[test]
    fn test_select_then_deselect() {
        let mut registry = two_objects();
        let mut picks = ScriptedPicks {
            answers: VecDeque::from([1]),
            ..Default::default()
        };
        let mut controller = SelectionController::default();
        let mut input = InputState::new();

        input.press(Action::Select);
        let events = controller
            .process(&input, &mut picks, (640, 480), &mut registry, pose())
            .unwrap();
        let one = ObjectId::new(1).unwrap();
        assert_eq!(events, vec![SelectionEvent::Selected(one)]);
        assert_eq!(controller.selected(), Some(one));
        assert_eq!(picks.reads, vec![(320, 239)]);
        input.release(Action::Select);
        input.end_frame();

        input.press(Action::Deselect);
        let events = controller
            .process(&input, &mut picks, (640, 480), &mut registry, pose())
            .unwrap();
        assert_eq!(events, vec![SelectionEvent::Deselected(one)]);
        assert_eq!(controller.selected(), None);
        assert_eq!(picks.reads.len(), 1);
    }

    #[test]
    fn test_tap_between_frames_still_selects() {
        let mut registry = two_objects();
        let mut picks = ScriptedPicks {
            answers: VecDeque::from([1]),
            ..Default::default()
        };
        let mut controller = SelectionController::default();
        let mut input = InputState::new();

        // press and release both land before the frame runs
        input.press(Action::Select);
        input.release(Action::Select);
        let events = controller
            .process(&input, &mut picks, (640, 480), &mut registry, pose())
            .unwrap();
        assert_eq!(events, vec![SelectionEvent::Selected(ObjectId::FIRST)]);
        assert_eq!(controller.selected(), Some(ObjectId::FIRST));
        input.end_frame();

        let events = controller
            .process(&input, &mut picks, (640, 480), &mut registry, pose())
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(picks.reads.len(), 1);
    }

    #[test]
    fn test_held_object_follows_camera() {
        let mut registry = two_objects();
        let two = ObjectId::new(2).unwrap();
        let mut picks = ScriptedPicks {
            answers: VecDeque::from([2]),
            ..Default::default()
        };
        let mut controller = SelectionController::default();
        let mut input = InputState::new();
        input.press(Action::Select);

        let mut camera = pose();
        for frame in 0..4 {
            controller
                .process(&input, &mut picks, (64, 64), &mut registry, camera)
                .unwrap();
            input.end_frame();

            let expected = camera.position + 3.0 * camera.forward;
            let held = registry.get(two).unwrap().transform().translation;
            assert!((held - expected).length() < 1e-6, "frame {frame}");

            camera.position += Vec3::X;
            camera.forward = Vec3::new(frame as f32, 0.0, -1.0).normalize();
        }

        // object 1 was never touched
        assert_eq!(
            registry.get(ObjectId::FIRST).unwrap().transform().translation,
            Vec3::ZERO
        );
    }

    #[test]
    fn test_background_click_keeps_selection() {
        let mut registry = two_objects();
        let mut picks = ScriptedPicks {
            answers: VecDeque::from([1, 0, 900]),
            ..Default::default()
        };
        let mut controller = SelectionController::default();
        let mut input = InputState::new();

        for expected in [
            SelectionEvent::Selected(ObjectId::FIRST),
            SelectionEvent::Missed { raw_id: 0 },
            SelectionEvent::Missed { raw_id: 900 },
        ] {
            input.press(Action::Select);
            let events = controller
                .process(&input, &mut picks, (64, 64), &mut registry, pose())
                .unwrap();
            assert_eq!(events, vec![expected]);
            assert_eq!(controller.selected(), Some(ObjectId::FIRST));
            input.release(Action::Select);
            input.end_frame();
        }
    }

    #[test]
    fn test_readback_error_propagates() {
        let mut registry = two_objects();
        let mut picks = ScriptedPicks::default();
        let mut controller = SelectionController::default();
        let mut input = InputState::new();
        input.press(Action::Select);
        let err = controller
            .process(&input, &mut picks, (64, 64), &mut registry, pose())
            .unwrap_err();
        assert_eq!(err, "no scripted answer");
    }

    #[test]
    fn test_removed_object_is_forgotten() {
        let mut registry = two_objects();
        let mut controller = SelectionController::default();
        controller.resolve_pick(
            PixelInfo {
                object_id: 2,
                ..PixelInfo::BACKGROUND
            },
            &registry,
        );
        registry.remove(ObjectId::new(2).unwrap());

        let mut picks = ScriptedPicks::default();
        let events = controller
            .process(&InputState::new(), &mut picks, (64, 64), &mut registry, pose())
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(controller.selected(), None);
    }
}
