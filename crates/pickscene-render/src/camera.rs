//! First-person camera.

use glam::{Mat4, Vec2, Vec3};
use pickscene_core::{Action, CameraOptions, CameraPose, InputState};

/// Pitch limit in degrees, short of straight up/down so `forward` never
/// becomes parallel to the up vector.
pub const MAX_PITCH_DEGREES: f32 = 89.0;

/// Camera uniforms for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    pub world_to_camera: [[f32; 4]; 4],
    pub camera_to_clip: [[f32; 4]; 4],
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            world_to_camera: Mat4::IDENTITY.to_cols_array_2d(),
            camera_to_clip: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

/// A yaw/pitch camera moved with WASD and mouse look.
#[derive(Debug, Clone)]
pub struct FpsCamera {
    /// Eye position.
    pub position: Vec3,
    /// Rotation about +Y in degrees. -90 looks down -Z.
    pub yaw: f32,
    /// Elevation in degrees, clamped to `±MAX_PITCH_DEGREES`.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Width over height.
    pub aspect_ratio: f32,
    /// World units per second.
    pub move_speed: f32,
    pub slow_multiplier: f32,
    pub fast_multiplier: f32,
    /// Degrees per pixel of mouse motion.
    pub mouse_sensitivity: f32,
}

impl Default for FpsCamera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl FpsCamera {
    /// Creates a camera at the origin looking down -Z.
    pub fn new(aspect_ratio: f32) -> Self {
        Self::from_options(&CameraOptions::default(), aspect_ratio)
    }

    /// Creates a camera at the origin looking down -Z with the given settings.
    pub fn from_options(options: &CameraOptions, aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: -90.0,
            pitch: 0.0,
            fov: options.fov_degrees,
            near: options.near,
            far: options.far,
            aspect_ratio,
            move_speed: options.move_speed,
            slow_multiplier: options.slow_multiplier,
            fast_multiplier: options.fast_multiplier,
            mouse_sensitivity: options.mouse_sensitivity,
        }
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Unit view direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    /// Unit vector to the camera's right, parallel to the ground.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    /// Uniform block for the shaders.
    #[must_use]
    pub fn uniforms(&self) -> CameraUniforms {
        CameraUniforms {
            world_to_camera: self.view_matrix().to_cols_array_2d(),
            camera_to_clip: self.projection_matrix().to_cols_array_2d(),
        }
    }

    /// Position and view direction.
    #[must_use]
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            forward: self.forward(),
        }
    }

    /// Current speed given the held modifiers.
    #[must_use]
    pub fn speed(&self, input: &InputState) -> f32 {
        let mut speed = self.move_speed;
        if input.is_pressed(Action::SlowMove) {
            speed *= self.slow_multiplier;
        }
        if input.is_pressed(Action::FastMove) {
            speed *= self.fast_multiplier;
        }
        speed
    }

    /// Moves along the view direction and strafes for `dt` seconds.
    pub fn process_input(&mut self, input: &InputState, dt: f32) {
        let forward = self.forward();
        let right = self.right();
        let mut direction = Vec3::ZERO;

        if input.is_pressed(Action::MoveForward) {
            direction += forward;
        }
        if input.is_pressed(Action::MoveBackward) {
            direction -= forward;
        }
        if input.is_pressed(Action::MoveRight) {
            direction += right;
        }
        if input.is_pressed(Action::MoveLeft) {
            direction -= right;
        }

        if direction != Vec3::ZERO {
            self.position += direction.normalize() * self.speed(input) * dt;
        }
    }

    /// Turns by a mouse motion delta in pixels. Positive y looks down.
    pub fn process_look(&mut self, delta: Vec2) {
        self.yaw += delta.x * self.mouse_sensitivity;
        self.pitch = (self.pitch - delta.y * self.mouse_sensitivity)
            .clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_looks_down_negative_z() {
        let camera = FpsCamera::default();
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-6);
        assert!((camera.right() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_view_maps_forward_to_negative_z() {
        let mut camera = FpsCamera::new(1.0);
        camera.position = Vec3::new(1.0, 2.0, 3.0);
        camera.yaw = 0.0;
        let ahead = camera.position + camera.forward() * 5.0;
        let in_view = camera.view_matrix().transform_point3(ahead);
        assert!((in_view - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn test_projection_is_perspective() {
        let camera = FpsCamera::new(4.0 / 3.0);
        let proj = camera.projection_matrix();
        assert!(proj.w_axis.z != 0.0);
        assert!((proj.z_axis.w + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_move_forward_with_modifiers() {
        let mut camera = FpsCamera::new(1.0);
        camera.move_speed = 2.0;
        camera.fast_multiplier = 3.0;
        let mut input = InputState::new();
        input.press(Action::MoveForward);
        input.press(Action::FastMove);

        camera.process_input(&input, 0.5);
        assert!((camera.position - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-5);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut camera = FpsCamera::new(1.0);
        let mut input = InputState::new();
        input.press(Action::MoveLeft);
        input.press(Action::MoveRight);
        camera.process_input(&input, 1.0);
        assert_eq!(camera.position, Vec3::ZERO);
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 128);
    }

    proptest! {
        #[test]
        fn prop_pitch_stays_clamped(deltas in prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 1..20)) {
            let mut camera = FpsCamera::new(1.0);
            for (dx, dy) in deltas {
                camera.process_look(Vec2::new(dx, dy));
                prop_assert!(camera.pitch.abs() <= MAX_PITCH_DEGREES);
                prop_assert!((camera.forward().length() - 1.0).abs() < 1e-4);
            }
        }
    }
}
