//! Mutable viewer state shared by input handling, the overlay and frame composition.

use glam::Vec3;
use wasteland_engine::input::{InputFrame, InputState, Key};
use wasteland_engine::window::CursorMode;

use crate::camera::{Camera, CameraMovement};
use crate::light::PointLight;
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub clear_color: Vec3,
    /// Debug overlay visible.
    pub ui_enabled: bool,
    pub camera: Camera,
    /// Mouse motion drives the camera.
    pub camera_mouse_update: bool,
    /// Editable in the overlay; not used when rendering.
    pub backpack_position: Vec3,
    pub backpack_scale: f32,
    pub point_light: PointLight,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// What the app should do after a batch of input.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct InputResponse {
    pub quit: bool,
    /// Set when the cursor mode has to change.
    pub cursor: Option<CursorMode>,
}

impl ViewerState {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut camera = Camera::new(settings.camera_position);
        camera.set_front(settings.camera_front);
        Self {
            clear_color: settings.clear_color,
            ui_enabled: settings.ui_enabled,
            camera,
            camera_mouse_update: !settings.ui_enabled,
            backpack_position: Vec3::ZERO,
            backpack_scale: 1.0,
            point_light: PointLight::default(),
        }
    }

    pub fn to_settings(&self) -> Settings {
        Settings {
            clear_color: self.clear_color,
            ui_enabled: self.ui_enabled,
            camera_position: self.camera.position,
            camera_front: self.camera.front,
        }
    }

    /// Cursor is free while the overlay is up, captured otherwise.
    pub fn cursor_mode(&self) -> CursorMode {
        if self.ui_enabled { CursorMode::Normal } else { CursorMode::Captured }
    }

    /// Flips overlay visibility. Opening it stops mouse look, closing it resumes.
    pub fn toggle_ui(&mut self) -> CursorMode {
        self.ui_enabled = !self.ui_enabled;
        self.camera_mouse_update = !self.ui_enabled;
        log::debug!("overlay {}", if self.ui_enabled { "shown" } else { "hidden" });
        self.cursor_mode()
    }

    /// Applies one frame of camera input: held WASD, mouse motion, scroll,
    /// plus the Escape and F1 edges. The camera stays put while the window
    /// is unfocused.
    pub fn handle_input(&mut self, input: &InputState, frame: &InputFrame, dt: f32) -> InputResponse {
        let mut response = InputResponse::default();

        if frame.pressed(Key::Escape) {
            response.quit = true;
        }
        if frame.pressed(Key::F1) {
            response.cursor = Some(self.toggle_ui());
        }

        // Raw motion keeps arriving while another window has focus.
        if !input.focused {
            return response;
        }

        for (key, movement) in [
            (Key::W, CameraMovement::Forward),
            (Key::S, CameraMovement::Backward),
            (Key::A, CameraMovement::Left),
            (Key::D, CameraMovement::Right),
        ] {
            if input.key_down(key) {
                self.camera.process_keyboard(movement, dt);
            }
        }

        if self.camera_mouse_update && frame.mouse_delta != glam::Vec2::ZERO {
            // Raw motion grows downward; pitch grows upward.
            self.camera.process_mouse_movement(frame.mouse_delta.x, -frame.mouse_delta.y);
        }

        if frame.scroll_lines != 0.0 {
            self.camera.process_mouse_scroll(frame.scroll_lines);
        }

        response
    }
}
