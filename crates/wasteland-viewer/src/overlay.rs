//! Keyboard-driven debug overlay.
//!
//! Up/Down select a row, Left/Right nudge it (Shift for a tenth of the step),
//! Space flips checkboxes. Two panels: editable settings and read-only
//! camera info with the mouse-look checkbox.

use glam::Vec2;
use wasteland_engine::canvas::{DrawList, Layer};
use wasteland_engine::coords::{Rect, Viewport};
use wasteland_engine::input::{InputFrame, InputState, Key};
use wasteland_engine::paint::Color;
use wasteland_engine::text::{FontId, FontSystem};

use crate::state::ViewerState;

const FONT_SIZE: f32 = 16.0;
const PANEL_WIDTH: f32 = 460.0;
const PANEL_MARGIN: f32 = 20.0;
const PANEL_PADDING: f32 = 10.0;
const PANEL_GAP: f32 = 12.0;
const FINE_FACTOR: f32 = 0.1;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Field {
    ClearR,
    ClearG,
    ClearB,
    BackpackX,
    BackpackY,
    BackpackZ,
    BackpackScale,
    LightConstant,
    LightLinear,
    LightQuadratic,
    CameraMouseUpdate,
}

impl Field {
    /// Selection order, top to bottom.
    pub const ALL: [Field; 11] = [
        Field::ClearR,
        Field::ClearG,
        Field::ClearB,
        Field::BackpackX,
        Field::BackpackY,
        Field::BackpackZ,
        Field::BackpackScale,
        Field::LightConstant,
        Field::LightLinear,
        Field::LightQuadratic,
        Field::CameraMouseUpdate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::ClearR => "Background color R",
            Field::ClearG => "Background color G",
            Field::ClearB => "Background color B",
            Field::BackpackX => "Backpack position X",
            Field::BackpackY => "Backpack position Y",
            Field::BackpackZ => "Backpack position Z",
            Field::BackpackScale => "Backpack scale",
            Field::LightConstant => "pointLight.constant",
            Field::LightLinear => "pointLight.linear",
            Field::LightQuadratic => "pointLight.quadratic",
            Field::CameraMouseUpdate => "Camera mouse update",
        }
    }

    /// `(step, min, max)` for numeric fields.
    pub fn range(self) -> Option<(f32, f32, f32)> {
        match self {
            Field::ClearR | Field::ClearG | Field::ClearB => Some((0.01, 0.0, 1.0)),
            Field::BackpackX | Field::BackpackY | Field::BackpackZ => {
                Some((0.1, f32::NEG_INFINITY, f32::INFINITY))
            }
            Field::BackpackScale => Some((0.05, 0.1, 4.0)),
            Field::LightConstant | Field::LightLinear | Field::LightQuadratic => Some((0.05, 0.0, 1.0)),
            Field::CameraMouseUpdate => None,
        }
    }

    fn value_mut(self, state: &mut ViewerState) -> Option<&mut f32> {
        Some(match self {
            Field::ClearR => &mut state.clear_color.x,
            Field::ClearG => &mut state.clear_color.y,
            Field::ClearB => &mut state.clear_color.z,
            Field::BackpackX => &mut state.backpack_position.x,
            Field::BackpackY => &mut state.backpack_position.y,
            Field::BackpackZ => &mut state.backpack_position.z,
            Field::BackpackScale => &mut state.backpack_scale,
            Field::LightConstant => &mut state.point_light.constant,
            Field::LightLinear => &mut state.point_light.linear,
            Field::LightQuadratic => &mut state.point_light.quadratic,
            Field::CameraMouseUpdate => return None,
        })
    }

    /// Current value of a numeric field; `None` for the checkbox.
    pub fn value(self, state: &ViewerState) -> Option<f32> {
        Some(match self {
            Field::ClearR => state.clear_color.x,
            Field::ClearG => state.clear_color.y,
            Field::ClearB => state.clear_color.z,
            Field::BackpackX => state.backpack_position.x,
            Field::BackpackY => state.backpack_position.y,
            Field::BackpackZ => state.backpack_position.z,
            Field::BackpackScale => state.backpack_scale,
            Field::LightConstant => state.point_light.constant,
            Field::LightLinear => state.point_light.linear,
            Field::LightQuadratic => state.point_light.quadratic,
            Field::CameraMouseUpdate => return None,
        })
    }

    fn value_text(self, state: &ViewerState) -> String {
        match self.value(state) {
            Some(v) => format!("{v:.3}"),
            None if state.camera_mouse_update => "[x]".into(),
            None => "[ ]".into(),
        }
    }
}

/// One rendered text row.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    pub text: String,
    pub selected: bool,
    /// Starts a new panel.
    pub heading: bool,
}

#[derive(Debug)]
pub struct Overlay {
    selected: usize,
    font: Option<FontId>,
}

impl Overlay {
    pub fn new(font: Option<FontId>) -> Self {
        Self { selected: 0, font }
    }

    pub fn selected(&self) -> Field {
        Field::ALL[self.selected]
    }

    /// Applies navigation and edits typed this frame.
    pub fn handle_input(&mut self, state: &mut ViewerState, input: &InputState, frame: &InputFrame) {
        let fine = input.modifiers.shift || input.key_down(Key::Shift);
        for key in &frame.keys_typed {
            match key {
                Key::ArrowUp => self.selected = (self.selected + Field::ALL.len() - 1) % Field::ALL.len(),
                Key::ArrowDown => self.selected = (self.selected + 1) % Field::ALL.len(),
                Key::ArrowLeft => self.nudge(state, -1.0, fine),
                Key::ArrowRight => self.nudge(state, 1.0, fine),
                Key::Space | Key::Enter => {
                    if self.selected() == Field::CameraMouseUpdate {
                        state.camera_mouse_update = !state.camera_mouse_update;
                    }
                }
                _ => {}
            }
        }
    }

    fn nudge(&self, state: &mut ViewerState, sign: f32, fine: bool) {
        let field = self.selected();
        let Some((step, min, max)) = field.range() else {
            state.camera_mouse_update = sign > 0.0;
            return;
        };
        let step = if fine { step * FINE_FACTOR } else { step };
        if let Some(v) = field.value_mut(state) {
            *v = (*v + sign * step).clamp(min, max);
        }
    }

    /// Text content of both panels, top to bottom.
    pub fn lines(&self, state: &ViewerState) -> Vec<OverlayLine> {
        let mut lines = vec![OverlayLine { text: "Settings".into(), selected: false, heading: true }];
        let row = |field: Field| OverlayLine {
            text: format!("{}: {}", field.label(), field.value_text(state)),
            selected: self.selected() == field,
            heading: false,
        };
        lines.extend(Field::ALL[..10].iter().map(|&f| row(f)));

        let c = &state.camera;
        lines.push(OverlayLine { text: "Camera info".into(), selected: false, heading: true });
        for text in [
            format!("Camera position: ({:.6}, {:.6}, {:.6})", c.position.x, c.position.y, c.position.z),
            format!("(Yaw, Pitch): ({:.6}, {:.6})", c.yaw, c.pitch),
            format!("Camera front: ({:.6}, {:.6}, {:.6})", c.front.x, c.front.y, c.front.z),
        ] {
            lines.push(OverlayLine { text, selected: false, heading: false });
        }
        lines.push(row(Field::CameraMouseUpdate));
        lines
    }

    /// Records both panels into `list`.
    pub fn build(&self, state: &ViewerState, viewport: Viewport, fonts: &FontSystem, list: &mut DrawList) {
        list.clear();
        let line_h = self.font.map_or(FONT_SIZE * 1.2, |f| fonts.line_height(f, FONT_SIZE));
        let width = PANEL_WIDTH.min(viewport.width - 2.0 * PANEL_MARGIN).max(0.0);

        let panel_bg = Color::from_straight(0.06, 0.06, 0.08, 0.85);
        let heading_bg = Color::from_straight(0.16, 0.29, 0.48, 1.0);
        let highlight = Color::from_straight(0.26, 0.59, 0.98, 0.45);
        let text_color = Color::from_rgb8(230, 230, 230);

        let lines = self.lines(state);
        let mut y = PANEL_MARGIN;
        let mut panel_start = y;

        for (i, line) in lines.iter().enumerate() {
            if line.heading {
                if i > 0 {
                    self.close_panel(list, panel_start, y, width, panel_bg);
                    y += PANEL_GAP;
                }
                panel_start = y;
                y += PANEL_PADDING / 2.0;
                list.push_rect(
                    Layer::CONTENT,
                    Rect::new(PANEL_MARGIN, y - PANEL_PADDING / 2.0, width, line_h + PANEL_PADDING / 2.0),
                    heading_bg,
                );
            } else if line.selected {
                list.push_rect(Layer::CONTENT, Rect::new(PANEL_MARGIN, y, width, line_h), highlight);
            }

            if let Some(font) = self.font {
                let origin = Vec2::new(PANEL_MARGIN + PANEL_PADDING, y);
                list.push_text(Layer::TEXT, line.text.clone(), font, FONT_SIZE, text_color, origin);
            }
            y += line_h;
        }
        self.close_panel(list, panel_start, y, width, panel_bg);
    }

    fn close_panel(&self, list: &mut DrawList, top: f32, bottom: f32, width: f32, color: Color) {
        let rect = Rect::new(PANEL_MARGIN, top, width, bottom - top + PANEL_PADDING);
        list.push_rect(Layer::BACKGROUND, rect, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasteland_engine::canvas::DrawCmd;
    use wasteland_engine::input::{InputEvent, KeyState, Modifiers};

    fn type_keys(keys: &[Key], shift: bool) -> (InputState, InputFrame) {
        let mut input = InputState::default();
        let mut frame = InputFrame::default();
        let modifiers = Modifiers { shift, ..Modifiers::default() };
        for &key in keys {
            input.apply_event(&mut frame, InputEvent::Key { key, state: KeyState::Pressed, modifiers, repeat: false });
            input.apply_event(&mut frame, InputEvent::Key { key, state: KeyState::Released, modifiers, repeat: false });
        }
        (input, frame)
    }

    fn select(overlay: &mut Overlay, state: &mut ViewerState, field: Field) {
        while overlay.selected() != field {
            let (input, frame) = type_keys(&[Key::ArrowDown], false);
            overlay.handle_input(state, &input, &frame);
        }
    }

    // ── navigation ────────────────────────────────────────────────────────

    #[test]
    fn selection_wraps_both_ways() {
        let mut overlay = Overlay::new(None);
        let mut state = ViewerState::default();
        let (input, frame) = type_keys(&[Key::ArrowUp], false);
        overlay.handle_input(&mut state, &input, &frame);
        assert_eq!(overlay.selected(), Field::CameraMouseUpdate);
        let (input, frame) = type_keys(&[Key::ArrowDown], false);
        overlay.handle_input(&mut state, &input, &frame);
        assert_eq!(overlay.selected(), Field::ClearR);
    }

    #[test]
    fn every_numeric_field_reads_the_value_it_edits() {
        let mut state = ViewerState::default();
        for (i, field) in Field::ALL.into_iter().enumerate() {
            if let Some(v) = field.value_mut(&mut state) {
                *v = i as f32 + 0.5;
            }
        }
        for (i, field) in Field::ALL.into_iter().enumerate() {
            match field.range() {
                Some(_) => assert_eq!(field.value(&state), Some(i as f32 + 0.5), "{field:?}"),
                None => assert_eq!(field.value(&state), None),
            }
        }
        assert_eq!(Field::LightLinear.value_text(&state), "8.500");
        assert_eq!(Field::CameraMouseUpdate.value_text(&state), "[x]");
    }

    // ── edits ─────────────────────────────────────────────────────────────

    #[test]
    fn attenuation_steps_and_clamps() {
        let mut overlay = Overlay::new(None);
        let mut state = ViewerState::default();
        select(&mut overlay, &mut state, Field::LightConstant);

        let (input, frame) = type_keys(&[Key::ArrowLeft, Key::ArrowLeft], false);
        overlay.handle_input(&mut state, &input, &frame);
        assert!((state.point_light.constant - 0.9).abs() < 1e-6);

        let (input, frame) = type_keys(&[Key::ArrowRight; 5], false);
        overlay.handle_input(&mut state, &input, &frame);
        assert_eq!(state.point_light.constant, 1.0);
    }

    #[test]
    fn shift_gives_fine_steps() {
        let mut overlay = Overlay::new(None);
        let mut state = ViewerState::default();
        select(&mut overlay, &mut state, Field::BackpackScale);
        let (input, frame) = type_keys(&[Key::ArrowRight], true);
        overlay.handle_input(&mut state, &input, &frame);
        assert!((state.backpack_scale - 1.005).abs() < 1e-6);
    }

    #[test]
    fn backpack_scale_has_a_floor() {
        let mut overlay = Overlay::new(None);
        let mut state = ViewerState::default();
        select(&mut overlay, &mut state, Field::BackpackScale);
        let (input, frame) = type_keys(&[Key::ArrowLeft; 40], false);
        overlay.handle_input(&mut state, &input, &frame);
        assert_eq!(state.backpack_scale, 0.1);
    }

    #[test]
    fn space_toggles_mouse_look() {
        let mut overlay = Overlay::new(None);
        let mut state = ViewerState::default();
        select(&mut overlay, &mut state, Field::CameraMouseUpdate);
        let before = state.camera_mouse_update;
        let (input, frame) = type_keys(&[Key::Space], false);
        overlay.handle_input(&mut state, &input, &frame);
        assert_eq!(state.camera_mouse_update, !before);
    }

    // ── content ───────────────────────────────────────────────────────────

    #[test]
    fn camera_panel_reports_orientation() {
        let overlay = Overlay::new(None);
        let state = ViewerState::default();
        let lines = overlay.lines(&state);
        assert_eq!(lines.iter().filter(|l| l.heading).count(), 2);
        assert!(lines.iter().any(|l| l.text == "(Yaw, Pitch): (-90.000000, 0.000000)"));
        assert!(lines.iter().any(|l| l.text == "Camera mouse update: [x]"));
        assert_eq!(lines.iter().filter(|l| l.selected).count(), 1);
    }

    #[test]
    fn build_without_font_draws_panels_only() {
        let overlay = Overlay::new(None);
        let mut list = DrawList::new();
        overlay.build(&ViewerState::default(), Viewport::new(1920.0, 1080.0), &FontSystem::new(), &mut list);
        assert!(!list.is_empty());
        assert!(list.items().iter().all(|i| matches!(i.cmd, DrawCmd::Rect(_))));
        // Two panel backgrounds.
        assert_eq!(list.items().iter().filter(|i| i.layer == Layer::BACKGROUND).count(), 2);
    }
}
