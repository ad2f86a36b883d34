//! Persisted viewer settings.
//!
//! Plain text, one value per line: clear color R G B, overlay flag (0/1),
//! camera position X Y Z, camera front X Y Z. Reading is forgiving: values
//! are consumed in order until the first missing or malformed token, and
//! every field not reached keeps its default.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;

pub const SETTINGS_FILE_NAME: &str = "program_state.txt";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub clear_color: Vec3,
    pub ui_enabled: bool,
    pub camera_position: Vec3,
    pub camera_front: Vec3,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clear_color: Vec3::ZERO,
            ui_enabled: false,
            camera_position: Vec3::new(0.0, 0.0, 3.0),
            camera_front: Vec3::NEG_Z,
        }
    }
}

impl Settings {
    /// Reads `path`, falling back to defaults for anything it cannot read.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                log::info!("loaded settings from {}", path.display());
                Self::parse(&text)
            }
            Err(e) => {
                log::debug!("no settings at {} ({e}); using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut settings = Self::default();
        // `None` only means reading stopped early; what was read is kept.
        let _ = read_fields(&mut text.split_whitespace(), &mut settings);
        settings
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let [r, g, b] = self.clear_color.to_array();
        let [px, py, pz] = self.camera_position.to_array();
        let [fx, fy, fz] = self.camera_front.to_array();
        for v in [r, g, b] {
            let _ = writeln!(out, "{v}");
        }
        let _ = writeln!(out, "{}", u8::from(self.ui_enabled));
        for v in [px, py, pz, fx, fy, fz] {
            let _ = writeln!(out, "{v}");
        }
        out
    }

    /// Overwrites `path` in place.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_text())
            .with_context(|| format!("failed to write settings to {}", path.display()))
    }
}

fn read_fields<'a>(tokens: &mut impl Iterator<Item = &'a str>, s: &mut Settings) -> Option<()> {
    read_vec3(tokens, &mut s.clear_color)?;
    s.ui_enabled = parse_flag(tokens.next()?)?;
    read_vec3(tokens, &mut s.camera_position)?;
    read_vec3(tokens, &mut s.camera_front)
}

/// Fills `dst` one component at a time; components read before a failure are kept.
fn read_vec3<'a>(tokens: &mut impl Iterator<Item = &'a str>, dst: &mut Vec3) -> Option<()> {
    for i in 0..3 {
        dst[i] = tokens.next()?.parse::<f32>().ok()?;
    }
    Some(())
}

fn parse_flag(token: &str) -> Option<bool> {
    match token {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}
