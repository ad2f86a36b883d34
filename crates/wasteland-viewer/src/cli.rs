//! Command line flags.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::scene::SceneKind;

#[derive(Debug, Clone, Parser)]
#[command(name = "wasteland", version, about = "Fallout-themed scene viewer")]
pub struct Cli {
    /// Which hand-placed scene to show.
    #[arg(long, value_enum, default_value_t = SceneArg::Campfire)]
    pub scene: SceneArg,

    /// Settings file read at startup and written on exit.
    /// Defaults to `<resources>/program_state.txt`.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Root directory for models, textures and the skybox.
    #[arg(long, default_value = "resources")]
    pub resources: PathBuf,

    /// Log filter in `env_logger` syntax, overriding `RUST_LOG`.
    #[arg(long)]
    pub log: Option<String>,

    /// Present without waiting for vertical blank.
    #[arg(long)]
    pub no_vsync: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum SceneArg {
    Campfire,
    Outpost,
}

impl From<SceneArg> for SceneKind {
    fn from(arg: SceneArg) -> Self {
        match arg {
            SceneArg::Campfire => SceneKind::Campfire,
            SceneArg::Outpost => SceneKind::Outpost,
        }
    }
}

impl Cli {
    pub fn settings_path(&self) -> PathBuf {
        self.settings
            .clone()
            .unwrap_or_else(|| self.resources.join(crate::settings::SETTINGS_FILE_NAME))
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.no_vsync { wgpu::PresentMode::AutoNoVsync } else { wgpu::PresentMode::AutoVsync }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_campfire_layout() {
        let cli = Cli::parse_from(["wasteland"]);
        assert_eq!(cli.scene, SceneArg::Campfire);
        assert_eq!(cli.settings_path(), PathBuf::from("resources/program_state.txt"));
        assert_eq!(cli.present_mode(), wgpu::PresentMode::AutoVsync);
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let cli = Cli::parse_from([
            "wasteland",
            "--scene",
            "outpost",
            "--settings",
            "/tmp/state.txt",
            "--no-vsync",
        ]);
        assert_eq!(SceneKind::from(cli.scene), SceneKind::Outpost);
        assert_eq!(cli.settings_path(), PathBuf::from("/tmp/state.txt"));
        assert_eq!(cli.present_mode(), wgpu::PresentMode::AutoNoVsync);
    }

    #[test]
    fn unknown_scene_is_rejected() {
        assert!(Cli::try_parse_from(["wasteland", "--scene", "vault"]).is_err());
    }
}
