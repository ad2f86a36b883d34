use anyhow::Result;
use clap::Parser;

use wasteland_engine::device::GpuInit;
use wasteland_engine::logging::{LoggingConfig, init_logging};
use wasteland_engine::window::{Runtime, RuntimeConfig};

use wasteland_viewer::app::{ViewerApp, load_overlay_font};
use wasteland_viewer::assets::SceneAssets;
use wasteland_viewer::cli::Cli;
use wasteland_viewer::scene::SceneVariant;
use wasteland_viewer::settings::Settings;
use wasteland_viewer::state::ViewerState;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let settings_path = cli.settings_path();
    let state = ViewerState::from_settings(&Settings::load(&settings_path));

    let scene = SceneVariant::for_kind(cli.scene.into());
    let assets = SceneAssets::load(&cli.resources, &scene);
    let (fonts, font) = load_overlay_font(&cli.resources);

    let app = ViewerApp::new(state, scene, assets, settings_path, fonts, font);

    let gpu_init = GpuInit {
        prefer_srgb: false,
        present_mode: cli.present_mode(),
        ..GpuInit::default()
    };

    Runtime::run(RuntimeConfig::default(), gpu_init, app)
}
