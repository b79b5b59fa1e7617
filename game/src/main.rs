use std::process::ExitCode;

use engine::{AppConfig, run_game};
use snake3d::settings::SettingsStore;
use snake3d::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH, SnakeSession, WINDOW_TITLE, icon};
use winit::dpi::PhysicalSize;

fn print_help() {
    println!(
        r#"Snake3D

Usage:
  snake3d [--help]

Controls:
  W/A/S/D, arrows     steer relative to the camera
  Space / Left Shift  steer up / down
  Left drag           orbit the camera
  Scroll              zoom
  F3                  toggle the axis gizmo
  F11                 toggle fullscreen

Environment:
  SNAKE3D_SETTINGS_PATH  settings file (default: $XDG_CONFIG_HOME/snake3d/settings.json)
  SNAKE3D_RENDERER       cpu | gpu
  SNAKE3D_VSYNC          1 | 0
  RUST_LOG               log filter
"#
    );
}

fn main() -> ExitCode {
    if std::env::args().skip(1).any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    engine::logging::init();

    let store = SettingsStore::from_env();
    log::debug!("settings path: {}", store.path().display());
    let settings = store.load_or_default().with_env_overrides();

    let config = AppConfig {
        title: WINDOW_TITLE.to_string(),
        min_size: PhysicalSize::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT),
        vsync: settings.video.vsync,
        backend: settings.video.renderer,
        icon: Some(icon::window_icon()),
    };

    match run_game(config, SnakeSession::new(settings.controls)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("snake3d: {err}");
            ExitCode::FAILURE
        }
    }
}
