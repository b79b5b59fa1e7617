use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::pixels_renderer::{RenderBackend, env_bool};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::{DEFAULT_DRAG_SENSITIVITY, DEFAULT_ZOOM_SENSITIVITY};

pub const SETTINGS_PATH_ENV: &str = "SNAKE3D_SETTINGS_PATH";
pub const RENDERER_ENV: &str = "SNAKE3D_RENDERER";
pub const VSYNC_ENV: &str = "SNAKE3D_VSYNC";

const MAX_SENSITIVITY: f32 = 10.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed settings file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VideoSettings {
    pub vsync: bool,
    pub renderer: RenderBackend,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            renderer: RenderBackend::default(),
        }
    }
}

/// Camera control sensitivities: radians per dragged pixel and radius per scroll line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlSettings {
    pub drag_sensitivity: f32,
    pub zoom_sensitivity: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            drag_sensitivity: DEFAULT_DRAG_SENSITIVITY,
            zoom_sensitivity: DEFAULT_ZOOM_SENSITIVITY,
        }
    }
}

impl ControlSettings {
    pub fn clamp(mut self) -> Self {
        self.drag_sensitivity = clamp_sensitivity(self.drag_sensitivity, DEFAULT_DRAG_SENSITIVITY);
        self.zoom_sensitivity = clamp_sensitivity(self.zoom_sensitivity, DEFAULT_ZOOM_SENSITIVITY);
        self
    }
}

fn clamp_sensitivity(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, MAX_SENSITIVITY)
    } else {
        fallback
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub video: VideoSettings,
    #[serde(default)]
    pub controls: ControlSettings,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            video: VideoSettings::default(),
            controls: ControlSettings::default(),
        }
    }
}

impl PlayerSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.controls = self.controls.clamp();
        self
    }

    /// `SNAKE3D_RENDERER` (`cpu`/`gpu`) and `SNAKE3D_VSYNC` win over the file.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(value) = std::env::var(RENDERER_ENV) {
            match RenderBackend::parse(&value) {
                Some(backend) => self.video.renderer = backend,
                None => log::warn!("ignoring unknown {RENDERER_ENV}={value:?}"),
            }
        }
        if let Some(vsync) = env_bool(VSYNC_ENV) {
            self.video.vsync = vsync;
        }
        self
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os(SETTINGS_PATH_ENV) {
            return Self::at(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("snake3d");
        path.push("settings.json");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load(&self) -> Result<PlayerSettings, SettingsError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(PlayerSettings::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice::<PlayerSettings>(&bytes)
            .map(PlayerSettings::sanitized)
            .map_err(|source| SettingsError::Json {
                path: self.path.clone(),
                source,
            })
    }

    pub fn load_or_default(&self) -> PlayerSettings {
        self.load().unwrap_or_else(|err| {
            log::warn!("{err}; using default settings");
            PlayerSettings::default()
        })
    }

    pub fn save(&self, settings: &PlayerSettings) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let text = serde_json::to_string_pretty(settings).map_err(|source| SettingsError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, text).map_err(io_err)
    }
}
