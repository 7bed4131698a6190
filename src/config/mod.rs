use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigPathError {
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    MissingHomeDirectory,
}

const APP_DIR: &str = "pixpaint";
const APP_CONFIG_FILE: &str = "config.json";
const DEFAULT_EXPORT_DIR: &str = "save";

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub min_dimension: u32,
    pub max_dimension: u32,
    pub history_capacity: usize,
    pub background: Color,
    pub export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            min_dimension: 100,
            max_dimension: 2000,
            history_capacity: crate::history::DEFAULT_CAPACITY,
            background: Color::WHITE,
            export_dir: None,
        }
    }
}

impl AppConfig {
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR))
    }

    pub fn accepts_dimensions(&self, width: u32, height: u32) -> bool {
        let range = self.min_dimension..=self.max_dimension;
        range.contains(&width) && range.contains(&height)
    }

    /// Repairs values that would make the canvas unusable.
    pub fn normalized(mut self) -> Self {
        if self.min_dimension == 0 {
            self.min_dimension = 1;
        }
        if self.max_dimension < self.min_dimension {
            tracing::warn!(
                min = self.min_dimension,
                max = self.max_dimension,
                "max_dimension below min_dimension; raising it"
            );
            self.max_dimension = self.min_dimension;
        }
        let clamp = |value: u32| value.clamp(self.min_dimension, self.max_dimension);
        let (width, height) = (clamp(self.canvas_width), clamp(self.canvas_height));
        if (width, height) != (self.canvas_width, self.canvas_height) {
            tracing::warn!(
                width = self.canvas_width,
                height = self.canvas_height,
                "initial canvas size outside dimension bounds; clamping"
            );
        }
        self.canvas_width = width;
        self.canvas_height = height;
        self.history_capacity = self.history_capacity.max(1);
        self
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(err) => {
            tracing::debug!(%err, "no config directory; using defaults");
            return AppConfig::default();
        }
    };
    if !path.exists() {
        return AppConfig::default();
    }
    let config = match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    };
    config.normalized()
}

pub fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
