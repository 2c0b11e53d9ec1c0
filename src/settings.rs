//! User settings persisted as JSON in the config directory.
//!
//! Missing fields take their defaults, so older settings files keep loading
//! as fields are added.

use crate::constants::{GRID_SIZE, WHEEL_ZOOM_MAX_STEP};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Grid spacing used when grid mode is on
    pub grid_size: f32,
    pub grid_mode_enabled: bool,
    /// Keep the active tool after creating an element
    pub element_locked: bool,
    pub binding_enabled: bool,
    pub zen_mode_enabled: bool,
    pub show_stats: bool,
    /// Cap on one ctrl+wheel zoom step, in wheel delta units
    pub wheel_zoom_max_step: f32,
    /// `tracing` filter directive, e.g. `inkboard=debug`
    pub log_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            grid_mode_enabled: false,
            element_locked: false,
            binding_enabled: true,
            zen_mode_enabled: false,
            show_stats: false,
            wheel_zoom_max_step: WHEEL_ZOOM_MAX_STEP,
            log_filter: None,
        }
    }
}

/// `<config dir>/inkboard/settings.json`.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("inkboard").join("settings.json"))
}

impl Settings {
    /// Load from the default path, falling back to defaults on any problem.
    pub fn load() -> Self {
        let Some(path) = default_settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to load settings: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&raw)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        Ok(settings.sanitized())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = default_settings_path().context("no config directory on this platform")?;
        self.save_to(&path)
    }

    /// Atomic write: serialize into a temp file next to `path`, then rename over it.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let json = serde_json::to_string_pretty(self)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(path)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// The grid size to use, if grid mode is on.
    pub fn effective_grid_size(&self) -> Option<f32> {
        self.grid_mode_enabled.then_some(self.grid_size)
    }

    fn sanitized(mut self) -> Self {
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            self.grid_size = GRID_SIZE;
        }
        if !(self.wheel_zoom_max_step.is_finite() && self.wheel_zoom_max_step > 0.0) {
            self.wheel_zoom_max_step = WHEEL_ZOOM_MAX_STEP;
        }
        self
    }
}
