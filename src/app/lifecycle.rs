//! Editor lifecycle - construction, settings application and hot reload.

use super::state::{Editor, KeyState, SettingsState, SystemState};
use crate::app_state::AppState;
use crate::element::{ApproximateTextMeasurer, TextMeasurer};
use crate::error::EditorResult;
use crate::history::History;
use crate::input::{InteractionState, PinchGesture};
use crate::scene::Scene;
use crate::settings::Settings;
use crate::settings_watcher::{SettingsEvent, SettingsWatcher};
use crate::spatial_index::HitTester;
use std::path::Path;

impl Editor {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Editor configured from the user's settings file.
    pub fn from_user_settings() -> Self {
        Self::with_settings(Settings::load())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let mut editor = Self {
            scene: Scene::new(),
            history: History::new(),
            state: AppState::default(),
            interaction: InteractionState::default(),
            pinch: PinchGesture::default(),
            hit_tester: HitTester::new(),
            settings: SettingsState {
                data: settings,
                watcher: None,
            },
            system: SystemState::new(),
            keys: KeyState::default(),
            measurer: Box::new(ApproximateTextMeasurer),
            text_edit_is_new: false,
            listeners: Vec::new(),
            next_listener_id: 0,
        };
        editor.apply_settings();
        // Baseline entry; undo never goes below it
        editor
            .history
            .record(&editor.state, editor.scene.elements_including_deleted());
        editor
    }

    /// Swap the text measuring backend.
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings.data
    }

    /// Replace the settings and push them into the app state.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings.data = settings;
        self.apply_settings();
    }

    /// Push the settings fields that mirror app state.
    pub fn apply_settings(&mut self) {
        let settings = &self.settings.data;
        self.state.grid_size = settings.effective_grid_size();
        self.state.element_locked = settings.element_locked;
        self.state.is_binding_enabled = settings.binding_enabled;
        self.state.zen_mode_enabled = settings.zen_mode_enabled;
        self.state.show_stats = settings.show_stats;
    }

    /// Start hot-reloading settings from `path`.
    pub fn watch_settings(&mut self, path: &Path) -> EditorResult<()> {
        self.settings.watcher = Some(SettingsWatcher::new(path)?);
        Ok(())
    }

    /// Start hot-reloading from the default settings location.
    pub fn watch_default_settings(&mut self) {
        self.settings.watcher = SettingsWatcher::for_default_path();
    }

    /// Poll the watcher and reload on change. Called from `tick`.
    pub fn check_settings_reload(&mut self) {
        let Some(watcher) = self.settings.watcher.as_mut() else {
            return;
        };
        let Some(event) = watcher.poll() else {
            return;
        };
        match event {
            SettingsEvent::Modified | SettingsEvent::Created => {
                tracing::info!(path = %watcher.path().display(), "Settings file changed, reloading...");
                match Settings::load_from(watcher.path()) {
                    Ok(settings) => {
                        self.settings.data = settings;
                        self.apply_settings();
                    }
                    Err(e) => tracing::warn!("Keeping previous settings: {:#}", e),
                }
            }
            SettingsEvent::Deleted => {
                tracing::warn!("Settings file deleted");
            }
            SettingsEvent::Error(e) => {
                tracing::error!("Settings watch error: {}", e);
            }
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
