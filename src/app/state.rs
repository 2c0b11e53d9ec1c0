//! Editor state - the Editor struct definition and sub-structs.

use super::remote::RemoteUpdate;
use crate::app_state::AppState;
use crate::constants::{CACHE_IGNORE_ZOOM_RESET_MS, TAP_TWICE_TIMEOUT_MS};
use crate::debounce::Debounce;
use crate::element::{Element, TextMeasurer};
use crate::geometry::Point;
use crate::history::History;
use crate::input::{InteractionState, PinchGesture, PointerMode};
use crate::perf::PerfMonitor;
use crate::scene::Scene;
use crate::settings::Settings;
use crate::settings_watcher::SettingsWatcher;
use crate::spatial_index::HitTester;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

/// Called once per handled event with the full element list and the app state.
pub type ChangeListener = Box<dyn FnMut(&[Element], &AppState)>;

/// Handle returned by `Editor::add_change_listener`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// What the editor is doing right now, with the orthogonal layers folded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Idle,
    Panning,
    DraggingScrollBar,
    Pointer(PointerMode),
    EditingText,
    DrawingLinearMultiPoint,
    Pinching,
}

// =============================================================================
// Sub-structs
// =============================================================================

/// Loaded settings and the optional hot-reload watcher
pub struct SettingsState {
    pub data: Settings,
    pub watcher: Option<SettingsWatcher>,
}

/// Timing, deadlines and the cross-thread remote inbox
pub struct SystemState {
    pub perf: PerfMonitor,
    /// Resets `should_cache_ignore_zoom` and restores a stashed selection
    pub cache_ignore_zoom: Debounce,
    /// Open while a first touch tap waits for its second
    pub tap_twice: Debounce,
    /// Clock of the event being handled
    pub now: Instant,
    pub remote_inbox: Arc<Mutex<VecDeque<RemoteUpdate>>>,
}

impl SystemState {
    pub fn new() -> Self {
        Self {
            perf: PerfMonitor::new(),
            cache_ignore_zoom: Debounce::from_millis(CACHE_IGNORE_ZOOM_RESET_MS),
            tap_twice: Debounce::from_millis(TAP_TWICE_TIMEOUT_MS),
            now: Instant::now(),
            remote_inbox: Arc::new(Mutex::new(VecDeque::new())),
        }
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyboard-derived state that outlives single events
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    /// Space held: a main-button press pans
    pub holding_space: bool,
    /// An arrow key moved the selection since the last key up
    pub nudged: bool,
    /// Last pointer position in viewport coordinates
    pub last_viewport_cursor: Point,
}

/// One editor instance: scene, history and every piece of interaction state.
pub struct Editor {
    pub(crate) scene: Scene,
    pub(crate) history: History,
    pub(crate) state: AppState,
    pub(crate) interaction: InteractionState,
    pub(crate) pinch: PinchGesture,
    pub(crate) hit_tester: HitTester,
    pub(crate) settings: SettingsState,
    pub(crate) system: SystemState,
    pub(crate) keys: KeyState,
    pub(crate) measurer: Box<dyn TextMeasurer>,
    /// The text under edit was created by this edit session
    pub(crate) text_edit_is_new: bool,
    pub(crate) listeners: Vec<(ListenerId, ChangeListener)>,
    pub(crate) next_listener_id: u64,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("scene", &self.scene)
            .field("history", &self.history.len())
            .field("interaction", &self.interaction)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
