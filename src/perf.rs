//! Event handling performance instrumentation.
//!
//! Every platform event runs to completion inside `Editor::dispatch`; this
//! module times those runs and the hot paths inside them.
//!
//! ## Features
//!
//! - **Per-event timing**: each dispatched event kind gets rolling statistics
//! - **Scoped timers**: RAII-style timing for code blocks
//! - **Conditional compilation**: the scope macros vanish without the `profiling` feature
//!
//! ## Usage
//!
//! ```ignore
//! use inkboard::perf::{profile_scope, profile_function};
//!
//! fn hit_test_all() {
//!     profile_function!();
//!     {
//!         profile_scope!("rebuild_index");
//!         // ...
//!     }
//! }
//! ```

use crate::constants::EVENT_BUDGET_MS;
use std::collections::{HashMap, VecDeque};
use std::time::Instant;
use tracing::warn;
#[cfg(feature = "profiling")]
use tracing::trace;

/// Number of samples kept per event kind
const STATS_SAMPLE_COUNT: usize = 100;

// ============================================================================
// Profiling Macros (zero-cost when disabled)
// ============================================================================

/// Profile a scope with the given name. Zero-cost when profiling is disabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, 1.0);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
    ($name:expr, $threshold_ms:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
        #[cfg(not(feature = "profiling"))]
        let _ = ($name, $threshold_ms);
    };
}

/// Profile the current function. Zero-cost when profiling is disabled.
#[macro_export]
macro_rules! profile_function {
    () => {
        $crate::profile_scope!($crate::function_name!());
    };
}

/// Path of the enclosing function.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        // Strip the trailing "::f"
        &name[..name.len() - 3]
    }};
}

pub use profile_function;
pub use profile_scope;

// ============================================================================
// Statistics
// ============================================================================

/// Rolling statistics for one event kind.
///
/// `count`, `max_ms` and `over_budget` cover the whole session; `average`
/// and `p95` cover the last `STATS_SAMPLE_COUNT` samples only.
#[derive(Debug, Clone, Default)]
pub struct OperationStats {
    window: VecDeque<f64>,
    count: u64,
    max_ms: f64,
    over_budget: u64,
}

impl OperationStats {
    pub fn record(&mut self, ms: f64) {
        if self.window.len() == STATS_SAMPLE_COUNT {
            self.window.pop_front();
        }
        self.window.push_back(ms);
        self.count += 1;
        self.max_ms = self.max_ms.max(ms);
        self.over_budget += u64::from(ms > EVENT_BUDGET_MS);
    }

    pub fn average(&self) -> f64 {
        let n = self.window.len();
        if n == 0 {
            return 0.0;
        }
        self.window.iter().sum::<f64>() / n as f64
    }

    pub fn p95(&self) -> f64 {
        let mut window: Vec<f64> = self.window.iter().copied().collect();
        if window.is_empty() {
            return 0.0;
        }
        let rank = (window.len() * 95 / 100).min(window.len() - 1);
        let (_, value, _) = window.select_nth_unstable_by(rank, f64::total_cmp);
        *value
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn max_ms(&self) -> f64 {
        self.max_ms
    }

    /// Samples slower than the frame budget.
    pub fn over_budget(&self) -> u64 {
        self.over_budget
    }
}

// ============================================================================
// Event Monitor
// ============================================================================

/// Per-event handling time, keyed by event kind.
#[derive(Debug, Default)]
pub struct PerfMonitor {
    stats: HashMap<&'static str, OperationStats>,
    current: Option<(&'static str, Instant)>,
}

impl PerfMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_event(&mut self, kind: &'static str) {
        self.current = Some((kind, Instant::now()));
    }

    /// Close the open event and return its duration in milliseconds.
    pub fn end_event(&mut self) -> Option<f64> {
        let (kind, start) = self.current.take()?;
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        self.stats.entry(kind).or_default().record(ms);
        if ms > EVENT_BUDGET_MS {
            warn!(
                event = kind,
                elapsed_ms = format!("{:.2}", ms),
                budget_ms = format!("{:.2}", EVENT_BUDGET_MS),
                "Slow event handling"
            );
        }
        Some(ms)
    }

    pub fn stats(&self, kind: &str) -> Option<&OperationStats> {
        self.stats.get(kind)
    }

    pub fn all_stats(&self) -> &HashMap<&'static str, OperationStats> {
        &self.stats
    }

    pub fn reset(&mut self) {
        self.stats.clear();
        self.current = None;
    }
}

// ============================================================================
// Scoped Timer
// ============================================================================

/// Logs the duration of a scope on drop when it exceeds `threshold_ms`.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        if elapsed_ms <= self.threshold_ms {
            return;
        }
        #[cfg(feature = "profiling")]
        trace!(operation = self.name, elapsed_ms = format!("{:.2}", elapsed_ms), "[PERF]");
        #[cfg(not(feature = "profiling"))]
        warn!(
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            threshold_ms = format!("{:.2}", self.threshold_ms),
            "Slow operation"
        );
    }
}
