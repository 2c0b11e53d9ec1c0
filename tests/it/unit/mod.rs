//! Unit tests for Inkboard.

mod perf_tests;
mod settings_watcher_tests;
mod snapshot_tests;
