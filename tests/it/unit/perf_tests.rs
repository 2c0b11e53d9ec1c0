//! Unit tests for perf module.

use inkboard::input::{EditorEvent, PointerEvent};
use inkboard::perf::{PerfMonitor, ScopedTimer};
use inkboard::Editor;

#[test]
fn test_perf_monitor_basic() {
    let mut monitor = PerfMonitor::new();

    monitor.begin_event("pointer_move");
    let time = monitor.end_event();

    assert!(time.is_some());
    assert!(time.unwrap() >= 0.0);
    assert_eq!(monitor.stats("pointer_move").map(|s| s.count()), Some(1));
}

#[test]
fn test_end_without_begin_is_none() {
    let mut monitor = PerfMonitor::new();
    assert!(monitor.end_event().is_none());
    assert!(monitor.all_stats().is_empty());
}

#[test]
fn test_stats_per_event_kind() {
    let mut monitor = PerfMonitor::new();
    for _ in 0..5 {
        monitor.begin_event("pointer_move");
        monitor.end_event();
    }
    monitor.begin_event("key_down");
    monitor.end_event();

    let moves = monitor.stats("pointer_move").unwrap();
    assert_eq!(moves.count(), 5);
    assert!(moves.average() >= 0.0);
    assert!(moves.p95() <= moves.max_ms());
    assert_eq!(monitor.all_stats().len(), 2);

    monitor.reset();
    assert!(monitor.stats("pointer_move").is_none());
}

#[test]
fn test_scoped_timer_creation() {
    // High threshold, so dropping logs nothing
    let timer = ScopedTimer::new("test_op", 1000.0);
    assert!(timer.elapsed_ms() >= 0.0);
}

#[test]
fn test_dispatch_records_event_timing() {
    let mut editor = Editor::new();
    for _ in 0..3 {
        editor
            .dispatch(EditorEvent::PointerMove(PointerEvent::at(10.0, 10.0)))
            .unwrap();
    }
    let stats = editor.perf().stats("pointer_move").unwrap();
    assert_eq!(stats.count(), 3);
}
