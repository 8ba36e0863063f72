//! Unit tests for perf module.

use pinkbombs::perf::{OperationStats, ScopedTimer, StatsBook, measure};

#[test]
fn test_scoped_timer_creation() {
    // High threshold, so dropping the timer logs nothing
    let timer = ScopedTimer::new("test_op", 1000.0);
    assert!(timer.elapsed_ms() >= 0.0);
}

#[test]
fn test_measure_returns_result() {
    let (value, elapsed) = measure(|| 6 * 7);
    assert_eq!(value, 42);
    assert!(elapsed >= 0.0);
}

#[test]
fn test_stats_book_groups_by_operation() {
    let mut book = StatsBook::new();
    book.record("graphs", 10.0);
    book.record("graphs", 30.0);
    book.record("maps", 5.0);

    let graphs = book.get("graphs").unwrap();
    assert_eq!(graphs.count(), 2);
    assert_eq!(graphs.average(), 20.0);
    assert_eq!(graphs.max(), 30.0);
    assert_eq!(book.get("maps").unwrap().count(), 1);
    assert!(book.get("tables").is_none());

    // Summary only logs
    book.log_summary();
}

#[test]
fn test_empty_stats() {
    let stats = OperationStats::default();
    assert_eq!(stats.count(), 0);
    assert_eq!(stats.average(), 0.0);
    assert_eq!(stats.p95(), 0.0);
}
