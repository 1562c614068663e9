//! Engine event trace (requires `--features trace`).

#![cfg(feature = "trace")]

use std::sync::Arc;

use interval_bnb::{BranchAndBound, Interval, MinimizeBuilder, SearchOptions, TraceWriter};

fn sphere(x: Interval, y: Interval) -> Interval {
    x.pow(2) + y.pow(2)
}

#[test]
fn test_trace_counts_match_stats() {
    let tracer = Arc::new(TraceWriter::new());
    let unit = Interval::new(-1.0, 1.0);
    let result = BranchAndBound::new(sphere, SearchOptions::serial(0.05))
        .with_tracer(Arc::clone(&tracer))
        .minimize(unit, unit)
        .unwrap();

    assert_eq!(tracer.count_tag("PRUNE"), result.stats.pruned);
    assert_eq!(tracer.count_tag("IMPROVE"), result.stats.improvements);
    assert_eq!(tracer.count_tag("LEAF"), result.stats.leaves);
    assert_eq!(tracer.count_tag("STALE"), result.stats.stale_leaves);
    assert_eq!(tracer.count_tag("UNRESOLVED"), 0);
}

#[test]
fn test_serial_trace_is_deterministic() {
    let unit = Interval::new(-1.0, 1.0);
    let capture = || {
        let tracer = Arc::new(TraceWriter::new());
        MinimizeBuilder::new(sphere, unit, unit)
            .threshold(0.1)
            .parallel(false)
            .tracer(Arc::clone(&tracer))
            .minimize()
            .unwrap();
        tracer.get_output()
    };
    let first = capture();
    assert!(!first.is_empty());
    assert_eq!(first, capture());
}

#[test]
fn test_parallel_trace_has_same_leaf_depths() {
    let unit = Interval::new(-1.0, 1.0);
    let tracer = Arc::new(TraceWriter::new());
    let opts = SearchOptions {
        threshold: 0.05,
        threads: 4,
        ..Default::default()
    };
    BranchAndBound::new(sphere, opts)
        .with_tracer(Arc::clone(&tracer))
        .minimize(unit, unit)
        .unwrap();
    for line in tracer.get_lines().iter().filter(|l| l.starts_with("TRACE LEAF")) {
        assert!(line.contains("depth=6"), "{}", line);
    }
}
