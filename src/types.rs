//! Core type definitions: objective signature, search options, statistics and
//! results.

use std::fmt;
use std::sync::Arc;

use crate::interval::Interval;
use crate::minimizer::MinimizerList;

// ──────────────────────────────────────────────────────────────────────────────
// Objective
// ──────────────────────────────────────────────────────────────────────────────

/// Objective function signature.
///
/// Must be inclusion-monotonic: evaluating on a sub-box yields an enclosure
/// contained in the evaluation on any containing box. Every soundness property
/// of the search rests on this.
pub type ObjectiveFn = dyn Fn(Interval, Interval) -> Interval + Send + Sync;

/// Shared handle to an objective, cheap to clone across threads and workers.
pub type Objective = Arc<ObjectiveFn>;

// ──────────────────────────────────────────────────────────────────────────────
// Options
// ──────────────────────────────────────────────────────────────────────────────

/// What to do when the objective returns an empty or NaN-bearing interval
/// over a non-empty box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IllFormedPolicy {
    /// Drop the box without a record and count it in
    /// [`SearchStats::unresolved`].
    #[default]
    Prune,
    /// Abort the search with [`crate::SearchError::IllFormedEnclosure`].
    Fail,
}

/// Default split threshold.
pub const DEFAULT_THRESHOLD: f64 = 1e-3;

/// Default rayon pool size per search.
pub const DEFAULT_THREADS: usize = 4;

/// Configuration for one branch-and-bound search.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Boxes whose x-width is at most this are recorded instead of split.
    pub threshold: f64,

    /// Run the four sub-boxes of each split as parallel rayon tasks.
    /// When `false`, children are explored in order `(xl,yl) (xl,yr) (xr,yl) (xr,yr)`
    /// and the run is fully deterministic.
    pub parallel: bool,

    /// Number of threads in the pool. Ignored when `parallel` is false.
    pub threads: usize,

    /// Boxes narrower than this recurse serially even in parallel mode,
    /// avoiding task overhead near the leaves. `0.0` always forks.
    pub min_parallel_width: f64,

    /// Handling of ill-formed objective values.
    pub ill_formed: IllFormedPolicy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            parallel: true,
            threads: DEFAULT_THREADS,
            min_parallel_width: 0.0,
            ill_formed: IllFormedPolicy::default(),
        }
    }
}

impl SearchOptions {
    /// Options for a single-threaded, deterministic run.
    pub fn serial(threshold: f64) -> Self {
        Self {
            threshold,
            parallel: false,
            ..Default::default()
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Statistics
// ──────────────────────────────────────────────────────────────────────────────

/// Counters collected during a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Objective evaluations (one per visited box).
    pub boxes_evaluated: usize,
    /// Boxes discarded because their lower bound exceeded `min_ub`.
    pub pruned: usize,
    /// Times `min_ub` was lowered.
    pub improvements: usize,
    /// Records removed because a better upper bound made them obsolete.
    pub evicted: usize,
    /// Records inserted.
    pub leaves: usize,
    /// Leaves rejected at insertion because `min_ub` had already dropped
    /// below their lower bound.
    pub stale_leaves: usize,
    /// Boxes dropped because the objective returned an ill-formed interval.
    pub unresolved: usize,
    /// Deepest recursion level reached (root is 0).
    pub max_depth: usize,
}

impl SearchStats {
    /// Sum counters, keeping the larger depth.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            boxes_evaluated: self.boxes_evaluated + other.boxes_evaluated,
            pruned: self.pruned + other.pruned,
            improvements: self.improvements + other.improvements,
            evicted: self.evicted + other.evicted,
            leaves: self.leaves + other.leaves,
            stale_leaves: self.stale_leaves + other.stale_leaves,
            unresolved: self.unresolved + other.unresolved,
            max_depth: self.max_depth.max(other.max_depth),
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Result
// ──────────────────────────────────────────────────────────────────────────────

/// Outcome of one branch-and-bound search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Smallest proven upper bound on the global minimum.
    pub min_ub: f64,

    /// Surviving candidate boxes, ascending by lower bound.
    pub minimizers: MinimizerList,

    pub stats: SearchStats,
}

impl SearchResult {
    /// Smallest lower bound over the surviving boxes; with `min_ub` this
    /// brackets the global minimum.
    pub fn min_lb(&self) -> Option<f64> {
        self.minimizers.first().map(|m| m.lower_bound())
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of minimizers: {}", self.minimizers.len())?;
        write!(f, "Upper bound for minimum: {}", self.min_ub)
    }
}
