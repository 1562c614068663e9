//! Shared search state: the best upper bound and the minimizer collection.
//!
//! All concurrently running branches of one search share a single
//! [`SharedState`]. The mutating operations (improve-and-evict, insert) run
//! under one mutex so that no branch can observe a lowered bound without the
//! matching eviction, and no insert can interleave with an eviction.
//!
//! The prune test only needs a bound that is never *smaller* than the true
//! current one. `min_ub` decreases monotonically, so a relaxed atomic mirror
//! written inside the critical section is enough: a stale read can only be
//! larger, which costs extra exploration and never soundness.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::minimizer::{Minimizer, MinimizerList};
use crate::types::SearchStats;

struct Guarded {
    min_ub: f64,
    minimizers: MinimizerList,
}

/// Mutex-guarded `(min_ub, MinimizerList)` pair plus a lock-free bound mirror.
pub struct SharedState {
    inner: Mutex<Guarded>,
    bound_bits: AtomicU64,
}

/// Result of an insertion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    /// The record's lower bound already exceeded `min_ub`.
    Stale,
}

impl SharedState {
    /// `(+∞, empty)`.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Guarded {
                min_ub: f64::INFINITY,
                minimizers: MinimizerList::new(),
            }),
            bound_bits: AtomicU64::new(f64::INFINITY.to_bits()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Guarded> {
        // Critical sections never leave the pair half-updated, so a poisoned
        // lock still guards consistent data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current best upper bound, possibly slightly stale (never too small).
    #[inline]
    pub fn min_ub(&self) -> f64 {
        f64::from_bits(self.bound_bits.load(Ordering::Relaxed))
    }

    /// Lower `min_ub` to `ub` if it is an improvement, evicting every record
    /// with `lower_bound >= ub` in the same critical section.
    ///
    /// Returns the number of evicted records, or `None` if `ub` did not
    /// improve on the bound held under the lock.
    pub fn improve(&self, ub: f64) -> Option<usize> {
        let mut guard = self.lock();
        if !(ub < guard.min_ub) {
            return None;
        }
        guard.min_ub = ub;
        self.bound_bits.store(ub.to_bits(), Ordering::Relaxed);
        Some(guard.minimizers.evict_from(ub))
    }

    /// Insert a leaf record unless `min_ub` has meanwhile dropped below its
    /// lower bound.
    pub fn insert(&self, record: Minimizer) -> Insertion {
        let mut guard = self.lock();
        if record.lower_bound() > guard.min_ub {
            return Insertion::Stale;
        }
        guard.minimizers.insert(record);
        Insertion::Inserted
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.lock().minimizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the state, returning `(min_ub, minimizers)`.
    pub fn into_parts(self) -> (f64, MinimizerList) {
        let guarded = self.inner.into_inner().unwrap_or_else(PoisonError::into_inner);
        (guarded.min_ub, guarded.minimizers)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Counters
// ──────────────────────────────────────────────────────────────────────────────

/// Lock-free counters behind [`SearchStats`].
#[derive(Debug, Default)]
pub struct StatsCounters {
    boxes_evaluated: AtomicUsize,
    pruned: AtomicUsize,
    improvements: AtomicUsize,
    evicted: AtomicUsize,
    leaves: AtomicUsize,
    stale_leaves: AtomicUsize,
    unresolved: AtomicUsize,
    max_depth: AtomicUsize,
}

impl StatsCounters {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn evaluated(&self, depth: usize) {
        self.boxes_evaluated.fetch_add(1, Ordering::Relaxed);
        self.max_depth.fetch_max(depth, Ordering::Relaxed);
    }

    #[inline]
    pub fn pruned(&self) {
        self.pruned.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn improved(&self, evicted: usize) {
        self.improvements.fetch_add(1, Ordering::Relaxed);
        self.evicted.fetch_add(evicted, Ordering::Relaxed);
    }

    #[inline]
    pub fn leaf(&self, insertion: Insertion) {
        match insertion {
            Insertion::Inserted => self.leaves.fetch_add(1, Ordering::Relaxed),
            Insertion::Stale => self.stale_leaves.fetch_add(1, Ordering::Relaxed),
        };
    }

    #[inline]
    pub fn unresolved(&self) {
        self.unresolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SearchStats {
        SearchStats {
            boxes_evaluated: self.boxes_evaluated.load(Ordering::Relaxed),
            pruned: self.pruned.load(Ordering::Relaxed),
            improvements: self.improvements.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            leaves: self.leaves.load(Ordering::Relaxed),
            stale_leaves: self.stale_leaves.load(Ordering::Relaxed),
            unresolved: self.unresolved.load(Ordering::Relaxed),
            max_depth: self.max_depth.load(Ordering::Relaxed),
        }
    }
}
