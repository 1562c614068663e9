//! Minimizer records and the bound-ordered collection that holds them.
//!
//! A [`Minimizer`] is a box small enough to stop splitting that may still
//! contain the global minimum: `lower_bound <= f(x, y) <= upper_bound` for every
//! point of the box. [`MinimizerList`] keeps them sorted by ascending lower
//! bound so that every record made obsolete by a better upper bound can be
//! dropped with one range split.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use crate::error::{Result, SearchError};
use crate::interval::Interval;

/// A surviving candidate box with proven bounds of the objective over it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimizer {
    x: Interval,
    y: Interval,
    lower_bound: f64,
    upper_bound: f64,
}

impl Minimizer {
    /// Create a record, rejecting `lower_bound > upper_bound` (or NaN bounds).
    pub fn new(x: Interval, y: Interval, lower_bound: f64, upper_bound: f64) -> Result<Self> {
        if !(lower_bound <= upper_bound) {
            return Err(SearchError::InconsistentBound {
                lower: lower_bound,
                upper: upper_bound,
            });
        }
        Ok(Self {
            x,
            y,
            lower_bound,
            upper_bound,
        })
    }

    pub fn x(&self) -> Interval {
        self.x
    }

    pub fn y(&self) -> Interval {
        self.y
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// True if the point `(px, py)` lies in the record's box.
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        self.x.contains(px) && self.y.contains(py)
    }
}

impl fmt::Display for Minimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{({},{}), [{}, {}]}}",
            self.x, self.y, self.lower_bound, self.upper_bound
        )
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Ordering key
// ──────────────────────────────────────────────────────────────────────────────

/// `(lower_bound, seq)` key: ascending bound, ties in insertion order.
#[derive(Debug, Clone, Copy)]
struct BoundKey {
    lower_bound: f64,
    seq: u64,
}

impl BoundKey {
    fn new(lower_bound: f64, seq: u64) -> Self {
        // Adding +0.0 folds -0.0 into +0.0 so total_cmp agrees with `<=`.
        Self {
            lower_bound: lower_bound + 0.0,
            seq,
        }
    }
}

impl PartialEq for BoundKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for BoundKey {}

impl PartialOrd for BoundKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BoundKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.lower_bound
            .total_cmp(&other.lower_bound)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Collection
// ──────────────────────────────────────────────────────────────────────────────

/// Ordered multiset of [`Minimizer`]s, ascending by lower bound.
///
/// Records with equal lower bounds are all kept, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MinimizerList {
    records: BTreeMap<BoundKey, Minimizer>,
    next_seq: u64,
}

impl MinimizerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. O(log n).
    pub fn insert(&mut self, record: Minimizer) {
        let key = BoundKey::new(record.lower_bound, self.next_seq);
        self.next_seq += 1;
        self.records.insert(key, record);
    }

    /// Remove every record with `lower_bound >= cutoff`, returning how many
    /// were removed.
    ///
    /// The records form a suffix of the ordering, so this is a single split
    /// at the first qualifying position.
    pub fn evict_from(&mut self, cutoff: f64) -> usize {
        let tail = self.records.split_off(&BoundKey::new(cutoff, 0));
        tail.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record with the smallest lower bound.
    pub fn first(&self) -> Option<&Minimizer> {
        self.records.values().next()
    }

    /// Record with the largest lower bound.
    pub fn last(&self) -> Option<&Minimizer> {
        self.records.values().next_back()
    }

    /// Iterate in ascending lower-bound order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.records.values(),
        }
    }

    pub fn to_vec(&self) -> Vec<Minimizer> {
        self.iter().copied().collect()
    }
}

/// Ascending iterator over a [`MinimizerList`].
pub struct Iter<'a> {
    inner: btree_map::Values<'a, BoundKey, Minimizer>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Minimizer;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a MinimizerList {
    type Item = &'a Minimizer;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(lb: f64, ub: f64) -> Minimizer {
        Minimizer::new(Interval::new(0.0, 1.0), Interval::new(0.0, 1.0), lb, ub).unwrap()
    }

    #[test]
    fn test_new_rejects_inconsistent_bounds() {
        let x = Interval::point(0.0);
        let err = Minimizer::new(x, x, 2.0, 1.0).unwrap_err();
        assert_eq!(err, SearchError::InconsistentBound { lower: 2.0, upper: 1.0 });
        assert!(Minimizer::new(x, x, f64::NAN, 1.0).is_err());
        assert!(Minimizer::new(x, x, 1.0, 1.0).is_ok());
    }

    #[test]
    fn test_display() {
        let m = Minimizer::new(Interval::new(0.0, 0.5), Interval::new(1.0, 1.5), -0.25, 3.0)
            .unwrap();
        assert_eq!(format!("{}", m), "{([0, 0.5],[1, 1.5]), [-0.25, 3]}");
    }

    #[test]
    fn test_ascending_order() {
        let mut list = MinimizerList::new();
        for lb in [3.0, -1.0, 2.0, 0.5] {
            list.insert(rec(lb, 10.0));
        }
        let lbs: Vec<f64> = list.iter().map(|m| m.lower_bound()).collect();
        assert_eq!(lbs, vec![-1.0, 0.5, 2.0, 3.0]);
        assert_eq!(list.first().unwrap().lower_bound(), -1.0);
        assert_eq!(list.last().unwrap().lower_bound(), 3.0);
        assert_eq!(list.iter().len(), 4);
    }

    #[test]
    fn test_duplicates_kept_in_insertion_order() {
        let mut list = MinimizerList::new();
        list.insert(rec(1.0, 2.0));
        list.insert(rec(1.0, 3.0));
        list.insert(rec(1.0, 4.0));
        assert_eq!(list.len(), 3);
        let ubs: Vec<f64> = list.iter().map(|m| m.upper_bound()).collect();
        assert_eq!(ubs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_evict_from_is_inclusive() {
        let mut list = MinimizerList::new();
        for lb in [0.0, 1.0, 1.0, 2.0, 3.0] {
            list.insert(rec(lb, 10.0));
        }
        let evicted = list.evict_from(1.0);
        assert_eq!(evicted, 4);
        assert_eq!(list.len(), 1);
        assert!(list.iter().all(|m| m.lower_bound() < 1.0));
    }

    #[test]
    fn test_evict_from_nothing_to_remove() {
        let mut list = MinimizerList::new();
        list.insert(rec(0.0, 1.0));
        assert_eq!(list.evict_from(5.0), 0);
        assert_eq!(list.len(), 1);
        assert_eq!(list.evict_from(f64::NEG_INFINITY), 1);
        assert!(list.is_empty());
    }

    #[test]
    fn test_signed_zero_lower_bound() {
        let mut list = MinimizerList::new();
        list.insert(rec(-0.0, 1.0));
        // -0.0 >= 0.0 holds, so a zero cutoff removes it.
        assert_eq!(list.evict_from(0.0), 1);
    }

    #[test]
    fn test_contains_point() {
        let m = rec(0.0, 1.0);
        assert!(m.contains_point(0.5, 1.0));
        assert!(!m.contains_point(1.5, 0.5));
    }
}
