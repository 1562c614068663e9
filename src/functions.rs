//! Catalog of benchmark objectives with their initial search boxes.
//!
//! | Name               | Domain               | Known minimum          |
//! |--------------------|----------------------|------------------------|
//! | `three_hump_camel` | `[-5, 5]²`           | `f(0, 0) = 0`          |
//! | `goldstein_price`  | `[-2, 2]²`           | `f(0, -1) = 3`         |
//! | `beale`            | `[-4.5, 4.5]²`       | `f(3, 0.5) = 0`        |
//! | `booth`            | `[-10, 10]²`         | `f(1, 3) = 0`          |
//!
//! Each objective is written directly in interval arithmetic, so its
//! evaluation over a box is an inclusion-monotonic enclosure.

use std::sync::Arc;

use crate::error::{Result, SearchError};
use crate::interval::Interval;
use crate::types::Objective;

/// An objective together with the box in which a minimizer is sought.
#[derive(Clone)]
pub struct Problem {
    pub name: &'static str,
    pub objective: Objective,
    pub x: Interval,
    pub y: Interval,
    /// Location of a known global minimizer.
    pub argmin: (f64, f64),
    /// Known global minimum value.
    pub minimum: f64,
}

impl std::fmt::Debug for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Problem")
            .field("name", &self.name)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("argmin", &self.argmin)
            .field("minimum", &self.minimum)
            .finish_non_exhaustive()
    }
}

/// Three-hump camel, scaled by 600 to avoid fractional coefficients.
pub fn three_hump_camel(x: Interval, y: Interval) -> Interval {
    1200.0 * x.pow(2) - 630.0 * x.pow(4) + 100.0 * x.pow(6) + x * y + y.pow(2)
}

pub fn goldstein_price(x: Interval, y: Interval) -> Interval {
    (1.0 + (x + y + 1.0).pow(2)
        * (19.0 - 14.0 * x + 3.0 * x.pow(2) - 14.0 * y + 6.0 * x * y + 3.0 * y.pow(2)))
        * (30.0
            + (2.0 * x - 3.0 * y).pow(2)
                * (18.0 - 32.0 * x + 12.0 * x.pow(2) + 48.0 * y - 36.0 * x * y
                    + 27.0 * y.pow(2)))
}

pub fn beale(x: Interval, y: Interval) -> Interval {
    (1.5 - x + x * y).pow(2) + (2.25 - x + x * y.pow(2)).pow(2) + (2.625 - x + x * y.pow(3)).pow(2)
}

pub fn booth(x: Interval, y: Interval) -> Interval {
    (x + 2.0 * y - 7.0).pow(2) + (2.0 * x + y - 5.0).pow(2)
}

type Entry = (
    &'static str,
    fn(Interval, Interval) -> Interval,
    (f64, f64),
    (f64, f64),
    f64,
);

// Sorted by name.
static CATALOG: [Entry; 4] = [
    ("beale", beale, (-4.5, 4.5), (3.0, 0.5), 0.0),
    ("booth", booth, (-10.0, 10.0), (1.0, 3.0), 0.0),
    ("goldstein_price", goldstein_price, (-2.0, 2.0), (0.0, -1.0), 3.0),
    ("three_hump_camel", three_hump_camel, (-5.0, 5.0), (0.0, 0.0), 0.0),
];

/// Names of all catalog functions, sorted.
pub fn names() -> Vec<&'static str> {
    CATALOG.iter().map(|e| e.0).collect()
}

/// Look up a problem by name.
///
/// # Errors
/// `UnknownFunction` if `name` is not in the catalog.
pub fn lookup(name: &str) -> Result<Problem> {
    let &(name, f, (lo, hi), argmin, minimum) = CATALOG
        .iter()
        .find(|e| e.0 == name)
        .ok_or_else(|| SearchError::UnknownFunction(name.to_string()))?;
    Ok(Problem {
        name,
        objective: Arc::new(f),
        x: Interval::new(lo, hi),
        y: Interval::new(lo, hi),
        argmin,
        minimum,
    })
}

/// All catalog problems, sorted by name.
pub fn all() -> Vec<Problem> {
    CATALOG
        .iter()
        .filter_map(|e| lookup(e.0).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_sorted() {
        let n = names();
        assert_eq!(n, vec!["beale", "booth", "goldstein_price", "three_hump_camel"]);
        let mut sorted = n.clone();
        sorted.sort_unstable();
        assert_eq!(n, sorted);
    }

    #[test]
    fn test_lookup() {
        let p = lookup("booth").unwrap();
        assert_eq!(p.x, Interval::new(-10.0, 10.0));
        assert_eq!(p.y, Interval::new(-10.0, 10.0));
        assert_eq!(p.argmin, (1.0, 3.0));

        let err = lookup("rosenbrock").unwrap_err();
        assert_eq!(err, SearchError::UnknownFunction("rosenbrock".into()));
    }

    #[test]
    fn test_known_minima_are_enclosed() {
        for p in all() {
            let (ax, ay) = p.argmin;
            let v = (p.objective)(Interval::point(ax), Interval::point(ay));
            assert!(v.contains(p.minimum), "{}: {} does not contain {}", p.name, v, p.minimum);
            assert!(v.width() < 1e-9, "{}: point enclosure too wide: {}", p.name, v);
        }
    }

    #[test]
    fn test_enclosures_are_inclusion_monotonic_on_nested_boxes() {
        for p in all() {
            let outer = (p.objective)(p.x, p.y);
            let inner = (p.objective)(Interval::new(-1.0, 0.5), Interval::new(-0.5, 1.0));
            assert!(inner.is_subset_of(&outer), "{}: {} not in {}", p.name, inner, outer);
        }
    }

    #[test]
    fn test_booth_sample_points() {
        // f(0, 0) = 49 + 25 = 74
        let v = booth(Interval::point(0.0), Interval::point(0.0));
        assert!(v.contains(74.0));
    }
}
