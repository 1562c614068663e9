//! Closed real intervals with outward-rounded arithmetic.
//!
//! An [`Interval`] `[lo, hi]` encloses every real value an expression can take
//! given enclosures of its inputs. Arithmetic is computed with the pure
//! directed-rounding primitives from [`crate::rounding`], so results are sound
//! regardless of which thread evaluates them.
//!
//! `lo > hi` is the empty interval: a valid value, not an error. NaN bounds
//! propagate through every operator.
//!
//! Only the operators needed to evaluate polynomials are provided
//! (`+`, `-`, `*`, negation and non-negative integer powers).
//!
//! Reference: R. E. Moore, *Interval Analysis*, Prentice-Hall, 1966.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::rounding::{
    add_down, add_up, max_nan, min_nan, mul_down, mul_up, powi_nearest, round_down, round_up,
    sub_down, sub_up,
};

/// A closed interval `[lo, hi]` with `f64` bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

impl Interval {
    /// Interval `[lo, hi]`. No ordering is enforced; `lo > hi` is empty.
    #[inline]
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Degenerate interval `[v, v]`.
    #[inline]
    pub const fn point(v: f64) -> Self {
        Self { lo: v, hi: v }
    }

    /// The whole real line `[-∞, +∞]`.
    #[inline]
    pub const fn entire() -> Self {
        Self {
            lo: f64::NEG_INFINITY,
            hi: f64::INFINITY,
        }
    }

    /// Left bound.
    #[inline]
    pub const fn lo(&self) -> f64 {
        self.lo
    }

    /// Right bound.
    #[inline]
    pub const fn hi(&self) -> f64 {
        self.hi
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    /// True if either bound is NaN.
    #[inline]
    pub fn has_nan(&self) -> bool {
        self.lo.is_nan() || self.hi.is_nan()
    }

    /// True if the interval can be used as a sound enclosure: non-empty and
    /// NaN-free.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.lo <= self.hi
    }

    /// `hi - lo`.
    ///
    /// NaN for an empty interval, `+∞` when either bound is infinite.
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        if self.lo.is_infinite() || self.hi.is_infinite() {
            return f64::INFINITY;
        }
        self.hi - self.lo
    }

    /// Midpoint of the interval.
    ///
    /// NaN for an empty interval. An infinite bound yields the finite extreme
    /// on that side (`-f64::MAX` or `f64::MAX`) so that bisection keeps making
    /// progress. When `0.5 * (lo + hi)` overflows, `0.5 * lo + 0.5 * hi` is
    /// used instead.
    pub fn mid(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        if self.lo == f64::NEG_INFINITY {
            return -f64::MAX;
        }
        if self.hi == f64::INFINITY {
            return f64::MAX;
        }
        let middle = 0.5 * (self.lo + self.hi);
        if middle.is_infinite() {
            0.5 * self.lo + 0.5 * self.hi
        } else {
            middle
        }
    }

    /// Bisects at [`mid`](Self::mid). Both halves share the midpoint.
    #[inline]
    pub fn split(&self) -> (Self, Self) {
        let m = self.mid();
        (Self::new(self.lo, m), Self::new(m, self.hi))
    }

    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        self.lo <= v && v <= self.hi
    }

    /// True if `self ⊆ other`. The empty interval is a subset of everything.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        if self.is_empty() {
            return true;
        }
        other.lo <= self.lo && self.hi <= other.hi
    }

    /// `self^n` for a non-negative integer `n`.
    ///
    /// Even powers fold straddling intervals at zero and never have a
    /// negative lower bound. The platform `pow` does
    /// not honour a rounding direction, so its results are nudged outward by
    /// [`round_down`] / [`round_up`].
    pub fn pow(self, n: u32) -> Self {
        if n == 0 {
            return Self::point(1.0);
        }
        if n == 1 {
            return self;
        }

        if n % 2 == 0 {
            // Even powers are non-negative, so the nudged lower bound is
            // clamped at zero. This keeps `[0, w]^n` inside `[-v, w]^n`.
            if self.lo >= 0.0 {
                Self::new(
                    max_nan(round_down(powi_nearest(self.lo, n)), 0.0),
                    round_up(powi_nearest(self.hi, n)),
                )
            } else if self.hi <= 0.0 {
                Self::new(
                    max_nan(round_down(powi_nearest(self.hi, n)), 0.0),
                    round_up(powi_nearest(self.lo, n)),
                )
            } else {
                let rl = round_up(powi_nearest(self.hi, n));
                let rr = round_up(powi_nearest(self.lo, n));
                Self::new(0.0, max_nan(rl, rr))
            }
        } else {
            Self::new(
                round_down(powi_nearest(self.lo, n)),
                round_up(powi_nearest(self.hi, n)),
            )
        }
    }
}

impl Default for Interval {
    /// `[-∞, +∞]`.
    fn default() -> Self {
        Self::entire()
    }
}

impl From<f64> for Interval {
    fn from(v: f64) -> Self {
        Self::point(v)
    }
}

impl From<(f64, f64)> for Interval {
    fn from((lo, hi): (f64, f64)) -> Self {
        Self::new(lo, hi)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Operators
// ──────────────────────────────────────────────────────────────────────────────

impl Add for Interval {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(add_down(self.lo, rhs.lo), add_up(self.hi, rhs.hi))
    }
}

impl Sub for Interval {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(sub_down(self.lo, rhs.hi), sub_up(self.hi, rhs.lo))
    }
}

impl Mul for Interval {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (a, b, c, d) = (self.lo, self.hi, rhs.lo, rhs.hi);
        let lo = min_nan(
            min_nan(mul_down(a, c), mul_down(a, d)),
            min_nan(mul_down(b, c), mul_down(b, d)),
        );
        let hi = max_nan(
            max_nan(mul_up(a, c), mul_up(a, d)),
            max_nan(mul_up(b, c), mul_up(b, d)),
        );
        Self::new(lo, hi)
    }
}

impl Neg for Interval {
    type Output = Self;

    /// Exact: negation never rounds.
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.hi, -self.lo)
    }
}

macro_rules! impl_scalar_ops {
    ($($Op:ident::$op:ident),* $(,)?) => {$(
        impl $Op<f64> for Interval {
            type Output = Interval;

            #[inline]
            fn $op(self, rhs: f64) -> Interval {
                $Op::$op(self, Interval::point(rhs))
            }
        }

        impl $Op<Interval> for f64 {
            type Output = Interval;

            #[inline]
            fn $op(self, rhs: Interval) -> Interval {
                $Op::$op(Interval::point(self), rhs)
            }
        }
    )*};
}

impl_scalar_ops!(Add::add, Sub::sub, Mul::mul);

impl fmt::Display for Interval {
    /// `[lo, hi]`, or `[Empty]`. Bounds print in shortest round-trip form, so
    /// the text denotes exactly the stored interval.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[Empty]")
        } else {
            write!(f, "[{}, {}]", self.lo, self.hi)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let d = Interval::default();
        assert_eq!(d.lo(), f64::NEG_INFINITY);
        assert_eq!(d.hi(), f64::INFINITY);

        let p = Interval::point(2.5);
        assert_eq!((p.lo(), p.hi()), (2.5, 2.5));

        let i: Interval = (1.0, 3.0).into();
        assert_eq!(i, Interval::new(1.0, 3.0));
        assert_eq!(Interval::from(4.0), Interval::point(4.0));
    }

    #[test]
    fn test_empty_is_a_value() {
        let e = Interval::new(2.0, 1.0);
        assert!(e.is_empty());
        assert!(!e.is_well_formed());
        assert!(e.width().is_nan());
        assert!(e.mid().is_nan());
        assert_eq!(format!("{}", e), "[Empty]");
        assert!(e.is_subset_of(&Interval::point(0.0)));
    }

    #[test]
    fn test_width() {
        assert_eq!(Interval::new(-1.0, 3.0).width(), 4.0);
        assert_eq!(Interval::point(7.0).width(), 0.0);
        assert_eq!(Interval::new(f64::NEG_INFINITY, 0.0).width(), f64::INFINITY);
        assert_eq!(Interval::entire().width(), f64::INFINITY);
    }

    #[test]
    fn test_mid() {
        assert_eq!(Interval::new(-1.0, 3.0).mid(), 1.0);
        assert_eq!(Interval::new(f64::NEG_INFINITY, 0.0).mid(), -f64::MAX);
        assert_eq!(Interval::new(0.0, f64::INFINITY).mid(), f64::MAX);
        // Naive mean overflows here.
        let big = Interval::new(f64::MAX / 2.0, f64::MAX);
        let m = big.mid();
        assert!(m.is_finite());
        assert!(big.contains(m));
    }

    #[test]
    fn test_split_shares_midpoint() {
        let (l, r) = Interval::new(-2.0, 6.0).split();
        assert_eq!(l, Interval::new(-2.0, 2.0));
        assert_eq!(r, Interval::new(2.0, 6.0));
    }

    #[test]
    fn test_add_sub() {
        let a = Interval::new(1.0, 2.0);
        let b = Interval::new(3.0, 5.0);
        assert_eq!(a + b, Interval::new(4.0, 7.0));
        assert_eq!(a - b, Interval::new(-4.0, -1.0));
        assert_eq!(b - a, Interval::new(1.0, 4.0));

        let c = Interval::point(0.1) + Interval::point(0.2);
        assert!(c.lo() < c.hi());
        assert!(c.contains(0.30000000000000004));
    }

    #[test]
    fn test_mul_signs() {
        let a = Interval::new(-2.0, 3.0);
        let b = Interval::new(-1.0, 4.0);
        assert_eq!(a * b, Interval::new(-8.0, 12.0));

        let neg = Interval::new(-3.0, -2.0);
        assert_eq!(neg * neg, Interval::new(4.0, 9.0));
    }

    #[test]
    fn test_mul_propagates_nan() {
        // 0 * ∞ is NaN at one corner, which must not be dropped by min/max.
        let z = Interval::new(0.0, 1.0);
        let r = z * Interval::entire();
        assert!(r.lo().is_nan());
        assert!(r.hi().is_nan());
        assert!(r.has_nan());
        assert!(!r.is_well_formed());
    }

    #[test]
    fn test_scalar_mixing_and_neg() {
        let x = Interval::new(1.0, 2.0);
        assert_eq!(2.0 * x, Interval::new(2.0, 4.0));
        assert_eq!(x * 2.0, Interval::new(2.0, 4.0));
        assert_eq!(10.0 - x, Interval::new(8.0, 9.0));
        assert_eq!(x - 1.0, Interval::new(0.0, 1.0));
        assert_eq!(1.0 + x, Interval::new(2.0, 3.0));
        assert_eq!(-x, Interval::new(-2.0, -1.0));
    }

    #[test]
    fn test_pow_trivial_exponents() {
        let x = Interval::new(-3.0, 2.0);
        assert_eq!(x.pow(0), Interval::point(1.0));
        assert_eq!(x.pow(1), x);
    }

    #[test]
    fn test_pow_even() {
        let pos = Interval::new(2.0, 3.0).pow(2);
        assert!(pos.lo() < 4.0 && pos.lo() > 3.99);
        assert!(pos.hi() > 9.0 && pos.hi() < 9.01);

        let neg = Interval::new(-3.0, -2.0).pow(2);
        assert!(neg.contains(4.0) && neg.contains(9.0));
        assert!(neg.lo() > 3.99 && neg.hi() < 9.01);

        let straddle = Interval::new(-3.0, 2.0).pow(4);
        assert_eq!(straddle.lo(), 0.0);
        assert!(straddle.hi() > 81.0 && straddle.hi() < 81.01);
    }

    #[test]
    fn test_pow_even_touching_zero() {
        let touching = Interval::new(0.0, 0.5).pow(2);
        assert_eq!(touching.lo(), 0.0);
        assert!(touching.is_subset_of(&Interval::new(-0.5, 0.5).pow(2)));
        assert_eq!(Interval::new(-0.5, 0.0).pow(2).lo(), 0.0);
    }

    #[test]
    fn test_pow_odd() {
        let r = Interval::new(-2.0, 3.0).pow(3);
        assert!(r.contains(-8.0) && r.contains(27.0));
        assert!(r.lo() > -8.01 && r.hi() < 27.01);
    }

    #[test]
    fn test_pow_overflow_keeps_finite_lower_bound() {
        let r = Interval::new(1e200, 1e201).pow(2);
        assert_eq!(r.lo(), f64::MAX);
        assert_eq!(r.hi(), f64::INFINITY);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Interval::new(-1.5, 2.0)), "[-1.5, 2]");
        assert_eq!(format!("{}", Interval::entire()), "[-inf, inf]");
    }

    #[test]
    fn test_subset() {
        let outer = Interval::new(-1.0, 1.0);
        assert!(Interval::new(-0.5, 0.5).is_subset_of(&outer));
        assert!(outer.is_subset_of(&outer));
        assert!(!Interval::new(-2.0, 0.0).is_subset_of(&outer));
    }
}
