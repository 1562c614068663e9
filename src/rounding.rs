//! Directed-rounding primitives as pure functions.
//!
//! The FPU rounding-mode register is process-wide ambient state, so nothing in
//! this crate touches it. Each primitive computes the round-to-nearest result,
//! recovers the exact rounding error with an error-free transformation
//! (TwoSum for addition, FMA for multiplication), and steps one ULP outward
//! only when the nearest result lies on the wrong side of the exact value.
//! The outcome equals what the hardware would produce in the requested
//! rounding direction, and threads never observe each other's mode changes.
//!
//! | Function              | Direction        | Exactness check           |
//! |-----------------------|------------------|---------------------------|
//! | `add_down` / `add_up` | toward -∞ / +∞   | TwoSum error term         |
//! | `sub_down` / `sub_up` | toward -∞ / +∞   | TwoSum on `a + (-b)`      |
//! | `mul_down` / `mul_up` | toward -∞ / +∞   | `fma(a, b, -p)`           |
//! | `round_down` / `round_up` | outward bias | none (2-ULP nudge)       |

/// `1 - 2ε`: multiplier nudging a positive value toward zero.
const NSMALL: f64 = 1.0 - 2.0 * f64::EPSILON;

/// `1 + 2ε`: multiplier nudging a positive value away from zero.
const PSMALL: f64 = 1.0 + 2.0 * f64::EPSILON;

/// Below this magnitude the FMA residual of a product may itself underflow,
/// so the exactness check is skipped and the result is always nudged.
const FMA_SAFE_MIN: f64 = 2.004168360008973e-292; // 2^-969

/// Next representable value toward +∞.
#[inline]
pub fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        // Smallest positive subnormal.
        return f64::from_bits(1);
    }

    let bits = x.to_bits();
    if x.is_sign_positive() {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Next representable value toward -∞.
#[inline]
pub fn next_down(x: f64) -> f64 {
    if x.is_nan() || x == f64::NEG_INFINITY {
        return x;
    }
    if x == 0.0 {
        // Smallest negative subnormal.
        return f64::from_bits(0x8000_0000_0000_0001);
    }

    let bits = x.to_bits();
    if x.is_sign_positive() {
        f64::from_bits(bits - 1)
    } else {
        f64::from_bits(bits + 1)
    }
}

/// Knuth's TwoSum: returns the exact error `(a + b) - s` for `s = fl(a + b)`.
#[inline]
fn two_sum_err(a: f64, b: f64, s: f64) -> f64 {
    let bb = s - a;
    (a - (s - bb)) + (b - bb)
}

/// Minimum that propagates NaN from either operand.
#[inline]
pub fn min_nan(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if a <= b {
        a
    } else {
        b
    }
}

/// Maximum that propagates NaN from either operand.
#[inline]
pub fn max_nan(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if a >= b {
        a
    } else {
        b
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Addition / subtraction
// ──────────────────────────────────────────────────────────────────────────────

/// `a + b` rounded toward -∞.
#[inline]
pub fn add_down(a: f64, b: f64) -> f64 {
    let s = a + b;
    if s.is_nan() {
        return s;
    }
    if s.is_infinite() {
        // Finite operands overflowing upward still have a finite exact sum.
        if s > 0.0 && a.is_finite() && b.is_finite() {
            return f64::MAX;
        }
        return s;
    }
    if two_sum_err(a, b, s) < 0.0 {
        next_down(s)
    } else {
        s
    }
}

/// `a + b` rounded toward +∞.
#[inline]
pub fn add_up(a: f64, b: f64) -> f64 {
    let s = a + b;
    if s.is_nan() {
        return s;
    }
    if s.is_infinite() {
        if s < 0.0 && a.is_finite() && b.is_finite() {
            return -f64::MAX;
        }
        return s;
    }
    if two_sum_err(a, b, s) > 0.0 {
        next_up(s)
    } else {
        s
    }
}

/// `a - b` rounded toward -∞.
#[inline]
pub fn sub_down(a: f64, b: f64) -> f64 {
    add_down(a, -b)
}

/// `a - b` rounded toward +∞.
#[inline]
pub fn sub_up(a: f64, b: f64) -> f64 {
    add_up(a, -b)
}

// ──────────────────────────────────────────────────────────────────────────────
// Multiplication
// ──────────────────────────────────────────────────────────────────────────────

/// Classifies `p = fl(a * b)` relative to the exact product.
///
/// Returns `Some(sign)` of `a * b - p` when it can be computed, `None` when the
/// product is in the range where the residual is unreliable.
#[inline]
fn mul_residual_sign(a: f64, b: f64, p: f64) -> Option<f64> {
    if p.abs() < FMA_SAFE_MIN {
        return None;
    }
    Some(a.mul_add(b, -p))
}

/// `a * b` rounded toward -∞.
#[inline]
pub fn mul_down(a: f64, b: f64) -> f64 {
    let p = a * b;
    if p.is_nan() {
        return p;
    }
    if p.is_infinite() {
        if p > 0.0 && a.is_finite() && b.is_finite() {
            return f64::MAX;
        }
        return p;
    }
    if a == 0.0 || b == 0.0 {
        return p;
    }
    match mul_residual_sign(a, b, p) {
        Some(e) if e >= 0.0 => p,
        _ => next_down(p),
    }
}

/// `a * b` rounded toward +∞.
#[inline]
pub fn mul_up(a: f64, b: f64) -> f64 {
    let p = a * b;
    if p.is_nan() {
        return p;
    }
    if p.is_infinite() {
        if p < 0.0 && a.is_finite() && b.is_finite() {
            return -f64::MAX;
        }
        return p;
    }
    if a == 0.0 || b == 0.0 {
        return p;
    }
    match mul_residual_sign(a, b, p) {
        Some(e) if e <= 0.0 => p,
        _ => next_up(p),
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Bias correction for library functions
// ──────────────────────────────────────────────────────────────────────────────

/// Moves a nearest-rounded library result down by about two ULPs.
///
/// `+∞` maps to `f64::MAX`: the exact value behind an overflowed result is
/// finite. `-∞` stays `-∞`.
#[inline]
pub fn round_down(d: f64) -> f64 {
    if d == f64::INFINITY {
        f64::MAX
    } else if d < 0.0 {
        PSMALL * d - f64::MIN_POSITIVE
    } else {
        NSMALL * d - f64::MIN_POSITIVE
    }
}

/// Moves a nearest-rounded library result up by about two ULPs.
///
/// `-∞` maps to `-f64::MAX`; `+∞` stays `+∞`.
#[inline]
pub fn round_up(d: f64) -> f64 {
    if d == f64::NEG_INFINITY {
        -f64::MAX
    } else if d < 0.0 {
        NSMALL * d + f64::MIN_POSITIVE
    } else {
        PSMALL * d + f64::MIN_POSITIVE
    }
}

/// `x^n` from the platform `pow`, which ignores rounding direction.
#[inline]
pub fn powi_nearest(x: f64, n: u32) -> f64 {
    x.powf(f64::from(n))
}
