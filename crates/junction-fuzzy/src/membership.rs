//! Piecewise-linear membership functions.
//!
//! Both supported shapes reduce to a trapezoid `(a, b, c, d)`: zero below
//! `a`, rising linearly to one at `b`, flat at one through `c`, falling
//! linearly to zero at `d`, and zero above. A triangle `(a, b, c)` is the
//! trapezoid `(a, b, b, c)`. Coincident points (`a == b` or `c == d`) give a
//! vertical edge, so `trapezoid(0, 0, 15, 30)` is fully true at zero.

use crate::error::FuzzyError;

/// A labelled region's shape over a variable's universe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MembershipFunction {
    /// Triangle with feet at `a` and `c` and its peak at `b`.
    Triangle {
        /// Left foot.
        a: f64,
        /// Peak.
        b: f64,
        /// Right foot.
        c: f64,
    },
    /// Trapezoid with feet at `a` and `d` and a plateau over `[b, c]`.
    Trapezoid {
        /// Left foot.
        a: f64,
        /// Plateau start.
        b: f64,
        /// Plateau end.
        c: f64,
        /// Right foot.
        d: f64,
    },
}

impl MembershipFunction {
    /// Build a triangle from three non-decreasing control points.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidShape`] if a point is not finite or the
    /// points decrease.
    pub fn triangle(a: f64, b: f64, c: f64) -> Result<Self, FuzzyError> {
        validate_points(&[a, b, c])?;
        Ok(Self::Triangle { a, b, c })
    }

    /// Build a trapezoid from four non-decreasing control points.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidShape`] if a point is not finite or the
    /// points decrease.
    pub fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> Result<Self, FuzzyError> {
        validate_points(&[a, b, c, d])?;
        Ok(Self::Trapezoid { a, b, c, d })
    }

    /// The shape as trapezoid corners `[a, b, c, d]`.
    pub const fn corners(&self) -> [f64; 4] {
        match *self {
            Self::Triangle { a, b, c } => [a, b, b, c],
            Self::Trapezoid { a, b, c, d } => [a, b, c, d],
        }
    }

    /// Degree of membership of `x`, always within 0.0--1.0.
    ///
    /// Values outside `[a, d]` (including anything outside the variable's
    /// universe) and NaN yield 0.0.
    pub fn degree(&self, x: f64) -> f64 {
        let [a, b, c, d] = self.corners();
        if x.is_nan() || x < a || x > d {
            0.0
        } else if x < b {
            // a <= x < b, so b - a > 0
            (x - a) / (b - a)
        } else if x <= c {
            1.0
        } else {
            // c < x <= d, so d - c > 0
            (d - x) / (d - c)
        }
    }

    /// Sample the function over a set of points.
    pub fn sample(&self, points: &[f64]) -> Vec<f64> {
        points.iter().map(|&x| self.degree(x)).collect()
    }
}

fn validate_points(points: &[f64]) -> Result<(), FuzzyError> {
    if points.iter().any(|p| !p.is_finite()) {
        return Err(FuzzyError::InvalidShape {
            points: points.to_vec(),
            reason: "control points must be finite",
        });
    }
    if points.windows(2).any(|w| matches!(w, [lo, hi] if lo > hi)) {
        return Err(FuzzyError::InvalidShape {
            points: points.to_vec(),
            reason: "control points must be non-decreasing",
        });
    }
    Ok(())
}
