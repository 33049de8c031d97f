//! Piecewise-constant response curves.
//!
//! A [`Curve`] is an ordered list of [`Step`]s followed by a catch-all
//! factor. Evaluation returns the factor of the first step whose bound
//! contains the value, so the steps partition the non-negative axis into
//! contiguous intervals without any per-dimension branching.
//!
//! # Examples
//! ```
//! use walkscore_core::{Curve, Step};
//!
//! static STEPS: [Step; 2] = [Step::below(2.0, 1.0), Step::below(4.0, 0.5)];
//! let curve = Curve::new(&STEPS, 0.0);
//!
//! assert_eq!(curve.factor_for(1.5), 1.0);
//! assert_eq!(curve.factor_for(2.0), 0.5);
//! assert_eq!(curve.factor_for(9.0), 0.0);
//! ```

/// Upper edge of a curve interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Contains values strictly less than the limit.
    Below(f64),
    /// Contains values less than or equal to the limit.
    AtMost(f64),
}

impl Bound {
    /// Report whether `value` falls on the lower side of this edge.
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        match self {
            Self::Below(limit) => value < limit,
            Self::AtMost(limit) => value <= limit,
        }
    }

    /// Return the numeric limit regardless of closedness.
    #[must_use]
    pub const fn limit(self) -> f64 {
        match self {
            Self::Below(limit) | Self::AtMost(limit) => limit,
        }
    }
}

/// One interval of a curve and the factor it maps to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Upper edge of the interval.
    pub bound: Bound,
    /// Scale factor applied to values inside the interval.
    pub factor: f64,
}

impl Step {
    /// Interval that is open on the right: `value < limit`.
    #[must_use]
    pub const fn below(limit: f64, factor: f64) -> Self {
        Self {
            bound: Bound::Below(limit),
            factor,
        }
    }

    /// Interval that is closed on the right: `value <= limit`.
    #[must_use]
    pub const fn at_most(limit: f64, factor: f64) -> Self {
        Self {
            bound: Bound::AtMost(limit),
            factor,
        }
    }
}

/// Ordered breakpoints plus the factor for everything past the last one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    steps: &'static [Step],
    otherwise: f64,
}

impl Curve {
    /// Build a curve from static breakpoints.
    ///
    /// Steps must be ordered by ascending limit.
    #[must_use]
    pub const fn new(steps: &'static [Step], otherwise: f64) -> Self {
        Self { steps, otherwise }
    }

    /// Curve returning `factor` for every value.
    #[must_use]
    pub const fn constant(factor: f64) -> Self {
        Self {
            steps: &[],
            otherwise: factor,
        }
    }

    /// Evaluate the curve at `value`.
    #[must_use]
    pub fn factor_for(&self, value: f64) -> f64 {
        self.steps
            .iter()
            .find(|step| step.bound.contains(value))
            .map_or(self.otherwise, |step| step.factor)
    }

    /// Breakpoints in evaluation order.
    #[must_use]
    pub const fn steps(&self) -> &'static [Step] {
        self.steps
    }

    /// Factor for values beyond the last breakpoint.
    #[must_use]
    pub const fn otherwise(&self) -> f64 {
        self.otherwise
    }

    /// Every factor this curve can return.
    pub fn factors(&self) -> impl Iterator<Item = f64> + '_ {
        self.steps
            .iter()
            .map(|step| step.factor)
            .chain(std::iter::once(self.otherwise))
    }

    /// Report whether the breakpoints are sorted by ascending limit.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.steps
            .windows(2)
            .all(|pair| matches!(pair, [lhs, rhs] if lhs.bound.limit() <= rhs.bound.limit()))
    }
}
