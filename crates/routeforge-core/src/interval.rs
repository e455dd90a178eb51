//! Closed integer intervals with exact handling of unbounded endpoints.
//!
//! [`Interval`] is the plain form exchanged with callers: `i64::MIN` as a
//! lower bound and `i64::MAX` as an upper bound mean "unbounded".
//!
//! [`ExtendedInterval`] is the form used for cumulative computations. Each
//! endpoint carries a count of infinite terms next to its finite part, so
//! sums of unbounded demands never overflow into a sentinel and differences
//! of prefix sums cancel exactly. Intersection keeps the componentwise
//! minimum of the infinity counts; addition sums them.
//!
//! Each endpoint is an [`ExtendedValue`]: an element of the ordered group
//! `infinity * ∞ + finite`, compared lexicographically. All bound
//! arithmetic happens in that group, which makes intersection a plain
//! `max`/`min` of endpoints.

use std::fmt;
use std::ops::{Add, Sub};

use crate::arithmetic::{cap_add, cap_sub};

/// A closed interval `[min, max]`; empty when `min > max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    pub min: i64,
    pub max: i64,
}

impl Interval {
    #[inline]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// The single-value interval `[value, value]`.
    #[inline]
    pub const fn point(value: i64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// `(-∞, +∞)`.
    #[inline]
    pub const fn unbounded() -> Self {
        Self {
            min: i64::MIN,
            max: i64::MAX,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.min > self.max
    }

    #[inline]
    pub const fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min == i64::MIN, self.max == i64::MAX) {
            (true, true) => write!(f, "(-inf, +inf)"),
            (true, false) => write!(f, "(-inf, {}]", self.max),
            (false, true) => write!(f, "[{}, +inf)", self.min),
            (false, false) => write!(f, "[{}, {}]", self.min, self.max),
        }
    }
}

/// `infinity * ∞ + finite`, ordered by `infinity` first, then `finite`.
///
/// # Example
///
/// ```
/// use routeforge_core::ExtendedValue;
///
/// let minus_inf = ExtendedValue::new(-1, 0);
/// let big = ExtendedValue::finite(i64::MAX - 1);
/// assert!(minus_inf < ExtendedValue::finite(i64::MIN + 1));
/// assert!(big < ExtendedValue::new(1, -5));
/// // Prefix-sum differences cancel the infinite part.
/// assert_eq!((minus_inf + ExtendedValue::finite(3)) - minus_inf, ExtendedValue::finite(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ExtendedValue {
    /// Signed number of infinite terms.
    pub infinity: i64,
    /// Finite part, accumulated with saturating arithmetic.
    pub finite: i64,
}

impl ExtendedValue {
    pub const ZERO: Self = Self {
        infinity: 0,
        finite: 0,
    };

    #[inline]
    pub const fn new(infinity: i64, finite: i64) -> Self {
        Self { infinity, finite }
    }

    #[inline]
    pub const fn finite(value: i64) -> Self {
        Self {
            infinity: 0,
            finite: value,
        }
    }

    #[inline]
    pub const fn is_finite(&self) -> bool {
        self.infinity == 0
    }

    /// Exact sum, or `None` when a component leaves the `i64` range.
    #[inline]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(Self {
            infinity: self.infinity.checked_add(rhs.infinity)?,
            finite: self.finite.checked_add(rhs.finite)?,
        })
    }

    /// Exact difference, or `None` when a component leaves the `i64` range.
    #[inline]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        Some(Self {
            infinity: self.infinity.checked_sub(rhs.infinity)?,
            finite: self.finite.checked_sub(rhs.finite)?,
        })
    }
}

impl Add for ExtendedValue {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            infinity: self.infinity + rhs.infinity,
            finite: cap_add(self.finite, rhs.finite),
        }
    }
}

impl Sub for ExtendedValue {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            infinity: self.infinity - rhs.infinity,
            finite: cap_sub(self.finite, rhs.finite),
        }
    }
}

/// An interval whose endpoints track how many unbounded terms contributed.
///
/// `num_negative_infinity > 0` means the lower bound is `-∞` (the `min`
/// field then holds the finite remainder), and likewise for the upper bound.
///
/// # Example
///
/// ```
/// use routeforge_core::{ExtendedInterval, Interval};
///
/// let capacity = ExtendedInterval::from(Interval::new(0, 10));
/// let demand = ExtendedInterval::from(Interval::new(4, i64::MAX));
///
/// let cumul = (capacity + demand).intersection(&capacity);
/// assert_eq!(cumul.to_interval(), Interval::new(4, 10));
/// assert_eq!((capacity + demand).num_positive_infinity, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExtendedInterval {
    pub min: i64,
    pub max: i64,
    pub num_negative_infinity: i64,
    pub num_positive_infinity: i64,
}

impl ExtendedInterval {
    /// `[0, 0]`.
    pub const ZERO: Self = Self {
        min: 0,
        max: 0,
        num_negative_infinity: 0,
        num_positive_infinity: 0,
    };

    /// Builds an interval from its two endpoints.
    #[inline]
    pub const fn from_bounds(lower: ExtendedValue, upper: ExtendedValue) -> Self {
        Self {
            min: lower.finite,
            max: upper.finite,
            num_negative_infinity: -lower.infinity,
            num_positive_infinity: upper.infinity,
        }
    }

    /// The lower endpoint as a group element.
    #[inline]
    pub const fn lower(&self) -> ExtendedValue {
        ExtendedValue::new(-self.num_negative_infinity, self.min)
    }

    /// The upper endpoint as a group element.
    #[inline]
    pub const fn upper(&self) -> ExtendedValue {
        ExtendedValue::new(self.num_positive_infinity, self.max)
    }

    /// True when no value satisfies both bounds.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lower() > self.upper()
    }

    /// Intersection: tighter endpoint on each side, minimum infinity counts.
    #[inline]
    pub fn intersection(&self, other: &Self) -> Self {
        Self::from_bounds(
            self.lower().max(other.lower()),
            self.upper().min(other.upper()),
        )
    }

    /// Exact Minkowski sum, or `None` when a finite part would saturate.
    #[inline]
    pub fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Some(Self::from_bounds(
            self.lower().checked_add(rhs.lower())?,
            self.upper().checked_add(rhs.upper())?,
        ))
    }

    /// Converts back to a plain interval, mapping infinite endpoints to the
    /// `i64` sentinels.
    pub fn to_interval(&self) -> Interval {
        let lower = self.lower();
        let upper = self.upper();
        let min = match lower.infinity {
            i if i < 0 => i64::MIN,
            0 => lower.finite,
            _ => i64::MAX,
        };
        let max = match upper.infinity {
            i if i > 0 => i64::MAX,
            0 => upper.finite,
            _ => i64::MIN,
        };
        Interval::new(min, max)
    }
}

impl From<Interval> for ExtendedInterval {
    fn from(interval: Interval) -> Self {
        let neg_inf = interval.min == i64::MIN;
        let pos_inf = interval.max == i64::MAX;
        Self {
            min: if neg_inf { 0 } else { interval.min },
            max: if pos_inf { 0 } else { interval.max },
            num_negative_infinity: i64::from(neg_inf),
            num_positive_infinity: i64::from(pos_inf),
        }
    }
}

impl Add for ExtendedInterval {
    type Output = Self;

    /// Minkowski sum; infinity counts add up.
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            min: cap_add(self.min, rhs.min),
            max: cap_add(self.max, rhs.max),
            num_negative_infinity: self.num_negative_infinity + rhs.num_negative_infinity,
            num_positive_infinity: self.num_positive_infinity + rhs.num_positive_infinity,
        }
    }
}

impl fmt::Display for ExtendedInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_interval())
    }
}

#[cfg(test)]
#[path = "interval_tests.rs"]
mod tests;
