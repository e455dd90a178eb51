//! Saturating `i64` arithmetic for costs and demands.
//!
//! Every operation clamps to `i64::MIN`/`i64::MAX` instead of wrapping, so
//! sums of "infinite" sentinel values stay infinite and combinations remain
//! monotonic.
//!
//! # Example
//!
//! ```
//! use routeforge_core::arithmetic::{cap_add, cap_prod, cap_sub};
//!
//! assert_eq!(cap_add(i64::MAX, 1), i64::MAX);
//! assert_eq!(cap_sub(i64::MIN, 1), i64::MIN);
//! assert_eq!(cap_prod(i64::MAX / 2, 3), i64::MAX);
//! ```

/// Saturating addition.
#[inline]
pub fn cap_add(x: i64, y: i64) -> i64 {
    x.saturating_add(y)
}

/// Saturating subtraction.
#[inline]
pub fn cap_sub(x: i64, y: i64) -> i64 {
    x.saturating_sub(y)
}

/// Saturating multiplication.
#[inline]
pub fn cap_prod(x: i64, y: i64) -> i64 {
    x.saturating_mul(y)
}

/// Saturating negation: `-i64::MIN` clamps to `i64::MAX`.
#[inline]
pub fn cap_opp(x: i64) -> i64 {
    x.saturating_neg()
}

/// Saturating absolute value.
#[inline]
pub fn cap_abs(x: i64) -> i64 {
    x.saturating_abs()
}

/// `*target = cap_add(*target, amount)`.
#[inline]
pub fn cap_add_to(amount: i64, target: &mut i64) {
    *target = cap_add(*target, amount);
}

/// `*target = cap_sub(*target, amount)`.
#[inline]
pub fn cap_sub_from(amount: i64, target: &mut i64) {
    *target = cap_sub(*target, amount);
}

#[cfg(test)]
#[path = "arithmetic_tests.rs"]
mod tests;
