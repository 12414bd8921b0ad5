//! Number predicates

use std::cmp::PartialOrd;

use super::combinators::Predicate;

/// Predicate for greater than.
#[derive(Clone, Copy, Debug)]
pub struct Gt<T>(pub T);

impl<T: PartialOrd + Send + Sync> Predicate<T> for Gt<T> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        *value > self.0
    }
}

/// Create a predicate that checks if value is greater than threshold.
pub fn gt<T: PartialOrd + Send + Sync>(threshold: T) -> Gt<T> {
    Gt(threshold)
}

/// Predicate for greater than or equal.
#[derive(Clone, Copy, Debug)]
pub struct Ge<T>(pub T);

impl<T: PartialOrd + Send + Sync> Predicate<T> for Ge<T> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        *value >= self.0
    }
}

/// Create a predicate that checks if value is greater than or equal to threshold.
pub fn ge<T: PartialOrd + Send + Sync>(threshold: T) -> Ge<T> {
    Ge(threshold)
}

/// Predicate for less than.
#[derive(Clone, Copy, Debug)]
pub struct Lt<T>(pub T);

impl<T: PartialOrd + Send + Sync> Predicate<T> for Lt<T> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        *value < self.0
    }
}

/// Create a predicate that checks if value is less than threshold.
pub fn lt<T: PartialOrd + Send + Sync>(threshold: T) -> Lt<T> {
    Lt(threshold)
}

/// Predicate for less than or equal.
#[derive(Clone, Copy, Debug)]
pub struct Le<T>(pub T);

impl<T: PartialOrd + Send + Sync> Predicate<T> for Le<T> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        *value <= self.0
    }
}

/// Create a predicate that checks if value is less than or equal to threshold.
pub fn le<T: PartialOrd + Send + Sync>(threshold: T) -> Le<T> {
    Le(threshold)
}

/// Predicate that checks a number is an integral multiple of a step.
#[derive(Clone, Copy, Debug)]
pub struct MultipleOf(pub f64);

impl Predicate<f64> for MultipleOf {
    fn check(&self, value: &f64) -> bool {
        // Scale both sides to integers first so that 0.3 is a multiple of 0.1.
        let decimals = |n: f64| {
            let text = n.to_string();
            text.split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0) as i32
        };
        let scale = 10f64.powi(decimals(*value).max(decimals(self.0)));
        let value = (value * scale).round();
        let step = (self.0 * scale).round();
        step != 0.0 && value % step == 0.0
    }
}

/// Create a predicate that checks if value is a multiple of `step`.
///
/// # Example
///
/// ```rust
/// use weir::predicate::*;
///
/// assert!(multiple_of(5.0).check(&15.0));
/// assert!(multiple_of(0.1).check(&0.3));
/// assert!(!multiple_of(5.0).check(&7.0));
/// ```
pub fn multiple_of(step: f64) -> MultipleOf {
    MultipleOf(step)
}

/// Predicate that checks a number has no fractional part.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsInteger;

impl Predicate<f64> for IsInteger {
    #[inline]
    fn check(&self, value: &f64) -> bool {
        value.is_finite() && value.fract() == 0.0
    }
}

/// Create a predicate that checks a number is integral.
pub fn is_integer() -> IsInteger {
    IsInteger
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(gt(5.0).check(&6.0));
        assert!(!gt(5.0).check(&5.0));
        assert!(ge(5.0).check(&5.0));
        assert!(lt(5.0).check(&4.0));
        assert!(le(5.0).check(&5.0));
        assert!(!le(5.0).check(&5.5));
    }

    #[test]
    fn test_multiple_of() {
        assert!(multiple_of(3.0).check(&9.0));
        assert!(multiple_of(3.0).check(&0.0));
        assert!(multiple_of(0.01).check(&1.23));
        assert!(!multiple_of(0.5).check(&1.2));
        assert!(!multiple_of(0.0).check(&1.0));
    }

    #[test]
    fn test_is_integer() {
        assert!(is_integer().check(&3.0));
        assert!(!is_integer().check(&3.5));
        assert!(!is_integer().check(&f64::INFINITY));
    }
}
