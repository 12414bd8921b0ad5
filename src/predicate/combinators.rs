//! Core predicate trait and logical combinators

/// A composable predicate over values of type T.
///
/// Predicates can be combined using logical operators:
/// - `and`: Both predicates must be true
/// - `or`: Either predicate must be true
/// - `not`: Inverts the predicate
///
/// # Example
///
/// ```rust
/// use weir::predicate::*;
///
/// let in_range = ge(0.0).and(le(150.0));
/// assert!(in_range.check(&25.0));
/// assert!(!in_range.check(&-5.0));
/// ```
pub trait Predicate<T: ?Sized>: Send + Sync {
    /// Check if the value satisfies this predicate.
    fn check(&self, value: &T) -> bool;
}

// Blanket impl for closures
impl<T: ?Sized, F> Predicate<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    #[inline]
    fn check(&self, value: &T) -> bool {
        self(value)
    }
}

/// Extension trait for predicate combinators.
///
/// All methods return concrete types, so a combined predicate costs no more
/// than the hand-written boolean expression.
pub trait PredicateExt<T: ?Sized>: Predicate<T> + Sized {
    /// Combine with AND logic.
    fn and<P: Predicate<T>>(self, other: P) -> And<Self, P> {
        And(self, other)
    }

    /// Combine with OR logic.
    ///
    /// # Example
    ///
    /// ```rust
    /// use weir::predicate::*;
    ///
    /// let p = starts_with("http://").or(starts_with("https://"));
    /// assert!(p.check("https://example.com"));
    /// assert!(!p.check("ftp://example.com"));
    /// ```
    fn or<P: Predicate<T>>(self, other: P) -> Or<Self, P> {
        Or(self, other)
    }

    /// Invert the predicate.
    fn not(self) -> Not<Self> {
        Not(self)
    }
}

impl<T: ?Sized, P: Predicate<T>> PredicateExt<T> for P {}

/// AND combinator - both predicates must be true.
#[derive(Clone, Copy, Debug)]
pub struct And<P1, P2>(pub P1, pub P2);

impl<T: ?Sized, P1: Predicate<T>, P2: Predicate<T>> Predicate<T> for And<P1, P2> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        self.0.check(value) && self.1.check(value)
    }
}

/// OR combinator - either predicate must be true.
#[derive(Clone, Copy, Debug)]
pub struct Or<P1, P2>(pub P1, pub P2);

impl<T: ?Sized, P1: Predicate<T>, P2: Predicate<T>> Predicate<T> for Or<P1, P2> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        self.0.check(value) || self.1.check(value)
    }
}

/// NOT combinator - inverts the predicate.
#[derive(Clone, Copy, Debug)]
pub struct Not<P>(pub P);

impl<T: ?Sized, P: Predicate<T>> Predicate<T> for Not<P> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        !self.0.check(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{any_char, gt, lt};

    #[test]
    fn test_and() {
        let p = gt(0.0).and(lt(10.0));
        assert!(p.check(&5.0));
        assert!(!p.check(&10.0));
    }

    #[test]
    fn test_or() {
        let p = lt(0.0).or(gt(100.0));
        assert!(p.check(&-1.0));
        assert!(!p.check(&50.0));
    }

    #[test]
    fn test_not() {
        let p = any_char(char::is_whitespace).not();
        assert!(p.check("tight"));
        assert!(!p.check("has space"));
    }

    #[test]
    fn test_closure_predicate() {
        let even = |n: &f64| n % 2.0 == 0.0;
        assert!(even.check(&4.0));
        assert!(!even.and(gt(10.0)).check(&4.0));
    }
}
