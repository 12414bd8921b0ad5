//! Semigroup trait for accumulating validation issues
//!
//! A Semigroup is a type with an associative binary operation. Every schema node
//! reports its failures as a value of a Semigroup type, so that sibling failures
//! (object fields, array elements, both sides of an intersection) can be merged
//! without short-circuiting on the first one.
//!
//! # Laws
//!
//! ```text
//! a.combine(b).combine(c) == a.combine(b.combine(c))
//! ```
//!
//! Order matters: `a.combine(b)` keeps the items of `a` first. The engine relies
//! on this to report issues in field and index order.
//!
//! # Examples
//!
//! ```
//! use weir::Semigroup;
//!
//! let v1 = vec!["email"];
//! let v2 = vec!["password"];
//! assert_eq!(v1.combine(v2), vec!["email", "password"]);
//! ```

/// A type that supports an associative binary operation
///
/// # Note on Ownership
///
/// The `combine` method takes `self` by value, not by reference. If you need to
/// preserve the original values, you must clone them before combining.
pub trait Semigroup: Sized {
    /// Combine this value with another value associatively
    fn combine(self, other: Self) -> Self;
}

impl<T> Semigroup for Vec<T> {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_vec_semigroup() {
        let v1 = vec![1, 2, 3];
        let v2 = vec![4, 5, 6];
        assert_eq!(v1.combine(v2), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_vec_semigroup_empty() {
        let v1: Vec<i32> = vec![];
        let v2 = vec![1, 2, 3];
        assert_eq!(v1.combine(v2), vec![1, 2, 3]);
    }

    proptest! {
        #[test]
        fn prop_vec_associative(
            a in prop::collection::vec(any::<i32>(), 0..10),
            b in prop::collection::vec(any::<i32>(), 0..10),
            c in prop::collection::vec(any::<i32>(), 0..10),
        ) {
            let left = a.clone().combine(b.clone()).combine(c.clone());
            let right = a.combine(b.combine(c));
            prop_assert_eq!(left, right);
        }
    }
}
