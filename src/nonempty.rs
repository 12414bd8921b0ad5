//! Non-empty vector type
//!
//! A failed validation always carries at least one issue. [`NonEmptyVec`] turns
//! that invariant into a type, so a [`Report`](crate::Report) can never be built
//! empty and `Validation::Failure` never has to be checked for "no issues".
//!
//! # Examples
//!
//! ```
//! use weir::NonEmptyVec;
//!
//! let nev = NonEmptyVec::new(1, vec![2, 3, 4]);
//! assert_eq!(nev.head(), &1);
//! assert_eq!(nev[3], 4);
//! assert_eq!(nev.len(), 4);
//! ```

use crate::Semigroup;

/// A non-empty vector guaranteed to contain at least one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyVec<T> {
    head: T,
    tail: Vec<T>,
}

impl<T> NonEmptyVec<T> {
    /// Create a new non-empty vector with a head element and tail.
    pub fn new(head: T, tail: Vec<T>) -> Self {
        Self { head, tail }
    }

    /// Create a non-empty vector from a single element.
    ///
    /// # Example
    ///
    /// ```
    /// use weir::NonEmptyVec;
    ///
    /// let nev = NonEmptyVec::singleton(42);
    /// assert_eq!(nev.len(), 1);
    /// assert_eq!(nev.head(), &42);
    /// ```
    pub fn singleton(value: T) -> Self {
        Self::new(value, Vec::new())
    }

    /// Try to create a non-empty vector from a `Vec`.
    ///
    /// Returns `None` if the vector is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use weir::NonEmptyVec;
    ///
    /// assert_eq!(NonEmptyVec::from_vec(vec![1, 2, 3]).map(|v| v.len()), Some(3));
    /// assert!(NonEmptyVec::from_vec(Vec::<i32>::new()).is_none());
    /// ```
    pub fn from_vec(mut vec: Vec<T>) -> Option<Self> {
        if vec.is_empty() {
            None
        } else {
            let head = vec.remove(0);
            Some(Self::new(head, vec))
        }
    }

    /// Get the first element (always succeeds).
    pub fn head(&self) -> &T {
        &self.head
    }

    /// Get the number of elements.
    ///
    /// Always >= 1.
    pub fn len(&self) -> usize {
        1 + self.tail.len()
    }

    /// Always returns `false`; present to satisfy clippy's `len_without_is_empty` lint.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Map a function over all elements.
    ///
    /// # Example
    ///
    /// ```
    /// use weir::NonEmptyVec;
    ///
    /// let nev = NonEmptyVec::new(1, vec![2, 3]);
    /// let doubled = nev.map(|x| x * 2);
    /// assert_eq!(doubled.head(), &2);
    /// assert_eq!(doubled[2], 6);
    /// ```
    pub fn map<U, F>(self, mut f: F) -> NonEmptyVec<U>
    where
        F: FnMut(T) -> U,
    {
        let head = f(self.head);
        let tail = self.tail.into_iter().map(f).collect();
        NonEmptyVec::new(head, tail)
    }

    /// Iterate over all elements.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        std::iter::once(&self.head).chain(self.tail.iter())
    }
}

// Semigroup: concatenation
impl<T> Semigroup for NonEmptyVec<T> {
    fn combine(mut self, other: Self) -> Self {
        self.tail.push(other.head);
        self.tail.extend(other.tail);
        self
    }
}

impl<T> IntoIterator for NonEmptyVec<T> {
    type Item = T;
    type IntoIter = std::iter::Chain<std::iter::Once<T>, std::vec::IntoIter<T>>;

    fn into_iter(self) -> Self::IntoIter {
        std::iter::once(self.head).chain(self.tail)
    }
}

impl<T> std::ops::Index<usize> for NonEmptyVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        if index == 0 {
            &self.head
        } else {
            &self.tail[index - 1]
        }
    }
}
