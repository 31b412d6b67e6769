//! Growable array — append-only storage with fallible growth.
//!
//! A thin layer over `Vec` whose growth goes through `try_reserve_exact`, so
//! an allocation failure comes back as [`Error::OutOfMemory`] with the array
//! unchanged instead of aborting the process. The scanner collects its match
//! list and keyword bookkeeping through this type.

use crate::error::Result;

/// An append-only array that grows by exactly what is pushed.
#[derive(Clone, PartialEq, Eq)]
pub struct GrowArray<T> {
    items: Vec<T>,
}

impl<T> GrowArray<T> {
    /// Create an empty array. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an empty array with room for `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`](crate::Error::OutOfMemory) if the
    /// allocation fails.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut items = Vec::new();
        items.try_reserve_exact(capacity)?;
        Ok(Self { items })
    }

    /// Append one element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`](crate::Error::OutOfMemory) if the
    /// backing storage cannot grow. The array is left unchanged.
    pub fn push(&mut self, item: T) -> Result<()> {
        if self.items.len() == self.items.capacity() {
            self.items.try_reserve_exact(1)?;
        }
        self.items.push(item);
        Ok(())
    }

    /// First element for which `pred` returns true.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| pred(item))
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no elements have been pushed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every element, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The elements as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate over the elements in push order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Consume the array, returning the underlying `Vec`.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Clone> GrowArray<T> {
    /// Append a contiguous run of elements with a single reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`](crate::Error::OutOfMemory) if the
    /// backing storage cannot grow. The array is left unchanged.
    pub fn push_many(&mut self, items: &[T]) -> Result<()> {
        self.items.try_reserve_exact(items.len())?;
        self.items.extend_from_slice(items);
        Ok(())
    }
}

impl<T> Default for GrowArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for GrowArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<'a, T> IntoIterator for &'a GrowArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty() {
        let arr: GrowArray<u32> = GrowArray::new();
        assert!(arr.is_empty());
        assert_eq!(arr.len(), 0);
    }

    #[test]
    fn push_appends_in_order() {
        let mut arr = GrowArray::new();
        arr.push(1).unwrap();
        arr.push(2).unwrap();
        arr.push(3).unwrap();
        assert_eq!(arr.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn push_many_appends_run() {
        let mut arr = GrowArray::new();
        arr.push(0u8).unwrap();
        arr.push_many(b"abc").unwrap();
        assert_eq!(arr.as_slice(), &[0, b'a', b'b', b'c']);
    }

    #[test]
    fn push_many_empty_is_noop() {
        let mut arr: GrowArray<u8> = GrowArray::new();
        arr.push_many(&[]).unwrap();
        assert!(arr.is_empty());
    }

    #[test]
    fn find_returns_first_match() {
        let mut arr = GrowArray::new();
        arr.push_many(&[(1, 'a'), (2, 'b'), (1, 'c')]).unwrap();
        assert_eq!(arr.find(|&(k, _)| k == 1), Some(&(1, 'a')));
        assert_eq!(arr.find(|&(k, _)| k == 9), None);
    }

    #[test]
    fn find_on_empty_is_none() {
        let arr: GrowArray<i32> = GrowArray::new();
        assert!(arr.find(|_| true).is_none());
    }

    #[test]
    fn with_capacity_beyond_address_space_is_out_of_memory() {
        assert!(matches!(
            GrowArray::<u64>::with_capacity(usize::MAX),
            Err(crate::Error::OutOfMemory)
        ));
    }

    #[test]
    fn clear_keeps_nothing() {
        let mut arr = GrowArray::with_capacity(4).unwrap();
        arr.push_many(&[1, 2, 3]).unwrap();
        arr.clear();
        assert!(arr.is_empty());
    }
}
