//! Participant roster.
//!
//! `Roster<T>` is an ordered collection guaranteed to contain at least two
//! elements. A conversation needs a sender and a receiver, so a roster of
//! fewer than two entries is unrepresentable.

use std::ops::{Index, IndexMut};

use crate::error::RosterError;

/// Minimum number of participants in a conversation
pub const MIN_PARTICIPANTS: usize = 2;

/// An ordered collection of at least [`MIN_PARTICIPANTS`] elements.
///
/// # Example
///
/// ```rust
/// use parley_core::collections::Roster;
///
/// let roster = Roster::new(vec!["Admin", "Engineer", "Product_Manager"]).unwrap();
/// assert_eq!(roster.first(), &"Admin");
/// assert_eq!(roster.last(), &"Product_Manager");
/// assert_eq!(roster.pair_count(), 2);
///
/// assert!(Roster::new(vec!["Admin"]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster<T> {
    items: Vec<T>,
}

impl<T> Roster<T> {
    /// Build a roster from an ordered list.
    ///
    /// # Parameters
    ///
    /// * `items` - Elements in conversation order
    ///
    /// # Returns
    ///
    /// The roster, or [`RosterError::TooFewParticipants`] when fewer than
    /// [`MIN_PARTICIPANTS`] elements are supplied
    pub fn new(items: Vec<T>) -> Result<Self, RosterError> {
        if items.len() < MIN_PARTICIPANTS {
            return Err(RosterError::TooFewParticipants {
                required: MIN_PARTICIPANTS,
                found: items.len(),
            });
        }
        Ok(Self { items })
    }

    /// Number of elements. Always at least [`MIN_PARTICIPANTS`].
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of adjacent `(i, i + 1)` pairs, `len() - 1`.
    pub fn pair_count(&self) -> usize {
        self.items.len() - 1
    }

    pub fn first(&self) -> &T {
        &self.items[0]
    }

    pub fn last(&self) -> &T {
        &self.items[self.items.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Borrow two distinct elements mutably at once.
    ///
    /// Returns `None` if either index is out of bounds or both are equal.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut T, &mut T)> {
        if a == b || a >= self.items.len() || b >= self.items.len() {
            return None;
        }
        if a < b {
            let (left, right) = self.items.split_at_mut(b);
            Some((&mut left[a], &mut right[0]))
        } else {
            let (left, right) = self.items.split_at_mut(a);
            Some((&mut right[0], &mut left[b]))
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Index<usize> for Roster<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for Roster<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.items[index]
    }
}

impl<T> TryFrom<Vec<T>> for Roster<T> {
    type Error = RosterError;

    fn try_from(items: Vec<T>) -> Result<Self, Self::Error> {
        Self::new(items)
    }
}

impl<'a, T> IntoIterator for &'a Roster<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for Roster<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
