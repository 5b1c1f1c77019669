//! Append-only vocabulary tables.
//!
//! Positions are 1-based: `add` returns the position of the new entry and
//! position 0 never resolves. Wire indices (0-based) are resolved with
//! [`Table::at_index`].

use crate::{Error, Result};

/// Append-only ordered sequence of entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    name: &'static str,
    entries: Vec<T>,
}

impl<T> Table<T> {
    /// Creates an empty table; `name` shows up in range errors.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    /// Table name used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Appends an entry and returns its 1-based position.
    pub fn add(&mut self, value: T) -> usize {
        self.entries.push(value);
        self.entries.len()
    }

    /// Looks up a 1-based position.
    pub fn get(&self, position: usize) -> Result<&T> {
        position
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .ok_or(Error::index_out_of_range(self.name, position))
    }

    /// Looks up a 0-based wire index.
    #[inline]
    pub fn at_index(&self, index: usize) -> Result<&T> {
        self.entries
            .get(index)
            .ok_or(Error::index_out_of_range(self.name, index + 1))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Position the next `add` will return.
    pub fn next_position(&self) -> usize {
        self.entries.len() + 1
    }
}

impl<T: Clone> Table<T> {
    /// Appends the entries of `other`, skipping its first `skip` entries.
    pub fn extend_from(&mut self, other: &Table<T>, skip: usize) {
        self.entries.extend(other.entries.iter().skip(skip).cloned());
    }
}

impl<'a, T> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
