//! Duplicate attribute detection per element.
//!
//! Attribute keys are bucketed by their hash. Instead of clearing the
//! buckets for every element, entries are stamped with an iteration
//! number and entries from older iterations count as free.

use crate::qname::{ATTRIBUTE_HASH_SIZE, AttributeKey};

#[derive(Debug, Clone, Copy)]
struct Entry {
    iteration: u32,
    id: u32,
}

/// Detects attributes that occur twice on one element.
#[derive(Debug)]
pub struct DuplicateAttributeVerifier {
    buckets: Vec<Vec<Entry>>,
    iteration: u32,
}

impl Default for DuplicateAttributeVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DuplicateAttributeVerifier {
    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); ATTRIBUTE_HASH_SIZE],
            iteration: 1,
        }
    }

    /// Starts a new element.
    pub fn clear(&mut self) {
        self.iteration = self.iteration.wrapping_add(1);
        if self.iteration == 0 {
            // Ueberlauf: alte Stempel koennten wieder gueltig werden.
            for bucket in &mut self.buckets {
                bucket.clear();
            }
            self.iteration = 1;
        }
    }

    /// Records `key`; returns false if it was already seen on this element.
    pub fn insert(&mut self, key: AttributeKey) -> bool {
        let iteration = self.iteration;
        let bucket = &mut self.buckets[key.hash % ATTRIBUTE_HASH_SIZE];
        let mut free = None;
        for (i, entry) in bucket.iter().enumerate() {
            if entry.iteration != iteration {
                free.get_or_insert(i);
            } else if entry.id == key.id {
                return false;
            }
        }
        let entry = Entry { iteration, id: key.id };
        match free {
            Some(i) => bucket[i] = entry,
            None => bucket.push(entry),
        }
        true
    }
}
