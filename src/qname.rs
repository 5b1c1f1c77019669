//! Qualified names, attribute dedup keys and string interning.
//!
//! A [`QualifiedName`] keeps the wire indices it was decoded from next to
//! the strings, so that namespace scope checks and duplicate attribute
//! detection can work on integers.

use std::fmt;
use std::rc::Rc;

use crate::FastHashSet;

/// Number of buckets the attribute hash is reduced to.
pub const ATTRIBUTE_HASH_SIZE: usize = 256;

/// Key for duplicate attribute detection.
///
/// `id` packs the local name index with the namespace position (wire index
/// plus one, 0 for no namespace) above bit 20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeKey {
    pub id: u32,
    pub hash: usize,
}

impl AttributeKey {
    /// Computes the key from the wire indices of an attribute name.
    pub fn new(namespace_index: Option<usize>, local_name_index: usize) -> Self {
        let namespace_position = namespace_index.map_or(0, |i| i + 1) as u32;
        Self {
            id: (local_name_index as u32) | (namespace_position << 20),
            hash: local_name_index % ATTRIBUTE_HASH_SIZE,
        }
    }
}

/// Decoded qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    prefix: Rc<str>,
    namespace_name: Rc<str>,
    local_name: Rc<str>,
    /// `prefix:local` oder `local`.
    qname: Rc<str>,
    prefix_index: Option<usize>,
    namespace_index: Option<usize>,
    local_name_index: usize,
    /// Indices stem from the wire (not from an external vocabulary).
    indexed: bool,
    attribute_key: Option<AttributeKey>,
}

impl QualifiedName {
    /// Creates a name without wire indices (for external vocabularies).
    pub fn new(prefix: &str, namespace_name: &str, local_name: &str) -> Self {
        let mut scratch = String::new();
        Self::from_parts(
            Rc::from(prefix),
            Rc::from(namespace_name),
            Rc::from(local_name),
            &mut scratch,
        )
    }

    /// Assembles a name; `scratch` is reused for the display string.
    pub fn from_parts(
        prefix: Rc<str>,
        namespace_name: Rc<str>,
        local_name: Rc<str>,
        scratch: &mut String,
    ) -> Self {
        let qname = if prefix.is_empty() {
            Rc::clone(&local_name)
        } else {
            scratch.clear();
            scratch.reserve(prefix.len() + 1 + local_name.len());
            scratch.push_str(&prefix);
            scratch.push(':');
            scratch.push_str(&local_name);
            Rc::from(scratch.as_str())
        };
        Self {
            prefix,
            namespace_name,
            local_name,
            qname,
            prefix_index: None,
            namespace_index: None,
            local_name_index: 0,
            indexed: false,
            attribute_key: None,
        }
    }

    /// Sets the wire indices the name was decoded from.
    pub fn with_indices(
        mut self,
        prefix_index: Option<usize>,
        namespace_index: Option<usize>,
        local_name_index: usize,
    ) -> Self {
        self.prefix_index = prefix_index;
        self.namespace_index = namespace_index;
        self.local_name_index = local_name_index;
        self.indexed = true;
        self
    }

    /// Precomputes the attribute dedup key; names without wire indices get none.
    pub fn into_attribute(mut self) -> Self {
        if self.indexed {
            self.attribute_key = Some(AttributeKey::new(self.namespace_index, self.local_name_index));
        }
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn namespace_name(&self) -> &str {
        &self.namespace_name
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Display form, `prefix:local` or `local`.
    pub fn qname(&self) -> &str {
        &self.qname
    }

    pub fn prefix_rc(&self) -> &Rc<str> {
        &self.prefix
    }

    pub fn namespace_name_rc(&self) -> &Rc<str> {
        &self.namespace_name
    }

    /// Wire index into the prefix table.
    pub fn prefix_index(&self) -> Option<usize> {
        self.prefix_index
    }

    /// Wire index into the namespace name table.
    pub fn namespace_index(&self) -> Option<usize> {
        self.namespace_index
    }

    /// Wire index into the local name table.
    pub fn local_name_index(&self) -> usize {
        self.local_name_index
    }

    /// True if the indices were set by [`with_indices`](Self::with_indices).
    pub fn has_wire_indices(&self) -> bool {
        self.indexed
    }

    /// Dedup key, present for decoded attribute names.
    pub fn attribute_key(&self) -> Option<AttributeKey> {
        self.attribute_key
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_name.is_empty() {
            f.write_str(&self.qname)
        } else {
            write!(f, "{{{}}}{}", self.namespace_name, self.qname)
        }
    }
}

/// Canonicalizes decoded strings so equal literals share one allocation.
#[derive(Debug, Default)]
pub struct StringInterner {
    strings: FastHashSet<Rc<str>>,
}

impl StringInterner {
    /// Erstellt einen neuen, leeren Interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared instance for `s`.
    pub fn intern(&mut self, s: &str) -> Rc<str> {
        if let Some(existing) = self.strings.get(s) {
            return Rc::clone(existing);
        }
        let rc: Rc<str> = Rc::from(s);
        self.strings.insert(Rc::clone(&rc));
        rc
    }

    /// Anzahl der internierten Strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Ob der Interner leer ist.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Vergisst alle Strings; die Kapazitaet bleibt erhalten.
    pub fn clear(&mut self) {
        self.strings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_form_with_and_without_prefix() {
        let q = QualifiedName::new("p", "urn:x", "item");
        assert_eq!(q.qname(), "p:item");
        assert_eq!(q.to_string(), "{urn:x}p:item");
        let q = QualifiedName::new("", "", "item");
        assert_eq!(q.qname(), "item");
        assert_eq!(q.to_string(), "item");
    }

    #[test]
    fn unprefixed_display_shares_local_name() {
        let local: Rc<str> = Rc::from("a");
        let mut scratch = String::new();
        let q = QualifiedName::from_parts(Rc::from(""), Rc::from(""), Rc::clone(&local), &mut scratch);
        assert!(Rc::ptr_eq(&local, &q.qname));
    }

    #[test]
    fn attribute_key_packs_indices() {
        let key = AttributeKey::new(Some(2), 5);
        assert_eq!(key.id, 5 | (3 << 20));
        assert_eq!(key.hash, 5);
        let key = AttributeKey::new(None, 300);
        assert_eq!(key.id, 300);
        assert_eq!(key.hash, 300 - 256);
        assert_ne!(AttributeKey::new(None, 1), AttributeKey::new(Some(0), 1));
    }

    #[test]
    fn attribute_key_only_for_attributes() {
        let q = QualifiedName::new("", "", "a").with_indices(None, None, 4);
        assert!(q.has_wire_indices());
        assert!(q.attribute_key().is_none());
        let q = q.into_attribute();
        assert_eq!(q.attribute_key(), Some(AttributeKey::new(None, 4)));
    }

    #[test]
    fn names_without_indices_have_no_key() {
        let q = QualifiedName::new("", "", "a").into_attribute();
        assert!(!q.has_wire_indices());
        assert!(q.attribute_key().is_none());
    }

    #[test]
    fn interner_shares_allocations() {
        let mut interner = StringInterner::new();
        let a = interner.intern("value");
        let b = interner.intern("value");
        assert!(Rc::ptr_eq(&a, &b));
        interner.intern("other");
        assert_eq!(interner.len(), 2);

        interner.clear();
        assert!(interner.is_empty());
        assert!(!Rc::ptr_eq(&a, &interner.intern("value")));
    }
}
