//! In-scope namespace bindings, keyed by wire indices.
//!
//! Each prefix (`None` for the default namespace) maps to a stack of
//! namespace indices; `None` on a stack means "no namespace". Element
//! scopes record which prefixes they declared so that leaving the element
//! pops exactly those bindings.

use crate::FastHashMap;
use crate::qname::QualifiedName;
use crate::{Error, Result};

/// Namespace bindings of the open elements.
#[derive(Debug)]
pub struct NamespaceScopes {
    bindings: FastHashMap<Option<usize>, Vec<Option<usize>>>,
    /// Prefixes declared by the open elements, in declaration order.
    declared: Vec<Option<usize>>,
    /// Length of `declared` when each open element started.
    marks: Vec<usize>,
}

impl Default for NamespaceScopes {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceScopes {
    /// Default namespace unbound, `xml` (index 0) bound to the XML namespace.
    pub fn new() -> Self {
        let mut bindings = FastHashMap::default();
        bindings.insert(None, vec![None]);
        bindings.insert(Some(0), vec![Some(0)]);
        Self {
            bindings,
            declared: Vec::new(),
            marks: Vec::new(),
        }
    }

    /// Forgets every declaration.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Opens the scope of an element.
    pub fn push_element(&mut self) {
        self.marks.push(self.declared.len());
    }

    /// Binds `prefix` to `namespace` in the innermost scope.
    pub fn declare(&mut self, prefix: Option<usize>, namespace: Option<usize>) {
        self.bindings.entry(prefix).or_default().push(namespace);
        self.declared.push(prefix);
    }

    /// Closes the innermost element scope.
    pub fn pop_element(&mut self) {
        let mark = self.marks.pop().unwrap_or(0);
        for prefix in self.declared.drain(mark..).rev() {
            if let Some(stack) = self.bindings.get_mut(&prefix) {
                stack.pop();
            }
        }
    }

    /// Current namespace of `prefix`; `None` when unbound.
    pub fn resolve(&self, prefix: Option<usize>) -> Option<Option<usize>> {
        self.bindings.get(&prefix)?.last().copied()
    }

    /// Checks that the prefix of `name` is bound to its namespace.
    ///
    /// Names without wire indices (taken from an external vocabulary) are
    /// not checked.
    pub fn check_element(&self, name: &QualifiedName) -> Result<()> {
        if !name.has_wire_indices() {
            return Ok(());
        }
        self.check(name)
    }

    /// Like [`check_element`](Self::check_element); unprefixed attributes
    /// never take the default namespace and are always in scope.
    pub fn check_attribute(&self, name: &QualifiedName) -> Result<()> {
        if name.prefix_index().is_none() || !name.has_wire_indices() {
            return Ok(());
        }
        self.check(name)
    }

    fn check(&self, name: &QualifiedName) -> Result<()> {
        if self.resolve(name.prefix_index()) == Some(name.namespace_index()) {
            Ok(())
        } else {
            Err(Error::NamespaceNotInScope(name.to_string()))
        }
    }
}
