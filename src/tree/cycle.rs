//! Circular reference detection

use crate::object::{ObjId, Value};

/// Identities of the objects on the current root-to-node descent path.
///
/// One chain belongs to one traversal. Entries are pushed on descent and
/// popped on return, so sibling branches never see each other.
#[derive(Debug, Default)]
pub struct AncestorChain {
    ids: Vec<ObjId>,
}

impl AncestorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `value` is identical to an object already on the chain.
    /// Immediate values have no identity and are never ancestors.
    pub fn is_ancestor(&self, value: &Value) -> bool {
        value.identity().is_some_and(|id| self.ids.contains(&id))
    }

    pub fn push(&mut self, id: ObjId) {
        self.ids.push(id);
    }

    pub fn pop(&mut self) -> Option<ObjId> {
        self.ids.pop()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Heap;

    #[test]
    fn test_identity_not_equality() {
        let mut heap = Heap::new();
        let a = heap.list(vec![Value::Int(1)]);
        let b = heap.list(vec![Value::Int(1)]);

        let mut chain = AncestorChain::new();
        chain.push(a);
        assert!(chain.is_ancestor(&Value::Ref(a)));
        assert!(!chain.is_ancestor(&Value::Ref(b)));
        assert!(!chain.is_ancestor(&Value::Int(1)));
    }

    #[test]
    fn test_pop_unwinds() {
        let mut heap = Heap::new();
        let a = heap.list(Vec::new());
        let b = heap.list(Vec::new());

        let mut chain = AncestorChain::new();
        chain.push(a);
        chain.push(b);
        assert_eq!(chain.len(), 2);
        assert!(chain.is_ancestor(&Value::Ref(b)));

        assert_eq!(chain.pop(), Some(b));
        assert_eq!(chain.len(), 1);
        assert!(!chain.is_ancestor(&Value::Ref(b)));
        assert!(chain.is_ancestor(&Value::Ref(a)));
    }
}
